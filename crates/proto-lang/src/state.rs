//
// state.rs
//
// Copyright (C) 2024-2026 Posit Software, PBC. All rights reserved.
// Modifications copyright (C) 2026 Jonathan Marc Bearak
//

use std::collections::HashMap;
use std::path::PathBuf;

use ropey::Rope;
use tower_lsp::lsp_types::{TextDocumentContentChangeEvent, Url};

use crate::config::ProtoSettings;
use crate::imports::uri_to_path;

/// An open document
pub struct Document {
    pub contents: Rope,
    pub version: Option<i32>,
}

impl Document {
    pub fn new(text: &str, version: Option<i32>) -> Self {
        Self {
            contents: Rope::from_str(text),
            version,
        }
    }

    pub fn apply_change(&mut self, change: TextDocumentContentChangeEvent) {
        if let Some(range) = change.range {
            let start_idx = self.char_index(range.start.line, range.start.character);
            let end_idx = self.char_index(range.end.line, range.end.character);

            self.contents.remove(start_idx..end_idx.max(start_idx));
            self.contents.insert(start_idx, &change.text);
        } else {
            // Full document sync
            self.contents = Rope::from_str(&change.text);
        }
    }

    pub fn text(&self) -> String {
        self.contents.to_string()
    }

    /// Char index of an LSP position, clamped to the document.
    fn char_index(&self, line: u32, utf16_char: u32) -> usize {
        let line = line as usize;
        if line >= self.contents.len_lines() {
            return self.contents.len_chars();
        }
        let line_text = self.contents.line(line).to_string();
        self.contents.line_to_char(line) + utf16_offset_to_char_offset(&line_text, utf16_char as usize)
    }
}

fn utf16_offset_to_char_offset(line_text: &str, utf16_offset: usize) -> usize {
    let mut utf16_count = 0;
    let mut char_count = 0;

    for ch in line_text.chars() {
        if utf16_count >= utf16_offset || ch == '\n' {
            return char_count;
        }
        utf16_count += ch.len_utf16();
        char_count += 1;
    }
    char_count
}

/// Text, settings and open buffers copied out of the shared state for one request.
pub struct RequestSnapshot {
    pub uri: Url,
    pub text: String,
    pub settings: ProtoSettings,
    /// Open documents keyed by file path, preferred over disk when resolving imports
    pub open_files: HashMap<PathBuf, String>,
}

/// Server-wide state
pub struct WorldState {
    pub documents: HashMap<Url, Document>,
    pub settings: ProtoSettings,
    pub workspace_folders: Vec<Url>,
}

impl Default for WorldState {
    fn default() -> Self {
        Self::new()
    }
}

impl WorldState {
    pub fn new() -> Self {
        Self {
            documents: HashMap::new(),
            settings: ProtoSettings::default(),
            workspace_folders: Vec::new(),
        }
    }

    pub fn open_document(&mut self, uri: Url, text: &str, version: Option<i32>) {
        self.documents.insert(uri, Document::new(text, version));
    }

    pub fn close_document(&mut self, uri: &Url) {
        self.documents.remove(uri);
    }

    pub fn get_document(&self, uri: &Url) -> Option<&Document> {
        self.documents.get(uri)
    }

    /// Replace the settings, resolving relative include roots against the
    /// first workspace folder.
    pub fn apply_settings(&mut self, mut settings: ProtoSettings) {
        if let Some(root) = self.workspace_folders.first().and_then(uri_to_path) {
            settings.resolve_relative_roots(&root);
        }
        self.settings = settings;
    }

    pub fn snapshot(&self, uri: &Url) -> Option<RequestSnapshot> {
        let doc = self.get_document(uri)?;
        let open_files = self
            .documents
            .iter()
            .filter_map(|(u, d)| Some((uri_to_path(u)?, d.text())))
            .collect();

        Some(RequestSnapshot {
            uri: uri.clone(),
            text: doc.text(),
            settings: self.settings.clone(),
            open_files,
        })
    }
}
