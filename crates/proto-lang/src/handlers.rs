//
// handlers.rs
//
// Copyright (C) 2024-2026 Posit Software, PBC. All rights reserved.
// Modifications copyright (C) 2026 Jonathan Marc Bearak
//

use tower_lsp::lsp_types::*;

use crate::analysis::{CompletionOutcome, RequestContext};
use crate::imports::{display_name, DiskFileReader, OverlayFileReader};
use crate::parser::{parse_file, DeclarationKind};
use crate::position::{offset_to_position, position_to_offset};
use crate::state::RequestSnapshot;

// ============================================================================
// Completion
// ============================================================================

/// Completion items at `position`, plus the diagnostics the request produced.
pub fn completion(snapshot: &RequestSnapshot, position: Position) -> CompletionOutcome {
    let reader = OverlayFileReader::new(&snapshot.open_files, DiskFileReader);
    let ctx = RequestContext::new(&snapshot.uri, &snapshot.text, &snapshot.settings, &reader);
    let offset = position_to_offset(&snapshot.text, position);

    let outcome = ctx.complete(offset);
    log::trace!(
        "Completion for {} at {}:{}: {} items",
        snapshot.uri,
        position.line,
        position.character,
        outcome.items.len()
    );
    outcome
}

// ============================================================================
// Diagnostics
// ============================================================================

/// Diagnostics for the snapshot's document after resolving its imports.
pub fn diagnostics(snapshot: &RequestSnapshot) -> Vec<Diagnostic> {
    let reader = OverlayFileReader::new(&snapshot.open_files, DiskFileReader);
    RequestContext::new(&snapshot.uri, &snapshot.text, &snapshot.settings, &reader)
        .analyze()
        .diagnostics
}

// ============================================================================
// Document Symbols
// ============================================================================

/// Flat symbols for the package and every declaration of one document.
///
/// Imports are not followed. A document with a structural error has no symbols.
#[allow(deprecated)]
pub fn document_symbol(uri: &Url, text: &str) -> Option<DocumentSymbolResponse> {
    let parsed = match parse_file(&display_name(uri), text) {
        Ok(parsed) => parsed,
        Err(e) => {
            log::trace!("No document symbols for {}: {}", uri, e);
            return None;
        }
    };

    let location = |span: &std::ops::Range<usize>| Location {
        uri: uri.clone(),
        range: Range::new(
            offset_to_position(text, span.start),
            offset_to_position(text, span.end),
        ),
    };

    let mut symbols = Vec::new();

    if let Some(package) = &parsed.package {
        symbols.push(SymbolInformation {
            name: package.name.clone(),
            kind: SymbolKind::PACKAGE,
            tags: None,
            deprecated: None,
            location: location(&package.span),
            container_name: None,
        });
    }

    for decl in &parsed.declarations {
        let kind = match decl.kind {
            DeclarationKind::Message => SymbolKind::STRUCT,
            DeclarationKind::Enum => SymbolKind::ENUM,
        };
        symbols.push(SymbolInformation {
            name: decl.name.clone(),
            kind,
            tags: None,
            deprecated: None,
            location: location(&decl.span),
            container_name: parsed.package.as_ref().map(|p| p.name.clone()),
        });
    }

    Some(DocumentSymbolResponse::Flat(symbols))
}
