//
// analysis.rs
//
// Request-scoped entry points: parse, resolve, complete, diagnose
//

use tower_lsp::lsp_types::{CompletionItem, Diagnostic, Url};

use crate::completion;
use crate::config::ProtoSettings;
use crate::diagnostics;
use crate::imports::{display_name, uri_to_path, FileReader, Forest, ImportResolver};
use crate::parser::{parse_file, ParsedFile, StructuralError};

/// Everything one request needs. Nothing here outlives the request: the forest
/// is rebuilt from scratch on every call.
pub struct RequestContext<'a, R: FileReader + ?Sized> {
    pub uri: &'a Url,
    pub text: &'a str,
    pub settings: &'a ProtoSettings,
    pub reader: &'a R,
}

/// Outcome of parsing a document and everything it imports.
#[derive(Debug)]
pub struct Analysis {
    pub result: Result<Forest, StructuralError>,
    /// Diagnostics to publish for the requested document
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Default)]
pub struct CompletionOutcome {
    pub items: Vec<CompletionItem>,
    pub diagnostics: Vec<Diagnostic>,
}

impl<'a, R: FileReader + ?Sized> RequestContext<'a, R> {
    pub fn new(uri: &'a Url, text: &'a str, settings: &'a ProtoSettings, reader: &'a R) -> Self {
        Self {
            uri,
            text,
            settings,
            reader,
        }
    }

    /// Parse the document, resolve its imports and collect diagnostics.
    ///
    /// A structural error anywhere in the forest replaces all other
    /// diagnostics with a single Error.
    pub fn analyze(&self) -> Analysis {
        match self.build_forest() {
            Ok((parsed, forest)) => {
                let mut diagnostics = Vec::new();
                diagnostics.extend(diagnostics::missing_include(
                    self.text,
                    &parsed,
                    self.settings,
                ));
                diagnostics.extend(diagnostics::import_issues(
                    self.text,
                    &forest.issues,
                    self.settings,
                ));
                Analysis {
                    result: Ok(forest),
                    diagnostics,
                }
            }
            Err(err) => {
                log::debug!("Structural error for {}: {}", self.uri, err);
                Analysis {
                    diagnostics: vec![diagnostics::structural_error(&err)],
                    result: Err(err),
                }
            }
        }
    }

    /// Completion at byte `offset` of the document text.
    pub fn complete(&self, offset: usize) -> CompletionOutcome {
        let analysis = self.analyze();
        let items = match &analysis.result {
            Ok(forest) => completion::complete(&forest.root, self.text, offset),
            Err(_) => Vec::new(),
        };
        CompletionOutcome {
            items,
            diagnostics: analysis.diagnostics,
        }
    }

    fn build_forest(&self) -> Result<(ParsedFile, Forest), StructuralError> {
        let parsed = parse_file(&display_name(self.uri), self.text)?;
        let path = uri_to_path(self.uri);
        let forest = ImportResolver::new(self.reader, self.settings).resolve(path.as_deref(), &parsed)?;
        Ok((parsed, forest))
    }
}
