//
// diagnostics.rs
//
// Positioned diagnostics for structural errors and import problems
//

use std::ops::Range;

use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, Position, Range as LspRange};

use crate::config::ProtoSettings;
use crate::imports::{ImportIssue, ImportIssueKind};
use crate::parser::{ParsedFile, StructuralError};
use crate::position::offset_to_position;

pub const MISSING_INCLUDE_MESSAGE: &str = "No include paths were provided.";

const SOURCE: &str = "proto-lang";

fn span_to_range(text: &str, span: &Range<usize>) -> LspRange {
    LspRange::new(
        offset_to_position(text, span.start),
        offset_to_position(text, span.end),
    )
}

/// The single Error diagnostic published when a request aborts.
///
/// The range comes from the file that failed, which may be an imported file
/// rather than the document the diagnostic is published for.
pub fn structural_error(err: &StructuralError) -> Diagnostic {
    Diagnostic {
        range: LspRange::new(err.start, err.end),
        severity: Some(DiagnosticSeverity::ERROR),
        source: Some(SOURCE.to_string()),
        message: err.to_string(),
        ..Default::default()
    }
}

/// Warning for a document that imports files while no include roots are configured.
pub fn missing_include(
    text: &str,
    parsed: &ParsedFile,
    settings: &ProtoSettings,
) -> Option<Diagnostic> {
    if parsed.imports.is_empty() || !settings.include_roots.is_empty() {
        return None;
    }

    let range = match &parsed.syntax {
        Some(span) => span_to_range(text, span),
        None => LspRange::new(Position::new(0, 0), Position::new(0, 1)),
    };

    Some(Diagnostic {
        range,
        severity: Some(DiagnosticSeverity::WARNING),
        source: Some(SOURCE.to_string()),
        message: MISSING_INCLUDE_MESSAGE.to_string(),
        ..Default::default()
    })
}

/// Diagnostics for skipped imports, at the severities configured for them.
pub fn import_issues(
    text: &str,
    issues: &[ImportIssue],
    settings: &ProtoSettings,
) -> Vec<Diagnostic> {
    issues
        .iter()
        .filter_map(|issue| {
            let severity = match issue.kind {
                ImportIssueKind::Unresolved => settings.unresolved_import_severity,
                ImportIssueKind::Circular | ImportIssueKind::TooDeep => {
                    settings.circular_import_severity
                }
            }?;
            Some(Diagnostic {
                range: span_to_range(text, &issue.span),
                severity: Some(severity),
                source: Some(SOURCE.to_string()),
                message: issue.message(),
                ..Default::default()
            })
        })
        .collect()
}
