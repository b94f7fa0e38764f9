//
// config.rs
//
// Settings for import resolution and diagnostics
//

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tower_lsp::lsp_types::DiagnosticSeverity;

/// Name of the settings section sent by the client
pub const SETTINGS_SECTION: &str = "proto-lang";

/// Resolved settings for one request
#[derive(Debug, Clone, PartialEq)]
pub struct ProtoSettings {
    /// Directories searched for imports, in order, before the importing file's directory
    pub include_roots: Vec<PathBuf>,
    /// Maximum nesting of imported files below the requested document
    pub max_import_depth: usize,
    /// Severity for imports that no candidate path could read; `None` keeps them silent
    pub unresolved_import_severity: Option<DiagnosticSeverity>,
    /// Severity for imports skipped because of a cycle or the depth limit
    pub circular_import_severity: Option<DiagnosticSeverity>,
}

impl Default for ProtoSettings {
    fn default() -> Self {
        Self {
            include_roots: Vec::new(),
            max_import_depth: 32,
            unresolved_import_severity: None,
            circular_import_severity: Some(DiagnosticSeverity::WARNING),
        }
    }
}

impl ProtoSettings {
    /// Make relative include roots absolute against `base` (usually the workspace root).
    pub fn resolve_relative_roots(&mut self, base: &Path) {
        for root in &mut self.include_roots {
            if root.is_relative() {
                *root = base.join(&*root);
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSettings {
    include: Option<Vec<PathBuf>>,
    max_import_depth: Option<usize>,
    unresolved_import_severity: Option<String>,
    circular_import_severity: Option<String>,
}

/// Parse settings from LSP JSON.
///
/// Accepts either `{"proto-lang": {...}}` or the section object itself. Absent
/// fields keep their defaults. Returns `None` when the value has neither shape.
///
/// ```
/// use serde_json::json;
/// let settings = proto_lang::config::parse_settings(&json!({
///     "proto-lang": { "include": ["/usr/include"], "unresolvedImportSeverity": "warning" }
/// }))
/// .unwrap();
/// assert_eq!(settings.include_roots.len(), 1);
/// ```
pub fn parse_settings(value: &serde_json::Value) -> Option<ProtoSettings> {
    let section = value.get(SETTINGS_SECTION).unwrap_or(value);
    if !section.is_object() {
        return None;
    }

    let raw: RawSettings = match serde_json::from_value(section.clone()) {
        Ok(raw) => raw,
        Err(e) => {
            log::warn!("Ignoring malformed {} settings: {}", SETTINGS_SECTION, e);
            return None;
        }
    };

    let mut settings = ProtoSettings::default();
    if let Some(include) = raw.include {
        settings.include_roots = include;
    }
    if let Some(depth) = raw.max_import_depth {
        settings.max_import_depth = depth;
    }
    if let Some(sev) = raw.unresolved_import_severity {
        settings.unresolved_import_severity = parse_severity(&sev);
    }
    if let Some(sev) = raw.circular_import_severity {
        settings.circular_import_severity = parse_severity(&sev);
    }

    Some(settings)
}

/// Parse a severity name; `off`/`none` disable the diagnostic.
pub fn parse_severity(s: &str) -> Option<DiagnosticSeverity> {
    match s.to_lowercase().as_str() {
        "error" => Some(DiagnosticSeverity::ERROR),
        "warning" => Some(DiagnosticSeverity::WARNING),
        "information" | "info" => Some(DiagnosticSeverity::INFORMATION),
        "hint" => Some(DiagnosticSeverity::HINT),
        "off" | "none" => None,
        _ => Some(DiagnosticSeverity::WARNING),
    }
}

pub fn log_settings(settings: &ProtoSettings) {
    log::info!("Settings applied:");
    log::info!("  include_roots: {:?}", settings.include_roots);
    log::info!("  max_import_depth: {}", settings.max_import_depth);
    log::info!(
        "  unresolved_import_severity: {:?}",
        settings.unresolved_import_severity
    );
    log::info!(
        "  circular_import_severity: {:?}",
        settings.circular_import_severity
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_values() {
        let settings = ProtoSettings::default();
        assert!(settings.include_roots.is_empty());
        assert_eq!(settings.max_import_depth, 32);
        assert!(settings.unresolved_import_severity.is_none());
        assert_eq!(
            settings.circular_import_severity,
            Some(DiagnosticSeverity::WARNING)
        );
    }

    #[test]
    fn test_parse_section() {
        let settings = parse_settings(&json!({
            "proto-lang": {
                "include": ["/a", "b"],
                "maxImportDepth": 4,
                "unresolvedImportSeverity": "error",
                "circularImportSeverity": "off"
            }
        }))
        .unwrap();
        assert_eq!(
            settings.include_roots,
            vec![PathBuf::from("/a"), PathBuf::from("b")]
        );
        assert_eq!(settings.max_import_depth, 4);
        assert_eq!(
            settings.unresolved_import_severity,
            Some(DiagnosticSeverity::ERROR)
        );
        assert!(settings.circular_import_severity.is_none());
    }

    #[test]
    fn test_parse_bare_object_keeps_defaults() {
        let settings = parse_settings(&json!({ "include": ["/x"] })).unwrap();
        assert_eq!(settings.include_roots, vec![PathBuf::from("/x")]);
        assert_eq!(settings.max_import_depth, 32);
    }

    #[test]
    fn test_parse_rejects_non_objects() {
        assert!(parse_settings(&json!(null)).is_none());
        assert!(parse_settings(&json!({ "proto-lang": [1, 2] })).is_none());
        assert!(parse_settings(&json!({ "include": "not-a-list" })).is_none());
    }

    #[test]
    fn test_parse_severity() {
        assert_eq!(parse_severity("Hint"), Some(DiagnosticSeverity::HINT));
        assert_eq!(parse_severity("info"), Some(DiagnosticSeverity::INFORMATION));
        assert_eq!(parse_severity("none"), None);
        assert_eq!(parse_severity("bogus"), Some(DiagnosticSeverity::WARNING));
    }

    #[test]
    fn test_resolve_relative_roots() {
        let mut settings = ProtoSettings {
            include_roots: vec![PathBuf::from("/abs"), PathBuf::from("rel/dir")],
            ..Default::default()
        };
        settings.resolve_relative_roots(Path::new("/workspace"));
        assert_eq!(
            settings.include_roots,
            vec![PathBuf::from("/abs"), PathBuf::from("/workspace/rel/dir")]
        );
    }
}
