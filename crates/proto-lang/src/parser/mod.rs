//
// parser/mod.rs
//
// Single-file parsing: structural scan plus symbol extraction
//

pub mod scanner;
pub mod symbols;


use std::ops::Range;

pub use scanner::{Delimiter, StructuralError};
pub use symbols::{Declaration, DeclarationKind, ImportStatement, PackageStatement};

/// Everything extracted from one file, before import resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFile {
    pub package: Option<PackageStatement>,
    pub declarations: Vec<Declaration>,
    pub imports: Vec<ImportStatement>,
    /// Span of the `syntax = ...;` statement
    pub syntax: Option<Range<usize>>,
}

/// Parse one file.
///
/// `file` names the file in error messages. Declarations are collected inline
/// while the scanner runs; package and imports are document-wide searches.
pub fn parse_file(file: &str, text: &str) -> Result<ParsedFile, StructuralError> {
    let mut collector = symbols::DeclarationCollector::new();
    scanner::scan(file, text, |offset| collector.collect_zone(text, offset))?;

    let parsed = ParsedFile {
        package: symbols::find_package(text),
        declarations: collector.finish(),
        imports: symbols::find_imports(text),
        syntax: symbols::find_syntax_statement(text),
    };

    log::trace!(
        "Parsed {}: package={:?}, {} declarations, {} imports",
        file,
        parsed.package.as_ref().map(|p| p.name.as_str()),
        parsed.declarations.len(),
        parsed.imports.len()
    );

    Ok(parsed)
}
