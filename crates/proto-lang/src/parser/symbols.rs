//
// parser/symbols.rs
//
// Declaration, package and import extraction
//

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Message,
    Enum,
}

/// A top-level-looking `message` or `enum` declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub kind: DeclarationKind,
    pub name: String,
    /// Byte span of the name in its file
    pub span: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageStatement {
    pub name: String,
    pub span: Range<usize>,
}

/// An `import "<path>";` statement, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportStatement {
    /// The literal path as written, trimmed
    pub path: String,
    /// Byte span of the whole statement
    pub span: Range<usize>,
}

struct SymbolPatterns {
    message: Regex,
    enumeration: Regex,
    package: Regex,
    import: Regex,
    syntax: Regex,
}

fn patterns() -> &'static SymbolPatterns {
    static PATTERNS: OnceLock<SymbolPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| SymbolPatterns {
        message: Regex::new(r"(?m)^\s*message\s+([^\s{]+)").unwrap(),
        enumeration: Regex::new(r"(?m)^\s*enum\s+([^\s{]+)").unwrap(),
        package: Regex::new(r"\bpackage\s+([^;\s]+)\s*;").unwrap(),
        import: Regex::new(r#"\bimport\s*(?:(?:public|weak)\s*)?"([^"]+)"\s*;"#).unwrap(),
        syntax: Regex::new(r#"\bsyntax\s*=\s*["']?[^"';\n]*["']?\s*;?"#).unwrap(),
    })
}

/// End of the zone starting at `offset`: the nearest `{` or `}` at or after it.
pub fn zone_end(text: &str, offset: usize) -> usize {
    text[offset..]
        .find(['{', '}'])
        .map(|i| offset + i)
        .unwrap_or(text.len())
}

/// Accumulates declarations zone by zone while the scanner runs.
#[derive(Debug, Default)]
pub struct DeclarationCollector {
    declarations: Vec<Declaration>,
    // Token offsets only grow, so the last computed zone end stays valid
    // until a token passes it.
    cached_zone_end: Option<usize>,
}

impl DeclarationCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look for one `message` and one `enum` declaration in the zone at `offset`.
    pub fn collect_zone(&mut self, text: &str, offset: usize) {
        let end = match self.cached_zone_end {
            Some(end) if end >= offset => end,
            _ => {
                let end = zone_end(text, offset);
                self.cached_zone_end = Some(end);
                end
            }
        };
        let zone = &text[offset..end];
        if zone.is_empty() {
            return;
        }

        let patterns = patterns();
        for (kind, pattern) in [
            (DeclarationKind::Message, &patterns.message),
            (DeclarationKind::Enum, &patterns.enumeration),
        ] {
            let Some(name) = pattern.captures(zone).and_then(|caps| caps.get(1)) else {
                continue;
            };
            if self.contains(name.as_str()) {
                log::trace!("Ignoring duplicate declaration '{}'", name.as_str());
                continue;
            }
            self.declarations.push(Declaration {
                kind,
                name: name.as_str().to_string(),
                span: offset + name.start()..offset + name.end(),
            });
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.declarations.iter().any(|d| d.name == name)
    }

    pub fn finish(self) -> Vec<Declaration> {
        self.declarations
    }
}

/// First `package <name>;` statement anywhere in the text, comments included.
pub fn find_package(text: &str) -> Option<PackageStatement> {
    let name = patterns().package.captures(text)?.get(1)?;
    Some(PackageStatement {
        name: name.as_str().to_string(),
        span: name.range(),
    })
}

/// All `import` statements in document order, comments included.
pub fn find_imports(text: &str) -> Vec<ImportStatement> {
    patterns()
        .import
        .captures_iter(text)
        .filter_map(|caps| {
            let statement = caps.get(0)?;
            let path = caps.get(1)?.as_str().trim();
            if path.is_empty() {
                return None;
            }
            Some(ImportStatement {
                path: path.to_string(),
                span: statement.range(),
            })
        })
        .collect()
}

/// Span of the `syntax = "...";` statement, if any.
pub fn find_syntax_statement(text: &str) -> Option<Range<usize>> {
    patterns().syntax.find(text).map(|m| m.range())
}
