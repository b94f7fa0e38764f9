//
// completion.rs
//
// Unqualified and package-qualified symbol completion over a module forest
//

use tower_lsp::lsp_types::{CompletionItem, CompletionItemKind};

use crate::module::Module;
use crate::parser::DeclarationKind;
use crate::position::snap_to_char_boundary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionKind {
    Enum,
    MessageType,
    PackageNamespace,
}

impl CompletionKind {
    pub fn to_lsp(self) -> CompletionItemKind {
        match self {
            CompletionKind::Enum => CompletionItemKind::ENUM,
            CompletionKind::MessageType => CompletionItemKind::CLASS,
            CompletionKind::PackageNamespace => CompletionItemKind::MODULE,
        }
    }
}

impl From<DeclarationKind> for CompletionKind {
    fn from(kind: DeclarationKind) -> Self {
        match kind {
            DeclarationKind::Message => CompletionKind::MessageType,
            DeclarationKind::Enum => CompletionKind::Enum,
        }
    }
}

/// Build a completion item. The `!` sort prefix ranks these items ahead of
/// the editor's word-based suggestions.
pub fn completion_item(label: &str, kind: CompletionKind) -> CompletionItem {
    CompletionItem {
        label: label.to_string(),
        kind: Some(kind.to_lsp()),
        sort_text: Some(format!("!{}", label)),
        ..Default::default()
    }
}

/// The qualifier typed before a trailing `.` at `offset`, if the cursor follows one.
///
/// Scans backward from just before the dot while characters are neither
/// whitespace nor `;`.
pub fn package_qualifier(text: &str, offset: usize) -> Option<&str> {
    let offset = snap_to_char_boundary(text, offset);
    let before_dot = text[..offset].strip_suffix('.')?;

    let start = before_dot
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace() || *c == ';')
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);

    Some(&before_dot[start..])
}

/// Completion items for the cursor at byte `offset` of the root document text.
pub fn complete(root: &Module, text: &str, offset: usize) -> Vec<CompletionItem> {
    let descendants = root.descendants();
    let all_modules = root.all_modules();

    if let Some(qualifier) = package_qualifier(text, offset) {
        log::trace!("Package-qualified completion for '{}'", qualifier);
        return all_modules
            .iter()
            .find(|module| module.package.as_deref() == Some(qualifier))
            .map(|module| {
                module
                    .declarations
                    .iter()
                    .map(|d| completion_item(&d.name, d.kind.into()))
                    .collect()
            })
            .unwrap_or_default();
    }

    let declarations = all_modules
        .iter()
        .filter(|module| module.package.is_none())
        .flat_map(|module| module.declarations.iter())
        .map(|d| completion_item(&d.name, d.kind.into()));

    let packages = descendants
        .iter()
        .filter_map(|module| module.package.as_deref())
        .filter(|package| !package.is_empty())
        .map(|package| completion_item(package, CompletionKind::PackageNamespace));

    declarations.chain(packages).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::ImportedModule;
    use crate::parser::Declaration;

    fn decl(kind: DeclarationKind, name: &str) -> Declaration {
        Declaration {
            kind,
            name: name.to_string(),
            span: 0..0,
        }
    }

    fn module(package: Option<&str>, decls: Vec<Declaration>) -> Module {
        Module {
            package: package.map(str::to_string),
            declarations: decls,
            children: Vec::new(),
        }
    }

    fn child(path: &str, module: Module) -> ImportedModule {
        ImportedModule {
            import_path: path.to_string(),
            is_public: false,
            module,
        }
    }

    fn labels(items: &[CompletionItem]) -> Vec<&str> {
        items.iter().map(|i| i.label.as_str()).collect()
    }

    #[test]
    fn test_package_qualifier() {
        assert_eq!(package_qualifier("foo a.b.", 8), Some("a.b"));
        assert_eq!(package_qualifier("x;a.", 4), Some("a"));
        assert_eq!(package_qualifier("a.", 2), Some("a"));
        assert_eq!(package_qualifier(" .", 2), Some(""));
        assert_eq!(package_qualifier("a.b", 3), None);
        assert_eq!(package_qualifier("", 0), None);
    }

    #[test]
    fn test_unqualified_items() {
        let root = module(
            None,
            vec![decl(DeclarationKind::Message, "Foo"), decl(DeclarationKind::Enum, "Bar")],
        );
        let items = complete(&root, "  ", 1);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].label, "Foo");
        assert_eq!(items[0].kind, Some(CompletionItemKind::CLASS));
        assert_eq!(items[0].sort_text.as_deref(), Some("!Foo"));
        assert_eq!(items[1].label, "Bar");
        assert_eq!(items[1].kind, Some(CompletionItemKind::ENUM));
        assert_eq!(items[1].sort_text.as_deref(), Some("!Bar"));
    }

    #[test]
    fn test_packaged_modules_only_contribute_package_names() {
        let mut root = module(None, vec![decl(DeclarationKind::Message, "Local")]);
        root.children.push(child(
            "x.proto",
            module(Some("a.b"), vec![decl(DeclarationKind::Message, "M")]),
        ));
        root.children.push(child(
            "y.proto",
            module(None, vec![decl(DeclarationKind::Enum, "Shared")]),
        ));

        let items = complete(&root, "", 0);
        assert_eq!(labels(&items), vec!["Shared", "Local", "a.b"]);
        assert_eq!(items[2].kind, Some(CompletionItemKind::MODULE));
        assert_eq!(items[2].sort_text.as_deref(), Some("!a.b"));
    }

    #[test]
    fn test_root_package_is_not_listed() {
        let root = module(Some("mine"), vec![decl(DeclarationKind::Message, "M")]);
        assert!(complete(&root, "", 0).is_empty());
    }

    #[test]
    fn test_duplicate_packages_are_kept() {
        let mut root = module(None, vec![]);
        root.children.push(child("x.proto", module(Some("p"), vec![])));
        root.children.push(child("y.proto", module(Some("p"), vec![])));
        assert_eq!(labels(&complete(&root, "", 0)), vec!["p", "p"]);
    }

    #[test]
    fn test_qualified_lookup() {
        let mut nested = module(Some("a.b"), vec![decl(DeclarationKind::Message, "M")]);
        nested
            .children
            .push(child("z.proto", module(None, vec![decl(DeclarationKind::Enum, "Hidden")])));
        let mut root = module(None, vec![decl(DeclarationKind::Message, "Local")]);
        root.children.push(child("x.proto", nested));

        let text = "  a.b.";
        let items = complete(&root, text, text.len());
        assert_eq!(labels(&items), vec!["M"]);
        assert_eq!(items[0].kind, Some(CompletionItemKind::CLASS));
    }

    #[test]
    fn test_qualified_lookup_matches_root_package() {
        let root = module(Some("own"), vec![decl(DeclarationKind::Enum, "E")]);
        let text = "own.";
        assert_eq!(labels(&complete(&root, text, text.len())), vec!["E"]);
    }

    #[test]
    fn test_unknown_qualifier_yields_nothing() {
        let root = module(None, vec![decl(DeclarationKind::Message, "Foo")]);
        let text = "nope.";
        assert!(complete(&root, text, text.len()).is_empty());
    }
}
