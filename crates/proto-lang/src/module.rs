//
// module.rs
//
// Module forest built from a document and its imports
//

use crate::parser::Declaration;

/// A parsed file in the forest. The root of a request is a plain `Module`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Module {
    pub package: Option<String>,
    pub declarations: Vec<Declaration>,
    pub children: Vec<ImportedModule>,
}

/// A module reached through an `import` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedModule {
    /// The import path exactly as written in the importing file
    pub import_path: String,
    pub is_public: bool,
    pub module: Module,
}

impl Module {
    /// Every module reachable through `children`, duplicates kept.
    ///
    /// Modules below the direct children come first: for each child in turn,
    /// its own children and then everything beneath those. The direct
    /// children follow last. Package-qualified lookup takes the first match in
    /// this order.
    pub fn descendants(&self) -> Vec<&Module> {
        let mut out = Vec::new();
        collect_below(&self.children, &mut out);
        out.extend(self.children.iter().map(|child| &child.module));
        out
    }

    /// Descendants followed by the module itself.
    pub fn all_modules(&self) -> Vec<&Module> {
        let mut all = self.descendants();
        all.push(self);
        all
    }

    /// Children that an importer of this module re-exports.
    pub fn public_children(&self) -> impl Iterator<Item = &ImportedModule> {
        self.children.iter().filter(|child| child.is_public)
    }
}

fn collect_below<'a>(children: &'a [ImportedModule], out: &mut Vec<&'a Module>) {
    for child in children {
        let grandchildren = &child.module.children;
        out.extend(grandchildren.iter().map(|g| &g.module));
        collect_below(grandchildren, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(package: &str) -> Module {
        Module {
            package: Some(package.to_string()),
            ..Default::default()
        }
    }

    fn imported(path: &str, is_public: bool, module: Module) -> ImportedModule {
        ImportedModule {
            import_path: path.to_string(),
            is_public,
            module,
        }
    }

    #[test]
    fn test_descendants_order() {
        let mut c = leaf("c");
        c.children.push(imported("e.proto", false, leaf("e")));
        let mut b = leaf("b");
        b.children.push(imported("c.proto", false, c));
        let root = Module {
            children: vec![imported("b.proto", false, b), imported("d.proto", false, leaf("d"))],
            ..Default::default()
        };

        let packages: Vec<_> = root
            .descendants()
            .iter()
            .map(|m| m.package.clone().unwrap())
            .collect();
        // Nested modules first, the root's direct imports last
        assert_eq!(packages, vec!["c", "e", "b", "d"]);

        let all = root.all_modules();
        assert_eq!(all.len(), 5);
        assert!(all[4].package.is_none());
    }

    #[test]
    fn test_nested_package_wins_qualified_lookup_order() {
        let mut b = leaf("shared");
        b.declarations.push(crate::parser::Declaration {
            kind: crate::parser::DeclarationKind::Message,
            name: "Nested".to_string(),
            span: 0..0,
        });
        let mut a = leaf("a");
        a.children.push(imported("b.proto", false, b));
        let root = Module {
            children: vec![imported("shared.proto", false, leaf("shared")), imported("a.proto", false, a)],
            ..Default::default()
        };

        let first = root
            .all_modules()
            .into_iter()
            .find(|m| m.package.as_deref() == Some("shared"))
            .unwrap();
        assert_eq!(first.declarations[0].name, "Nested");
    }

    #[test]
    fn test_duplicates_are_kept() {
        let root = Module {
            children: vec![
                imported("x.proto", false, leaf("x")),
                imported("x.proto", false, leaf("x")),
            ],
            ..Default::default()
        };
        assert_eq!(root.descendants().len(), 2);
    }

    #[test]
    fn test_public_children() {
        let module = Module {
            children: vec![
                imported("a.proto", true, leaf("a")),
                imported("b.proto", false, leaf("b")),
            ],
            ..Default::default()
        };
        let public: Vec<_> = module.public_children().map(|c| c.import_path.as_str()).collect();
        assert_eq!(public, vec!["a.proto"]);
    }
}
