//
// imports/resolver.rs
//
// Recursive import resolution into a module forest
//

use std::ops::Range;
use std::path::{Path, PathBuf};

use super::file_reader::FileReader;
use super::path_resolve::{candidate_paths, normalize_path};
use crate::config::ProtoSettings;
use crate::module::{ImportedModule, Module};
use crate::parser::{parse_file, ImportStatement, ParsedFile, StructuralError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportIssueKind {
    /// No candidate path could be read
    Unresolved,
    /// The resolved file is already being resolved higher up the chain
    Circular,
    /// The resolved file would exceed the configured import depth
    TooDeep,
}

/// An import that was skipped while building the forest.
///
/// Issues are anchored in the requested document: `span` is the statement in
/// that document through which the skipped import was reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportIssue {
    pub kind: ImportIssueKind,
    /// Literal path of the skipped import
    pub import_path: String,
    /// Literal path of the top-level import it was reached through, when nested
    pub via: Option<String>,
    pub span: Range<usize>,
}

impl ImportIssue {
    pub fn message(&self) -> String {
        let subject = match &self.via {
            Some(via) => format!("Import \"{}\" (via \"{}\")", self.import_path, via),
            None => format!("Import \"{}\"", self.import_path),
        };
        match self.kind {
            ImportIssueKind::Unresolved => format!("{} could not be resolved.", subject),
            ImportIssueKind::Circular => format!("{} is circular and was skipped.", subject),
            ImportIssueKind::TooDeep => {
                format!("{} exceeds the maximum import depth and was skipped.", subject)
            }
        }
    }
}

/// A fully assembled forest plus the imports that were skipped on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Forest {
    pub root: Module,
    pub issues: Vec<ImportIssue>,
}

/// Builds the module forest of one request.
///
/// Owns the per-request resolution stack: a file already on the stack is not
/// entered again, so circular imports terminate. The same file reached along
/// two different chains is still resolved twice.
pub struct ImportResolver<'a, R: FileReader + ?Sized> {
    reader: &'a R,
    settings: &'a ProtoSettings,
    stack: Vec<PathBuf>,
    issues: Vec<ImportIssue>,
}

/// The top-level import currently being followed.
struct Origin<'s> {
    path: &'s str,
    span: Range<usize>,
}

impl<'a, R: FileReader + ?Sized> ImportResolver<'a, R> {
    pub fn new(reader: &'a R, settings: &'a ProtoSettings) -> Self {
        Self {
            reader,
            settings,
            stack: Vec::new(),
            issues: Vec::new(),
        }
    }

    /// Resolve every import of an already parsed root document.
    ///
    /// A structural error in any transitively imported file aborts the whole
    /// resolution.
    pub fn resolve(
        mut self,
        root_path: Option<&Path>,
        parsed: &ParsedFile,
    ) -> Result<Forest, StructuralError> {
        if let Some(path) = root_path {
            self.stack
                .push(normalize_path(path).unwrap_or_else(|| path.to_path_buf()));
        }

        let root = self.build(root_path, parsed, 0, None)?;

        log::trace!(
            "Module forest built: {} descendant modules, {} skipped imports",
            root.descendants().len(),
            self.issues.len()
        );

        Ok(Forest {
            root,
            issues: self.issues,
        })
    }

    fn build(
        &mut self,
        file_path: Option<&Path>,
        parsed: &ParsedFile,
        depth: usize,
        origin: Option<&Origin<'_>>,
    ) -> Result<Module, StructuralError> {
        let mut children = Vec::new();

        for import in &parsed.imports {
            let here = Origin {
                path: &import.path,
                span: import.span.clone(),
            };
            let nested = origin.is_some();
            let origin = origin.unwrap_or(&here);

            let Some((path, content)) = self.read_first_candidate(import, file_path) else {
                log::debug!("Skipping unresolved import \"{}\"", import.path);
                self.record(ImportIssueKind::Unresolved, import, origin, nested);
                continue;
            };

            let key = normalize_path(&path).unwrap_or_else(|| path.clone());
            if self.stack.contains(&key) {
                log::debug!(
                    "Skipping circular import \"{}\" ({})",
                    import.path,
                    path.display()
                );
                self.record(ImportIssueKind::Circular, import, origin, nested);
                continue;
            }
            if depth + 1 > self.settings.max_import_depth {
                log::debug!(
                    "Skipping import \"{}\": depth {} exceeds {}",
                    import.path,
                    depth + 1,
                    self.settings.max_import_depth
                );
                self.record(ImportIssueKind::TooDeep, import, origin, nested);
                continue;
            }

            let imported_file = parse_file(&path.display().to_string(), &content)?;

            self.stack.push(key);
            let resolved = self.build(Some(&path), &imported_file, depth + 1, Some(origin));
            self.stack.pop();
            let resolved = resolved?;

            // The wrapper itself is never marked public, so re-exported
            // modules are not walked twice through it.
            children.extend(resolved.public_children().cloned());
            children.push(ImportedModule {
                import_path: import.path.clone(),
                is_public: false,
                module: resolved,
            });
        }

        Ok(Module {
            package: parsed.package.as_ref().map(|p| p.name.clone()),
            declarations: parsed.declarations.clone(),
            children,
        })
    }

    /// First candidate whose content can be read and is not empty.
    fn read_first_candidate(
        &self,
        import: &ImportStatement,
        importer: Option<&Path>,
    ) -> Option<(PathBuf, String)> {
        candidate_paths(&import.path, importer, &self.settings.include_roots)
            .into_iter()
            .find_map(|candidate| {
                let content = self.reader.read_file(&candidate)?;
                if content.is_empty() {
                    log::trace!("Skipping empty candidate {}", candidate.display());
                    return None;
                }
                log::trace!(
                    "Resolved import \"{}\" to {}",
                    import.path,
                    candidate.display()
                );
                Some((candidate, content))
            })
    }

    fn record(
        &mut self,
        kind: ImportIssueKind,
        import: &ImportStatement,
        origin: &Origin<'_>,
        nested: bool,
    ) {
        let via = nested.then(|| origin.path.to_string());
        self.issues.push(ImportIssue {
            kind,
            import_path: import.path.clone(),
            via,
            span: origin.span.clone(),
        });
    }
}
