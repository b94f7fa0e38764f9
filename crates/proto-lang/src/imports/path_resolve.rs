//
// imports/path_resolve.rs
//
// Candidate paths for an import statement
//
// Order matters: an absolute import has exactly one candidate. A relative one
// is tried against every include root in configured order, then against the
// importing file's own directory, which is always tried last whether or not
// include roots are configured.
//

use std::path::{Component, Path, PathBuf};

use url::Url;

/// Candidate files for `import_path`, in resolution order.
///
/// `importer` is the path of the importing file, when it has one (unsaved
/// buffers and non-`file:` documents have none).
pub fn candidate_paths(
    import_path: &str,
    importer: Option<&Path>,
    include_roots: &[PathBuf],
) -> Vec<PathBuf> {
    let path = Path::new(import_path);
    if path.is_absolute() {
        return vec![normalize_path(path).unwrap_or_else(|| path.to_path_buf())];
    }

    let importer_dir = importer.and_then(Path::parent);

    include_roots
        .iter()
        .map(PathBuf::as_path)
        .chain(importer_dir)
        .map(|base| {
            let joined = base.join(path);
            normalize_path(&joined).unwrap_or(joined)
        })
        .collect()
}

/// Normalize a path by resolving . and .. components lexically
pub fn normalize_path(path: &Path) -> Option<PathBuf> {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::ParentDir => {
                // Only pop a Normal segment; RootDir and Prefix stay
                if let Some(last) = components.last() {
                    if matches!(last, Component::Normal(_)) {
                        components.pop();
                    }
                }
            }
            Component::CurDir => {}
            c => components.push(c),
        }
    }

    if components.is_empty() {
        return None;
    }

    let mut result = PathBuf::new();
    for c in components {
        result.push(c);
    }
    Some(result)
}

/// File path of a document URI, if it is a `file:` URI.
pub fn uri_to_path(uri: &Url) -> Option<PathBuf> {
    if uri.scheme() != "file" {
        return None;
    }
    uri.to_file_path().ok()
}

/// Name of a document for error messages: its path, or the URI itself.
pub fn display_name(uri: &Url) -> String {
    uri_to_path(uri)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| uri.to_string())
}
