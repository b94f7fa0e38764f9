//
// imports/mod.rs
//
// Cross-file import resolution
//

pub mod file_reader;
pub mod path_resolve;
pub mod resolver;

pub use file_reader::{DiskFileReader, FileReader, OverlayFileReader};
pub use path_resolve::{candidate_paths, display_name, normalize_path, uri_to_path};
pub use resolver::{Forest, ImportIssue, ImportIssueKind, ImportResolver};
