//
// imports/file_reader.rs
//
// File content access for import resolution
//

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Reads the content of a candidate import file.
///
/// `None` means the file is not readable; the resolver moves on to the next
/// candidate. Implementations must not cache across requests.
pub trait FileReader {
    fn read_file(&self, path: &Path) -> Option<String>;
}

/// Reads straight from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFileReader;

impl FileReader for DiskFileReader {
    fn read_file(&self, path: &Path) -> Option<String> {
        match std::fs::read_to_string(path) {
            Ok(content) => Some(content),
            Err(e) => {
                log::trace!("Failed to read {}: {}", path.display(), e);
                None
            }
        }
    }
}

/// Prefers in-memory buffers of open documents over disk.
///
/// An open document is authoritative: its unsaved text is used even when the
/// file on disk differs or does not exist.
pub struct OverlayFileReader<'a, R: FileReader> {
    open_documents: &'a HashMap<PathBuf, String>,
    fallback: R,
}

impl<'a, R: FileReader> OverlayFileReader<'a, R> {
    pub fn new(open_documents: &'a HashMap<PathBuf, String>, fallback: R) -> Self {
        Self {
            open_documents,
            fallback,
        }
    }
}

impl<R: FileReader> FileReader for OverlayFileReader<'_, R> {
    fn read_file(&self, path: &Path) -> Option<String> {
        if let Some(content) = self.open_documents.get(path) {
            return Some(content.clone());
        }
        self.fallback.read_file(path)
    }
}

/// In-memory file system, keyed by exact path.
impl FileReader for HashMap<PathBuf, String> {
    fn read_file(&self, path: &Path) -> Option<String> {
        self.get(path).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_disk_reader() {
        let mut temp = NamedTempFile::new().unwrap();
        write!(temp, "message A {{}}").unwrap();

        assert_eq!(
            DiskFileReader.read_file(temp.path()),
            Some("message A {}".to_string())
        );
        assert_eq!(
            DiskFileReader.read_file(Path::new("/nonexistent/dir/x.proto")),
            None
        );
    }

    #[test]
    fn test_overlay_prefers_open_documents() {
        let mut temp = NamedTempFile::new().unwrap();
        write!(temp, "disk").unwrap();

        let mut open = HashMap::new();
        open.insert(temp.path().to_path_buf(), "buffer".to_string());
        let reader = OverlayFileReader::new(&open, DiskFileReader);

        assert_eq!(reader.read_file(temp.path()), Some("buffer".to_string()));
    }

    #[test]
    fn test_overlay_falls_back() {
        let open = HashMap::new();
        let mut disk = HashMap::new();
        disk.insert(PathBuf::from("/p/a.proto"), "content".to_string());
        let reader = OverlayFileReader::new(&open, disk);

        assert_eq!(
            reader.read_file(Path::new("/p/a.proto")),
            Some("content".to_string())
        );
        assert_eq!(reader.read_file(Path::new("/p/b.proto")), None);
    }
}
