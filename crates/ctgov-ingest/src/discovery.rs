//! Corpus discovery
//!
//! Enumerates the `.xml` documents under the input root in a stable,
//! lexicographic order. The partitioner treats that order as authoritative:
//! the same directory tree always yields the same file list, and therefore
//! the same sequence numbers, across runs.

use std::path::{Path, PathBuf};

use ctgov_common::{CtgovError, Result};
use tracing::debug;
use walkdir::WalkDir;

/// Enumerate all XML documents under `root`, sorted by full path.
///
/// An unreadable root (missing directory, permission failure) is a fatal
/// setup error; an empty corpus is not.
pub fn discover(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(CtgovError::discovery(format!(
            "input root is not a directory: {}",
            root.display()
        )));
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|e| {
            CtgovError::discovery(format!("failed to walk {}: {}", root.display(), e))
        })?;
        if entry.file_type().is_file()
            && entry.path().extension().is_some_and(|ext| ext == "xml")
        {
            paths.push(entry.into_path());
        }
    }

    // Walk order varies by filesystem; the sorted full path is the contract
    paths.sort();

    debug!(root = %root.display(), files = paths.len(), "corpus discovered");
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "<clinical_study/>").unwrap();
    }

    #[test]
    fn test_discovers_nested_xml_sorted() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("002/b.xml"));
        touch(&dir.path().join("001/z.xml"));
        touch(&dir.path().join("001/a.xml"));

        let paths = discover(dir.path()).unwrap();
        assert_eq!(paths.len(), 3);
        assert!(paths[0].ends_with("001/a.xml"));
        assert!(paths[1].ends_with("001/z.xml"));
        assert!(paths[2].ends_with("002/b.xml"));
    }

    #[test]
    fn test_ignores_non_xml_files() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.xml"));
        fs::write(dir.path().join("notes.txt"), "text").unwrap();
        fs::write(dir.path().join("no_extension"), "text").unwrap();

        let paths = discover(dir.path()).unwrap();
        assert_eq!(paths.len(), 1);
    }

    #[test]
    fn test_empty_corpus_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let err = discover(Path::new("/nonexistent/ctgov-input")).unwrap_err();
        assert!(matches!(err, CtgovError::Discovery(_)));
    }

    #[test]
    fn test_order_is_stable_across_calls() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..20 {
            touch(&dir.path().join(format!("{:03}/doc.xml", i)));
        }
        let first = discover(dir.path()).unwrap();
        let second = discover(dir.path()).unwrap();
        assert_eq!(first, second);
    }
}
