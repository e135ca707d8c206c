//! Filesystem blob store for raw paste content

use crate::storage::traits::{BlobStore, StorageResult};
use std::path::{Path, PathBuf};

/// Writes each blob to `<root>/<id>.txt`
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Creates a blob store rooted at `root`; the directory is created on
    /// first write
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a blob with this id is written to
    pub fn blob_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{}.txt", id))
    }
}

impl BlobStore for FsBlobStore {
    fn write_blob(&self, id: &str, text: &str) -> StorageResult<PathBuf> {
        std::fs::create_dir_all(&self.root)?;
        let path = self.blob_path(id);
        std::fs::write(&path, text)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path().join("pastes"));

        let path = store.write_blob("abc", "hello").unwrap();

        assert_eq!(path, dir.path().join("pastes").join("abc.txt"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");
    }

    #[test]
    fn test_write_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path());

        store.write_blob("abc", "first").unwrap();
        store.write_blob("def", "other").unwrap();
        let path = store.write_blob("abc", "second").unwrap();

        assert_eq!(std::fs::read_to_string(path).unwrap(), "second");
        assert_eq!(
            std::fs::read_to_string(store.blob_path("def")).unwrap(),
            "other"
        );
    }

    #[test]
    fn test_write_utf8_content() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path());

        let path = store.write_blob("utf", "héllo wörld ✓").unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "héllo wörld ✓");
    }
}
