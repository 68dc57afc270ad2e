use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::BlobStore;
use crate::errors::{LinkstashError, Result};

/// Blob store keeping one JSON document per key inside a data directory.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write leaves the previous document intact.
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'));
        if !valid {
            return Err(LinkstashError::file_operation(format!(
                "Invalid blob key: '{}'",
                key
            )));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl BlobStore for FileBlobStore {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Blob file {} does not exist yet", path.display());
                Ok(None)
            }
            Err(e) => Err(LinkstashError::file_operation(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn write(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            LinkstashError::file_operation(format!(
                "Failed to create data directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value).await.map_err(|e| {
            LinkstashError::file_operation(format!("Failed to write {}: {}", tmp.display(), e))
        })?;
        tokio::fs::rename(&tmp, &path).await.map_err(|e| {
            LinkstashError::file_operation(format!(
                "Failed to move {} into place: {}",
                path.display(),
                e
            ))
        })?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_key_reads_none() {
        let dir = TempDir::new().unwrap();
        let store = FileBlobStore::new(dir.path());
        assert_eq!(store.read("urls").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_write_creates_directory_and_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = FileBlobStore::new(dir.path().join("nested").join("data"));

        store.write("urls", "[]").await.unwrap();
        store.write("urls", "[{}]").await.unwrap();

        assert_eq!(store.read("urls").await.unwrap().as_deref(), Some("[{}]"));
        assert!(store.dir().join("urls.json").exists());
        assert!(!store.dir().join("urls.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = FileBlobStore::new(dir.path());
        store.write("logs", "[]").await.unwrap();

        store.remove("logs").await.unwrap();
        store.remove("logs").await.unwrap();
        assert_eq!(store.read("logs").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_rejects_path_like_keys() {
        let dir = TempDir::new().unwrap();
        let store = FileBlobStore::new(dir.path());

        for key in ["", "../escape", "a/b", ".hidden"] {
            let err = store.write(key, "x").await.unwrap_err();
            assert!(matches!(err, LinkstashError::FileOperation(_)), "{}", key);
        }
    }
}
