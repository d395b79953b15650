use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;

use super::core::{content_hash, key_path};
use crate::application::ports::storage_port::{StoragePort, StoredBlob};

/// Blobs stored as plain files under `root`.
pub struct FsStoragePort {
    pub root: PathBuf,
}

impl FsStoragePort {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn full_path(&self, key: &str) -> anyhow::Result<PathBuf> {
        Ok(self.root.join(key_path(key)?))
    }
}

#[async_trait]
impl StoragePort for FsStoragePort {
    async fn put(
        &self,
        key: &str,
        bytes: &[u8],
        _content_type: Option<&str>,
    ) -> anyhow::Result<StoredBlob> {
        let path = self.full_path(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("failed to write blob {key}"))?;
        Ok(StoredBlob {
            key: key.to_string(),
            size: bytes.len() as i64,
            content_hash: content_hash(bytes),
        })
    }

    async fn get(&self, key: &str) -> anyhow::Result<Vec<u8>> {
        let path = self.full_path(key)?;
        let data = tokio::fs::read(&path)
            .await
            .with_context(|| format!("failed to read blob {key}"))?;
        Ok(data)
    }

    async fn delete(&self, key: &str) -> anyhow::Result<()> {
        let path = self.full_path(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("failed to delete blob {key}")),
        }
    }

    async fn exists(&self, key: &str) -> anyhow::Result<bool> {
        let path = self.full_path(key)?;
        Ok(tokio::fs::try_exists(&path).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_get_delete_under_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStoragePort::new(dir.path());

        let blob = store
            .put("owner/one.txt", b"hello", Some("text/plain"))
            .await
            .unwrap();
        assert_eq!(blob.size, 5);
        assert!(dir.path().join("owner").join("one.txt").exists());
        assert_eq!(store.get("owner/one.txt").await.unwrap(), b"hello");
        assert!(store.exists("owner/one.txt").await.unwrap());

        store.delete("owner/one.txt").await.unwrap();
        assert!(!store.exists("owner/one.txt").await.unwrap());
        // Deleting again is fine.
        store.delete("owner/one.txt").await.unwrap();
    }

    #[tokio::test]
    async fn traversal_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStoragePort::new(dir.path().join("blobs"));
        assert!(store.put("../escape.txt", b"x", None).await.is_err());
        assert!(store.get("../../etc/passwd").await.is_err());
        assert!(!dir.path().join("escape.txt").exists());
    }
}
