use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub key: String,
    pub size: i64,
    pub content_hash: String,
}

/// Blob storage backing uploaded files. Keys are `/`-separated relative paths.
#[async_trait]
pub trait StoragePort: Send + Sync {
    async fn put(
        &self,
        key: &str,
        bytes: &[u8],
        content_type: Option<&str>,
    ) -> anyhow::Result<StoredBlob>;

    async fn get(&self, key: &str) -> anyhow::Result<Vec<u8>>;

    /// Deleting a missing blob is not an error.
    async fn delete(&self, key: &str) -> anyhow::Result<()>;

    async fn exists(&self, key: &str) -> anyhow::Result<bool>;
}
