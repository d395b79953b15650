use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::records::{Page, Record, RecordFilter};

/// Storage for one catalog record kind. A reference to a missing row is
/// reported as a `ValidationError::UnknownReference` inside the error.
#[async_trait]
pub trait RecordRepository<R: Record>: Send + Sync {
    async fn list(&self, filter: &RecordFilter) -> anyhow::Result<Page<R>>;

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<R>>;

    async fn create(&self, created_by: Uuid, draft: &R::Draft) -> anyhow::Result<R>;

    async fn update(&self, id: Uuid, draft: &R::Draft) -> anyhow::Result<Option<R>>;

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}
