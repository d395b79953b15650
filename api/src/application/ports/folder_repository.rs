use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::files::folder::Folder;

#[async_trait]
pub trait FolderRepository: Send + Sync {
    async fn create(
        &self,
        owner_id: Uuid,
        name: &str,
        parent_id: Option<Uuid>,
        shared_with: &[Uuid],
    ) -> anyhow::Result<Folder>;

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Folder>>;

    /// Folders whose parent pointer equals `parent_id` (`None` = top level).
    async fn list_children(&self, parent_id: Option<Uuid>) -> anyhow::Result<Vec<Folder>>;

    async fn update(
        &self,
        id: Uuid,
        name: &str,
        parent_id: Option<Uuid>,
    ) -> anyhow::Result<Option<Folder>>;

    async fn set_shared_with(&self, id: Uuid, shared_with: &[Uuid]) -> anyhow::Result<()>;

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;

    async fn list_shared_with(&self, user_id: Uuid) -> anyhow::Result<Vec<Folder>>;

    async fn list_owned(&self, owner_id: Uuid) -> anyhow::Result<Vec<Folder>>;
}
