use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::files::folder::{NewFile, StoredFile};

#[async_trait]
pub trait FilesRepository: Send + Sync {
    async fn insert_file(&self, file: &NewFile) -> anyhow::Result<StoredFile>;

    async fn get_file(&self, id: Uuid) -> anyhow::Result<Option<StoredFile>>;

    /// Files whose folder pointer equals `folder_id` (`None` = top level).
    async fn list_in_folder(&self, folder_id: Option<Uuid>) -> anyhow::Result<Vec<StoredFile>>;

    async fn set_shared_with(&self, id: Uuid, shared_with: &[Uuid]) -> anyhow::Result<()>;

    async fn delete_file(&self, id: Uuid) -> anyhow::Result<bool>;

    async fn list_shared_with(&self, user_id: Uuid) -> anyhow::Result<Vec<StoredFile>>;

    async fn list_owned(&self, owner_id: Uuid) -> anyhow::Result<Vec<StoredFile>>;
}
