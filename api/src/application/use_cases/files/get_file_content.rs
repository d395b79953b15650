use uuid::Uuid;

use crate::application::access::{self, Actor};
use crate::application::ports::files_repository::FilesRepository;
use crate::application::ports::storage_port::StoragePort;
use crate::domain::access::role::{Action, Resource};
use crate::domain::files::folder::StoredFile;

pub struct FileContent {
    pub file: StoredFile,
    pub bytes: Vec<u8>,
}

pub struct GetFileContent<'a, FI, S>
where
    FI: FilesRepository + ?Sized,
    S: StoragePort + ?Sized,
{
    pub files: &'a FI,
    pub storage: &'a S,
}

impl<'a, FI, S> GetFileContent<'a, FI, S>
where
    FI: FilesRepository + ?Sized,
    S: StoragePort + ?Sized,
{
    pub async fn execute(&self, actor: &Actor, id: Uuid) -> anyhow::Result<Option<FileContent>> {
        access::require(actor, Resource::Files, Action::Read)?;
        let file = match self.files.get_file(id).await? {
            Some(f) if access::can_view(actor, &f) => f,
            _ => return Ok(None),
        };
        let Some(key) = file.storage_key.clone() else {
            return Ok(None);
        };
        if !self.storage.exists(&key).await? {
            tracing::warn!(file_id = %id, storage_key = %key, "file_blob_missing");
            return Ok(None);
        }
        let bytes = self.storage.get(&key).await?;
        Ok(Some(FileContent { file, bytes }))
    }
}
