use uuid::Uuid;

use super::{FolderError, tree};
use crate::application::access::{self, Actor};
use crate::application::ports::files_repository::FilesRepository;
use crate::application::ports::storage_port::StoragePort;
use crate::domain::access::role::{Action, Resource};

pub struct DeleteFile<'a, FI, S>
where
    FI: FilesRepository + ?Sized,
    S: StoragePort + ?Sized,
{
    pub files: &'a FI,
    pub storage: &'a S,
}

impl<'a, FI, S> DeleteFile<'a, FI, S>
where
    FI: FilesRepository + ?Sized,
    S: StoragePort + ?Sized,
{
    pub async fn execute(&self, actor: &Actor, id: Uuid) -> anyhow::Result<()> {
        access::require(actor, Resource::Files, Action::Write)?;
        let file = self
            .files
            .get_file(id)
            .await?
            .filter(|f| access::can_view(actor, f))
            .ok_or(FolderError::NotFound)?;
        if !access::can_manage(actor, &file) {
            return Err(FolderError::Forbidden.into());
        }
        if !tree::delete_stored_file(self.files, self.storage, &file).await? {
            return Err(FolderError::NotFound.into());
        }
        Ok(())
    }
}
