use uuid::Uuid;

use super::{FolderError, ShareMode};
use crate::application::access::{self, Actor};
use crate::application::ports::files_repository::FilesRepository;
use crate::domain::access::role::{Action, Resource};
use crate::domain::files::folder::{StoredFile, remove_grantees, union_grantees};

pub struct ShareFile<'a, FI: FilesRepository + ?Sized> {
    pub files: &'a FI,
}

impl<'a, FI: FilesRepository + ?Sized> ShareFile<'a, FI> {
    pub async fn execute(
        &self,
        actor: &Actor,
        id: Uuid,
        user_ids: &[Uuid],
        mode: ShareMode,
    ) -> anyhow::Result<StoredFile> {
        access::require(actor, Resource::Files, Action::Write)?;
        let mut file = self
            .files
            .get_file(id)
            .await?
            .filter(|f| access::can_view(actor, f))
            .ok_or(FolderError::NotFound)?;
        if !access::can_manage(actor, &file) {
            return Err(FolderError::Forbidden.into());
        }
        let next = match mode {
            ShareMode::Grant => union_grantees(&file.shared_with, user_ids, file.owner_id),
            ShareMode::Revoke => remove_grantees(&file.shared_with, user_ids),
        };
        if next != file.shared_with {
            self.files.set_shared_with(id, &next).await?;
            file.shared_with = next;
        }
        Ok(file)
    }
}
