use uuid::Uuid;

use super::FolderError;
use crate::application::access::{self, Actor};
use crate::application::ports::files_repository::FilesRepository;
use crate::application::ports::folder_repository::FolderRepository;
use crate::domain::access::role::{Action, Resource};
use crate::domain::files::folder::{Folder, StoredFile};

pub struct FolderListing {
    pub folder: Option<Folder>,
    pub folders: Vec<Folder>,
    pub files: Vec<StoredFile>,
}

pub struct ListFolder<'a, FR, FI>
where
    FR: FolderRepository + ?Sized,
    FI: FilesRepository + ?Sized,
{
    pub folders: &'a FR,
    pub files: &'a FI,
}

impl<'a, FR, FI> ListFolder<'a, FR, FI>
where
    FR: FolderRepository + ?Sized,
    FI: FilesRepository + ?Sized,
{
    /// Visible children of `parent_id`, or of the top level when `None`.
    pub async fn execute(
        &self,
        actor: &Actor,
        parent_id: Option<Uuid>,
    ) -> anyhow::Result<FolderListing> {
        access::require(actor, Resource::Files, Action::Read)?;
        let folder = match parent_id {
            Some(id) => Some(
                self.folders
                    .get(id)
                    .await?
                    .filter(|f| access::can_view(actor, f))
                    .ok_or(FolderError::NotFound)?,
            ),
            None => None,
        };
        let folders = self
            .folders
            .list_children(parent_id)
            .await?
            .into_iter()
            .filter(|f| access::can_view(actor, f))
            .collect();
        let files = self
            .files
            .list_in_folder(parent_id)
            .await?
            .into_iter()
            .filter(|f| access::can_view(actor, f))
            .collect();
        Ok(FolderListing {
            folder,
            folders,
            files,
        })
    }
}
