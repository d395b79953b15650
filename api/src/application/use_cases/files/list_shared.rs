use crate::application::access::{self, Actor};
use crate::application::ports::files_repository::FilesRepository;
use crate::application::ports::folder_repository::FolderRepository;
use crate::domain::access::role::{Action, Resource};
use crate::domain::files::folder::{Folder, StoredFile};

pub struct SharedWithMe {
    pub folders: Vec<Folder>,
    pub files: Vec<StoredFile>,
}

pub struct ListShared<'a, FR, FI>
where
    FR: FolderRepository + ?Sized,
    FI: FilesRepository + ?Sized,
{
    pub folders: &'a FR,
    pub files: &'a FI,
}

impl<'a, FR, FI> ListShared<'a, FR, FI>
where
    FR: FolderRepository + ?Sized,
    FI: FilesRepository + ?Sized,
{
    pub async fn execute(&self, actor: &Actor) -> anyhow::Result<SharedWithMe> {
        access::require(actor, Resource::Files, Action::Read)?;
        Ok(SharedWithMe {
            folders: self.folders.list_shared_with(actor.user_id).await?,
            files: self.files.list_shared_with(actor.user_id).await?,
        })
    }
}
