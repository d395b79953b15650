use uuid::Uuid;

use crate::application::access::{self, Actor};
use crate::application::ports::files_repository::FilesRepository;
use crate::domain::access::role::{Action, Resource};
use crate::domain::files::folder::StoredFile;

pub struct GetFile<'a, FI: FilesRepository + ?Sized> {
    pub files: &'a FI,
}

impl<'a, FI: FilesRepository + ?Sized> GetFile<'a, FI> {
    pub async fn execute(&self, actor: &Actor, id: Uuid) -> anyhow::Result<Option<StoredFile>> {
        access::require(actor, Resource::Files, Action::Read)?;
        Ok(self
            .files
            .get_file(id)
            .await?
            .filter(|f| access::can_view(actor, f)))
    }
}
