use uuid::Uuid;

use super::tree;
use crate::application::access::{self, Actor};
use crate::application::ports::folder_repository::FolderRepository;
use crate::domain::access::role::{Action, Resource};
use crate::domain::files::folder::Folder;

pub struct FolderView {
    pub folder: Folder,
    /// Breadcrumb, outermost first. Stops below the first ancestor the
    /// actor cannot see.
    pub path: Vec<Folder>,
}

pub struct GetFolder<'a, FR: FolderRepository + ?Sized> {
    pub folders: &'a FR,
    pub max_depth: usize,
}

impl<'a, FR: FolderRepository + ?Sized> GetFolder<'a, FR> {
    pub async fn execute(&self, actor: &Actor, id: Uuid) -> anyhow::Result<Option<FolderView>> {
        access::require(actor, Resource::Files, Action::Read)?;
        let folder = match self.folders.get(id).await? {
            Some(f) if access::can_view(actor, &f) => f,
            _ => return Ok(None),
        };
        let chain = tree::ancestors(self.folders, &folder, self.max_depth).await?;
        let mut path: Vec<Folder> = chain
            .into_iter()
            .rev()
            .take_while(|a| access::can_view(actor, a))
            .collect();
        path.reverse();
        Ok(Some(FolderView { folder, path }))
    }
}
