use uuid::Uuid;

use super::FolderError;
use super::tree;
use crate::application::access::{self, Actor};
use crate::application::ports::folder_repository::FolderRepository;
use crate::domain::access::role::{Action, Resource};
use crate::domain::files::folder::{Folder, sanitize_name, union_grantees};

pub struct CreateFolder<'a, FR: FolderRepository + ?Sized> {
    pub folders: &'a FR,
    pub max_depth: usize,
}

impl<'a, FR: FolderRepository + ?Sized> CreateFolder<'a, FR> {
    /// A child folder inherits the parent's grantees, and the parent's
    /// owner can see it too.
    pub async fn execute(
        &self,
        actor: &Actor,
        name: &str,
        parent_id: Option<Uuid>,
    ) -> anyhow::Result<Folder> {
        access::require(actor, Resource::Files, Action::Write)?;
        let name = sanitize_name(name);
        let shared_with = match parent_id {
            None => Vec::new(),
            Some(pid) => {
                let parent = self
                    .folders
                    .get(pid)
                    .await?
                    .filter(|p| access::can_view(actor, p))
                    .ok_or(FolderError::NotFound)?;
                let depth = tree::ancestors(self.folders, &parent, self.max_depth)
                    .await?
                    .len()
                    + 1;
                if depth >= self.max_depth {
                    return Err(FolderError::TooDeep(self.max_depth).into());
                }
                let mut inherited = parent.shared_with.clone();
                inherited.push(parent.owner_id);
                union_grantees(&[], &inherited, actor.user_id)
            }
        };
        let folder = self
            .folders
            .create(actor.user_id, &name, parent_id, &shared_with)
            .await?;
        tracing::debug!(folder_id = %folder.id, parent_id = ?parent_id, "folder_created");
        Ok(folder)
    }
}
