use uuid::Uuid;

use super::{FolderError, ShareMode, tree};
use crate::application::access::{self, Actor};
use crate::application::ports::files_repository::FilesRepository;
use crate::application::ports::folder_repository::FolderRepository;
use crate::domain::access::role::{Action, Resource};
use crate::domain::files::folder::{remove_grantees, union_grantees};

pub struct ShareFolder<'a, FR, FI>
where
    FR: FolderRepository + ?Sized,
    FI: FilesRepository + ?Sized,
{
    pub folders: &'a FR,
    pub files: &'a FI,
    pub max_depth: usize,
}

impl<'a, FR, FI> ShareFolder<'a, FR, FI>
where
    FR: FolderRepository + ?Sized,
    FI: FilesRepository + ?Sized,
{
    /// Grants or revokes `user_ids` on the folder and everything below it.
    /// Returns how many folder and file records changed.
    pub async fn execute(
        &self,
        actor: &Actor,
        id: Uuid,
        user_ids: &[Uuid],
        mode: ShareMode,
    ) -> anyhow::Result<usize> {
        access::require(actor, Resource::Files, Action::Write)?;
        let root = self
            .folders
            .get(id)
            .await?
            .filter(|f| access::can_view(actor, f))
            .ok_or(FolderError::NotFound)?;
        if !access::can_manage(actor, &root) {
            return Err(FolderError::Forbidden.into());
        }

        let subtree = tree::collect_subtree(self.folders, root, self.max_depth).await?;
        let mut touched = 0;
        for folder in &subtree {
            let next = match mode {
                ShareMode::Grant => union_grantees(&folder.shared_with, user_ids, folder.owner_id),
                ShareMode::Revoke => remove_grantees(&folder.shared_with, user_ids),
            };
            if next != folder.shared_with {
                self.folders.set_shared_with(folder.id, &next).await?;
                touched += 1;
            }
            for file in self.files.list_in_folder(Some(folder.id)).await? {
                let next = match mode {
                    ShareMode::Grant => union_grantees(&file.shared_with, user_ids, file.owner_id),
                    ShareMode::Revoke => remove_grantees(&file.shared_with, user_ids),
                };
                if next != file.shared_with {
                    self.files.set_shared_with(file.id, &next).await?;
                    touched += 1;
                }
            }
        }
        tracing::info!(folder_id = %id, mode = ?mode, grantees = user_ids.len(), touched, "folder_tree_shared");
        Ok(touched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{MemFiles, MemFolders};
    use crate::domain::access::role::Role;

    #[tokio::test]
    async fn grant_is_a_set_union_over_the_subtree() {
        let folders = MemFolders::default();
        let files = MemFiles::default();
        let owner = Actor::new(Uuid::new_v4(), Role::Staff);
        let (ann, ben) = (Uuid::new_v4(), Uuid::new_v4());
        let root = folders.seed(owner.user_id, "root", None);
        let child = folders.seed(owner.user_id, "child", Some(root.id));
        folders.share(child.id, &[ann]);
        let file = files.seed(owner.user_id, "f.txt", Some(child.id), Some("k"));

        let uc = ShareFolder {
            folders: &folders,
            files: &files,
            max_depth: 8,
        };
        let touched = uc
            .execute(&owner, root.id, &[ann, ben, owner.user_id], ShareMode::Grant)
            .await
            .unwrap();
        assert_eq!(touched, 3);
        assert_eq!(folders.get_sync(root.id).shared_with, vec![ann, ben]);
        assert_eq!(folders.get_sync(child.id).shared_with, vec![ann, ben]);
        assert_eq!(files.get_sync(file.id).shared_with, vec![ann, ben]);

        // Sharing again changes nothing.
        let touched = uc
            .execute(&owner, root.id, &[ann], ShareMode::Grant)
            .await
            .unwrap();
        assert_eq!(touched, 0);

        uc.execute(&owner, root.id, &[ann], ShareMode::Revoke)
            .await
            .unwrap();
        assert_eq!(folders.get_sync(child.id).shared_with, vec![ben]);
        assert_eq!(files.get_sync(file.id).shared_with, vec![ben]);
    }
}
