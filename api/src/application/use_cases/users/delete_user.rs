use uuid::Uuid;

use super::UserError;
use crate::application::access::{self, Actor};
use crate::application::ports::files_repository::FilesRepository;
use crate::application::ports::folder_repository::FolderRepository;
use crate::application::ports::storage_port::StoragePort;
use crate::application::ports::user_repository::UserRepository;
use crate::application::use_cases::files::tree;
use crate::domain::access::role::{Action, Resource};

pub struct DeleteUser<'a, UR, FR, FI, S>
where
    UR: UserRepository + ?Sized,
    FR: FolderRepository + ?Sized,
    FI: FilesRepository + ?Sized,
    S: StoragePort + ?Sized,
{
    pub users: &'a UR,
    pub folders: &'a FR,
    pub files: &'a FI,
    pub storage: &'a S,
    pub max_depth: usize,
}

impl<'a, UR, FR, FI, S> DeleteUser<'a, UR, FR, FI, S>
where
    UR: UserRepository + ?Sized,
    FR: FolderRepository + ?Sized,
    FI: FilesRepository + ?Sized,
    S: StoragePort + ?Sized,
{
    /// Removes the user's folder trees and files, then the user. Returns
    /// false when the user does not exist.
    pub async fn execute(&self, actor: &Actor, id: Uuid) -> anyhow::Result<bool> {
        access::require(actor, Resource::Users, Action::Write)?;
        if id == actor.user_id {
            return Err(UserError::SelfDeletion.into());
        }
        if self.users.find_by_id(id).await?.is_none() {
            return Ok(false);
        }

        for folder in self.folders.list_owned(id).await? {
            // An earlier tree may already have taken this one with it.
            if let Some(folder) = self.folders.get(folder.id).await? {
                tree::delete_subtree(self.folders, self.files, self.storage, folder, self.max_depth)
                    .await?;
            }
        }
        for file in self.files.list_owned(id).await? {
            tree::delete_stored_file(self.files, self.storage, &file).await?;
        }

        let deleted = self.users.delete_user(id).await?;
        anyhow::ensure!(deleted, "user not found");
        tracing::info!(user_id = %id, by = %actor.user_id, "user_deleted");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{MemBlobs, MemFiles, MemFolders, MemUsers};
    use crate::domain::access::role::Role;

    #[tokio::test]
    async fn removes_owned_trees_and_files() {
        let users = MemUsers::default();
        let folders = MemFolders::default();
        let files = MemFiles::default();
        let blobs = MemBlobs::default();
        let admin = users.seed("a@ngo.org", "admin");
        let leaver = users.seed("l@ngo.org", "staff");
        let other = users.seed("o@ngo.org", "staff");

        let theirs = folders.seed(leaver.id, "Mine", None);
        folders.seed(leaver.id, "Nested", Some(theirs.id));
        let kept = folders.seed(other.id, "Team", None);
        files.seed(leaver.id, "in-team.txt", Some(kept.id), Some("l/x"));
        files.seed(other.id, "keep.txt", Some(kept.id), Some("o/y"));
        blobs.insert("l/x", b"x");

        let uc = DeleteUser {
            users: &users,
            folders: &folders,
            files: &files,
            storage: &blobs,
            max_depth: 8,
        };
        let actor = Actor::new(admin.id, Role::Admin);
        assert!(uc.execute(&actor, leaver.id).await.unwrap());
        assert_eq!(folders.ids(), vec![kept.id]);
        assert_eq!(files.len(), 1);
        assert!(!blobs.contains("l/x"));
        assert!(users.find_by_id(leaver.id).await.unwrap().is_none());

        let err = uc.execute(&actor, admin.id).await.unwrap_err();
        assert_eq!(err.downcast_ref::<UserError>(), Some(&UserError::SelfDeletion));
        assert!(!uc.execute(&actor, Uuid::new_v4()).await.unwrap());
    }
}
