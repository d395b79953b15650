use uuid::Uuid;

use super::FolderError;
use super::tree::{self, DeleteReport};
use crate::application::access::{self, Actor};
use crate::application::ports::files_repository::FilesRepository;
use crate::application::ports::folder_repository::FolderRepository;
use crate::application::ports::storage_port::StoragePort;
use crate::domain::access::role::{Action, Resource};

pub struct DeleteFolder<'a, FR, FI, S>
where
    FR: FolderRepository + ?Sized,
    FI: FilesRepository + ?Sized,
    S: StoragePort + ?Sized,
{
    pub folders: &'a FR,
    pub files: &'a FI,
    pub storage: &'a S,
    pub max_depth: usize,
}

impl<'a, FR, FI, S> DeleteFolder<'a, FR, FI, S>
where
    FR: FolderRepository + ?Sized,
    FI: FilesRepository + ?Sized,
    S: StoragePort + ?Sized,
{
    pub async fn execute(&self, actor: &Actor, id: Uuid) -> anyhow::Result<DeleteReport> {
        access::require(actor, Resource::Files, Action::Write)?;
        let folder = self
            .folders
            .get(id)
            .await?
            .filter(|f| access::can_view(actor, f))
            .ok_or(FolderError::NotFound)?;
        if !access::can_manage(actor, &folder) {
            return Err(FolderError::Forbidden.into());
        }
        tree::delete_subtree(self.folders, self.files, self.storage, folder, self.max_depth).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{MemBlobs, MemFiles, MemFolders};
    use crate::domain::access::role::Role;

    #[tokio::test]
    async fn removes_every_descendant_including_foreign_files() {
        let folders = MemFolders::default();
        let files = MemFiles::default();
        let blobs = MemBlobs::default();
        let owner = Actor::new(Uuid::new_v4(), Role::Manager);
        let colleague = Uuid::new_v4();

        let root = folders.seed(owner.user_id, "Program A", None);
        let sub = folders.seed(owner.user_id, "Receipts", Some(root.id));
        let deep = folders.seed(colleague, "March", Some(sub.id));
        let sibling = folders.seed(owner.user_id, "Keep me", None);
        files.seed(colleague, "r1.pdf", Some(deep.id), Some("c/r1"));
        files.seed(owner.user_id, "plan.docx", Some(root.id), Some("o/plan"));
        files.seed(owner.user_id, "top.txt", None, Some("o/top"));
        blobs.insert("c/r1", b"1");
        blobs.insert("o/plan", b"2");
        blobs.insert("o/top", b"3");

        let report = DeleteFolder {
            folders: &folders,
            files: &files,
            storage: &blobs,
            max_depth: 8,
        }
        .execute(&owner, root.id)
        .await
        .unwrap();

        assert_eq!(report.folders_deleted, 3);
        assert_eq!(report.files_deleted, 2);
        assert_eq!(folders.ids(), vec![sibling.id]);
        assert_eq!(files.len(), 1);
        assert!(blobs.contains("o/top"));
        assert!(!blobs.contains("c/r1"));
    }

    #[tokio::test]
    async fn grantees_cannot_delete() {
        let folders = MemFolders::default();
        let files = MemFiles::default();
        let blobs = MemBlobs::default();
        let grantee = Actor::new(Uuid::new_v4(), Role::Staff);
        let f = folders.seed(Uuid::new_v4(), "shared", None);
        folders.share(f.id, &[grantee.user_id]);

        let err = DeleteFolder {
            folders: &folders,
            files: &files,
            storage: &blobs,
            max_depth: 8,
        }
        .execute(&grantee, f.id)
        .await
        .unwrap_err();
        assert_eq!(err.downcast_ref::<FolderError>(), Some(&FolderError::Forbidden));
        assert_eq!(folders.ids(), vec![f.id]);
    }
}
