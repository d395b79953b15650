use uuid::Uuid;

use super::{FolderError, tree};
use crate::application::access::{self, Actor};
use crate::application::ports::folder_repository::FolderRepository;
use crate::domain::access::role::{Action, Resource};
use crate::domain::files::folder::{Folder, sanitize_name};

#[derive(Debug, Clone, Default)]
pub struct FolderPatch {
    pub name: Option<String>,
    /// `Some(None)` moves the folder to the top level.
    pub parent_id: Option<Option<Uuid>>,
}

pub struct UpdateFolder<'a, FR: FolderRepository + ?Sized> {
    pub folders: &'a FR,
    pub max_depth: usize,
}

impl<'a, FR: FolderRepository + ?Sized> UpdateFolder<'a, FR> {
    pub async fn execute(
        &self,
        actor: &Actor,
        id: Uuid,
        patch: &FolderPatch,
    ) -> anyhow::Result<Folder> {
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

        let name = patch
            .name
            .as_deref()
            .map(sanitize_name)
            .unwrap_or_else(|| folder.name.clone());
        let parent_id = patch.parent_id.unwrap_or(folder.parent_id);
        if parent_id != folder.parent_id {
            if let Some(pid) = parent_id {
                let target = self
                    .folders
                    .get(pid)
                    .await?
                    .filter(|p| access::can_view(actor, p))
                    .ok_or(FolderError::NotFound)?;
                if tree::is_within(self.folders, &target, id, self.max_depth).await? {
                    return Err(FolderError::Cycle.into());
                }
                self.ensure_fits_under(&target, &folder).await?;
            }
        }

        let updated = self
            .folders
            .update(id, &name, parent_id)
            .await?
            .ok_or(FolderError::NotFound)?;
        Ok(updated)
    }

    /// The moved subtree must keep every folder within the depth that
    /// creation allows, otherwise it could no longer be walked or deleted.
    async fn ensure_fits_under(&self, target: &Folder, folder: &Folder) -> anyhow::Result<()> {
        let too_deep = || FolderError::TooDeep(self.max_depth);
        let depth = tree::ancestors(self.folders, target, self.max_depth)
            .await?
            .len()
            + 1;
        if depth >= self.max_depth {
            return Err(too_deep().into());
        }
        let room = self.max_depth - 1 - depth;
        match tree::collect_subtree(self.folders, folder.clone(), room).await {
            Ok(_) => Ok(()),
            Err(e) if matches!(e.downcast_ref::<FolderError>(), Some(FolderError::TooDeep(_))) => {
                Err(too_deep().into())
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::MemFolders;
    use crate::domain::access::role::Role;

    #[tokio::test]
    async fn moving_into_a_descendant_is_a_cycle() {
        let folders = MemFolders::default();
        let owner = Actor::new(Uuid::new_v4(), Role::Staff);
        let root = folders.seed(owner.user_id, "root", None);
        let child = folders.seed(owner.user_id, "child", Some(root.id));
        let grandchild = folders.seed(owner.user_id, "grandchild", Some(child.id));
        let uc = UpdateFolder {
            folders: &folders,
            max_depth: 8,
        };

        for target in [root.id, grandchild.id] {
            let err = uc
                .execute(
                    &owner,
                    root.id,
                    &FolderPatch {
                        parent_id: Some(Some(target)),
                        ..Default::default()
                    },
                )
                .await
                .unwrap_err();
            assert_eq!(err.downcast_ref::<FolderError>(), Some(&FolderError::Cycle));
        }

        let moved = uc
            .execute(
                &owner,
                grandchild.id,
                &FolderPatch {
                    name: Some("archive".into()),
                    parent_id: Some(None),
                },
            )
            .await
            .unwrap();
        assert_eq!(moved.parent_id, None);
        assert_eq!(moved.name, "archive");
    }

    #[tokio::test]
    async fn moves_that_exceed_the_depth_limit_are_rejected() {
        let folders = MemFolders::default();
        let owner = Actor::new(Uuid::new_v4(), Role::Staff);
        let a0 = folders.seed(owner.user_id, "a0", None);
        let a1 = folders.seed(owner.user_id, "a1", Some(a0.id));
        let a2 = folders.seed(owner.user_id, "a2", Some(a1.id));
        let b0 = folders.seed(owner.user_id, "b0", None);
        let b1 = folders.seed(owner.user_id, "b1", Some(b0.id));
        let b2 = folders.seed(owner.user_id, "b2", Some(b1.id));
        let uc = UpdateFolder {
            folders: &folders,
            max_depth: 3,
        };
        let (uc, owner) = (&uc, &owner);
        let move_under = |id: Uuid, parent: Uuid| {
            let patch = FolderPatch {
                parent_id: Some(Some(parent)),
                ..Default::default()
            };
            async move { uc.execute(owner, id, &patch).await }
        };

        for (id, parent) in [(b0.id, a2.id), (b0.id, a0.id), (b1.id, a1.id)] {
            let err = move_under(id, parent).await.unwrap_err();
            assert_eq!(
                err.downcast_ref::<FolderError>(),
                Some(&FolderError::TooDeep(3))
            );
        }
        assert_eq!(folders.get_sync(b0.id).parent_id, None);
        assert_eq!(folders.get_sync(b1.id).parent_id, Some(b0.id));

        let subtree = tree::collect_subtree(&folders, folders.get_sync(a0.id), 3)
            .await
            .unwrap();
        assert_eq!(subtree.len(), 3);

        let moved = move_under(b2.id, a1.id).await.unwrap();
        assert_eq!(moved.parent_id, Some(a1.id));
        let moved = move_under(b1.id, a0.id).await.unwrap();
        assert_eq!(moved.parent_id, Some(a0.id));
    }

    #[tokio::test]
    async fn grantees_cannot_rename() {
        let folders = MemFolders::default();
        let grantee = Actor::new(Uuid::new_v4(), Role::Staff);
        let f = folders.seed(Uuid::new_v4(), "shared", None);
        folders.share(f.id, &[grantee.user_id]);
        let err = UpdateFolder {
            folders: &folders,
            max_depth: 8,
        }
        .execute(
            &grantee,
            f.id,
            &FolderPatch {
                name: Some("mine".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.downcast_ref::<FolderError>(), Some(&FolderError::Forbidden));
    }
}
