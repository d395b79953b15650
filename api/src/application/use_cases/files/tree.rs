use std::collections::HashSet;

use uuid::Uuid;

use super::FolderError;
use crate::application::ports::files_repository::FilesRepository;
use crate::application::ports::folder_repository::FolderRepository;
use crate::application::ports::storage_port::StoragePort;
use crate::domain::files::folder::{Folder, StoredFile};

/// Folders of the subtree rooted at `root` in pre-order, root first.
/// Fails before touching anything if the tree is deeper than `max_depth`.
pub async fn collect_subtree<FR>(
    folders: &FR,
    root: Folder,
    max_depth: usize,
) -> anyhow::Result<Vec<Folder>>
where
    FR: FolderRepository + ?Sized,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    let mut stack = vec![(root, 0usize)];
    while let Some((folder, depth)) = stack.pop() {
        if !seen.insert(folder.id) {
            tracing::warn!(folder_id = %folder.id, "folder_cycle_skipped");
            continue;
        }
        let children = folders.list_children(Some(folder.id)).await?;
        if !children.is_empty() && depth + 1 > max_depth {
            return Err(FolderError::TooDeep(max_depth).into());
        }
        out.push(folder);
        // Reverse so the first child is visited first.
        for child in children.into_iter().rev() {
            stack.push((child, depth + 1));
        }
    }
    Ok(out)
}

/// Ancestors of `folder`, outermost first, excluding the folder itself.
pub async fn ancestors<FR>(
    folders: &FR,
    folder: &Folder,
    max_depth: usize,
) -> anyhow::Result<Vec<Folder>>
where
    FR: FolderRepository + ?Sized,
{
    let mut chain = Vec::new();
    let mut next = folder.parent_id;
    while let Some(parent_id) = next {
        if chain.len() >= max_depth || parent_id == folder.id {
            return Err(FolderError::TooDeep(max_depth).into());
        }
        match folders.get(parent_id).await? {
            Some(parent) => {
                next = parent.parent_id;
                chain.push(parent);
            }
            None => break,
        }
    }
    chain.reverse();
    Ok(chain)
}

/// True when `candidate` is `folder_id` or sits somewhere below it.
pub async fn is_within<FR>(
    folders: &FR,
    candidate: &Folder,
    folder_id: Uuid,
    max_depth: usize,
) -> anyhow::Result<bool>
where
    FR: FolderRepository + ?Sized,
{
    if candidate.id == folder_id {
        return Ok(true);
    }
    Ok(ancestors(folders, candidate, max_depth)
        .await?
        .iter()
        .any(|a| a.id == folder_id))
}

/// Deletes the blob (if any) and then the record. Blob failures are logged
/// and do not stop the record deletion.
pub async fn delete_stored_file<FI, S>(
    files: &FI,
    storage: &S,
    file: &StoredFile,
) -> anyhow::Result<bool>
where
    FI: FilesRepository + ?Sized,
    S: StoragePort + ?Sized,
{
    if let Some(key) = file.storage_key.as_deref() {
        if let Err(err) = storage.delete(key).await {
            tracing::warn!(error = ?err, file_id = %file.id, storage_key = %key, "blob_delete_failed");
        }
    }
    files.delete_file(file.id).await
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteReport {
    pub folders_deleted: usize,
    pub files_deleted: usize,
}

/// Deletes the subtree children first: each folder's files (blob, then
/// record), then the folder record, ending with `root` itself.
pub async fn delete_subtree<FR, FI, S>(
    folders: &FR,
    files: &FI,
    storage: &S,
    root: Folder,
    max_depth: usize,
) -> anyhow::Result<DeleteReport>
where
    FR: FolderRepository + ?Sized,
    FI: FilesRepository + ?Sized,
    S: StoragePort + ?Sized,
{
    let root_id = root.id;
    let subtree = collect_subtree(folders, root, max_depth).await?;
    let mut report = DeleteReport::default();
    for folder in subtree.iter().rev() {
        for file in files.list_in_folder(Some(folder.id)).await? {
            if delete_stored_file(files, storage, &file).await? {
                report.files_deleted += 1;
            }
        }
        if folders.delete(folder.id).await? {
            report.folders_deleted += 1;
        }
    }
    tracing::info!(
        folder_id = %root_id,
        folders_deleted = report.folders_deleted,
        files_deleted = report.files_deleted,
        "folder_tree_deleted"
    );
    Ok(report)
}
