use uuid::Uuid;

use super::FolderError;
use crate::application::access::{self, Actor};
use crate::application::ports::files_repository::FilesRepository;
use crate::application::ports::folder_repository::FolderRepository;
use crate::application::ports::storage_port::StoragePort;
use crate::domain::access::role::{Action, Resource};
use crate::domain::files::folder::{NewFile, StoredFile, sanitize_name, union_grantees};

pub struct UploadFile<'a, FI, FR, S>
where
    FI: FilesRepository + ?Sized,
    FR: FolderRepository + ?Sized,
    S: StoragePort + ?Sized,
{
    pub files: &'a FI,
    pub folders: &'a FR,
    pub storage: &'a S,
}

pub fn storage_key(owner_id: Uuid, filename: &str) -> String {
    format!("{}/{}_{}", owner_id, Uuid::new_v4(), filename)
}

/// Declared type unless it is missing or generic, else a guess from the name.
pub fn resolve_content_type(declared: Option<&str>, filename: &str) -> Option<String> {
    match declared.map(str::trim) {
        Some(ct) if !ct.is_empty() && ct != "application/octet-stream" => Some(ct.to_string()),
        _ => mime_guess::from_path(filename)
            .first_raw()
            .map(str::to_string)
            .or_else(|| declared.map(str::to_string)),
    }
}

impl<'a, FI, FR, S> UploadFile<'a, FI, FR, S>
where
    FI: FilesRepository + ?Sized,
    FR: FolderRepository + ?Sized,
    S: StoragePort + ?Sized,
{
    pub async fn execute(
        &self,
        actor: &Actor,
        folder_id: Option<Uuid>,
        bytes: Vec<u8>,
        orig_filename: Option<String>,
        content_type: Option<String>,
    ) -> anyhow::Result<StoredFile> {
        access::require(actor, Resource::Files, Action::Write)?;
        let shared_with = match folder_id {
            None => Vec::new(),
            Some(fid) => {
                let folder = self
                    .folders
                    .get(fid)
                    .await?
                    .filter(|f| access::can_view(actor, f))
                    .ok_or(FolderError::NotFound)?;
                let mut inherited = folder.shared_with.clone();
                inherited.push(folder.owner_id);
                union_grantees(&[], &inherited, actor.user_id)
            }
        };

        let name = sanitize_name(orig_filename.as_deref().unwrap_or("upload"));
        let key = storage_key(actor.user_id, &name);
        let content_type = resolve_content_type(content_type.as_deref(), &name);
        let stored = self
            .storage
            .put(&key, &bytes, content_type.as_deref())
            .await
            .map_err(|err| {
                tracing::error!(error = ?err, storage_key = %key, "blob_put_failed");
                err
            })?;

        let record = NewFile {
            name,
            folder_id,
            owner_id: actor.user_id,
            storage_key: stored.key.clone(),
            content_type,
            size: stored.size,
            content_hash: stored.content_hash,
            shared_with,
        };
        match self.files.insert_file(&record).await {
            Ok(file) => Ok(file),
            Err(err) => {
                tracing::error!(error = ?err, storage_key = %stored.key, "insert_file_failed");
                if let Err(cleanup) = self.storage.delete(&stored.key).await {
                    tracing::warn!(error = ?cleanup, storage_key = %stored.key, "orphan_blob_cleanup_failed");
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{MemBlobs, MemFiles, MemFolders};
    use crate::domain::access::role::Role;

    #[test]
    fn content_type_falls_back_to_extension() {
        assert_eq!(
            resolve_content_type(None, "photo.png").as_deref(),
            Some("image/png")
        );
        assert_eq!(
            resolve_content_type(Some("application/octet-stream"), "report.pdf").as_deref(),
            Some("application/pdf")
        );
        assert_eq!(
            resolve_content_type(Some("text/csv"), "data.bin").as_deref(),
            Some("text/csv")
        );
        assert_eq!(resolve_content_type(None, "noext"), None);
    }

    #[tokio::test]
    async fn upload_records_hash_and_inherits_sharing() {
        let folders = MemFolders::default();
        let files = MemFiles::default();
        let blobs = MemBlobs::default();
        let owner = Uuid::new_v4();
        let actor = Actor::new(Uuid::new_v4(), Role::Finance);
        let folder = folders.seed(owner, "Receipts", None);
        folders.share(folder.id, &[actor.user_id]);

        let file = UploadFile {
            files: &files,
            folders: &folders,
            storage: &blobs,
        }
        .execute(
            &actor,
            Some(folder.id),
            b"hello".to_vec(),
            Some("../receipt.txt".into()),
            None,
        )
        .await
        .unwrap();

        assert_eq!(file.name, "..-receipt.txt");
        assert_eq!(file.size, 5);
        assert_eq!(file.shared_with, vec![owner]);
        assert_eq!(file.content_type.as_deref(), Some("text/plain"));
        assert_eq!(
            file.content_hash.as_deref(),
            Some("2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824")
        );
        let key = file.storage_key.unwrap();
        assert!(key.starts_with(&format!("{}/", actor.user_id)));
        assert!(key.ends_with("_..-receipt.txt"));
        assert!(blobs.contains(&key));
    }
}
