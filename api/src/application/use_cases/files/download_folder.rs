use std::collections::{HashMap, HashSet};
use std::io::Write;

use uuid::Uuid;

use super::{FolderError, tree};
use crate::application::access::{self, Actor};
use crate::application::ports::files_repository::FilesRepository;
use crate::application::ports::folder_repository::FolderRepository;
use crate::application::ports::storage_port::StoragePort;
use crate::domain::access::role::{Action, Resource};
use crate::domain::files::folder::sanitize_name;

pub struct FolderArchive {
    pub filename: String,
    pub bytes: Vec<u8>,
}

pub struct DownloadFolder<'a, FR, FI, S>
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

impl<'a, FR, FI, S> DownloadFolder<'a, FR, FI, S>
where
    FR: FolderRepository + ?Sized,
    FI: FilesRepository + ?Sized,
    S: StoragePort + ?Sized,
{
    /// Zip of the visible part of the subtree. Files whose blob is gone are
    /// skipped.
    pub async fn execute(&self, actor: &Actor, id: Uuid) -> anyhow::Result<FolderArchive> {
        access::require(actor, Resource::Files, Action::Read)?;
        let root = self
            .folders
            .get(id)
            .await?
            .filter(|f| access::can_view(actor, f))
            .ok_or(FolderError::NotFound)?;
        let root_name = sanitize_name(&root.name);
        let subtree = tree::collect_subtree(self.folders, root, self.max_depth).await?;

        let mut paths: HashMap<Uuid, String> = HashMap::new();
        let mut entries: Vec<(String, Option<Vec<u8>>)> = Vec::new();
        let mut taken: HashSet<String> = HashSet::new();
        for folder in &subtree {
            let path = match folder.parent_id.and_then(|p| paths.get(&p)) {
                Some(parent) if folder.id != id => {
                    unique_dir(&mut taken, parent, &sanitize_name(&folder.name))
                }
                _ => root_name.clone(),
            };
            paths.insert(folder.id, path.clone());
            if !access::can_view(actor, folder) {
                continue;
            }
            entries.push((format!("{}/", path), None));
            for file in self.files.list_in_folder(Some(folder.id)).await? {
                if !access::can_view(actor, &file) {
                    continue;
                }
                let Some(key) = file.storage_key.as_deref() else {
                    continue;
                };
                if !self.storage.exists(key).await? {
                    tracing::debug!(file_id = %file.id, "archive_blob_missing");
                    continue;
                }
                let data = self.storage.get(key).await?;
                let entry = unique_entry(&mut taken, &path, &sanitize_name(&file.name));
                entries.push((entry, Some(data)));
            }
        }

        let mut cursor = std::io::Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut cursor);
            let options = zip::write::FileOptions::default()
                .compression_method(zip::CompressionMethod::Deflated)
                .unix_permissions(0o644);
            for (entry, data) in entries {
                match data {
                    None => zip.add_directory(entry, options)?,
                    Some(bytes) => {
                        zip.start_file(entry, options)?;
                        zip.write_all(&bytes)?;
                    }
                }
            }
            zip.finish()?;
        }
        Ok(FolderArchive {
            filename: format!("{}.zip", root_name.replace(' ', "_")),
            bytes: cursor.into_inner(),
        })
    }
}

fn unique_entry(taken: &mut HashSet<String>, dir: &str, name: &str) -> String {
    let mut candidate = format!("{}/{}", dir, name);
    let (stem, ext) = match name.rsplit_once('.') {
        Some((s, e)) if !s.is_empty() => (s, format!(".{}", e)),
        _ => (name, String::new()),
    };
    let mut n = 1;
    while !taken.insert(candidate.clone()) {
        candidate = format!("{}/{} ({}){}", dir, stem, n, ext);
        n += 1;
    }
    candidate
}

/// Like `unique_entry`, but for directories. Entries are tracked with a
/// trailing slash so a folder never collides with a file of the same name.
fn unique_dir(taken: &mut HashSet<String>, parent: &str, name: &str) -> String {
    let mut candidate = format!("{}/{}", parent, name);
    let mut n = 1;
    while !taken.insert(format!("{}/", candidate)) {
        candidate = format!("{}/{} ({})", parent, name, n);
        n += 1;
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{MemBlobs, MemFiles, MemFolders};
    use crate::domain::access::role::Role;
    use std::io::Read;

    #[tokio::test]
    async fn archive_mirrors_the_hierarchy() {
        let folders = MemFolders::default();
        let files = MemFiles::default();
        let blobs = MemBlobs::default();
        let owner = Actor::new(Uuid::new_v4(), Role::Staff);
        let root = folders.seed(owner.user_id, "Reports", None);
        let q1 = folders.seed(owner.user_id, "Q1", Some(root.id));
        files.seed(owner.user_id, "summary.txt", Some(root.id), Some("k1"));
        files.seed(owner.user_id, "jan.txt", Some(q1.id), Some("k2"));
        files.seed(owner.user_id, "lost.txt", Some(q1.id), Some("gone"));
        blobs.insert("k1", b"summary");
        blobs.insert("k2", b"january");

        let archive = DownloadFolder {
            folders: &folders,
            files: &files,
            storage: &blobs,
            max_depth: 8,
        }
        .execute(&owner, root.id)
        .await
        .unwrap();
        assert_eq!(archive.filename, "Reports.zip");

        let mut zip = zip::ZipArchive::new(std::io::Cursor::new(archive.bytes)).unwrap();
        let mut names: Vec<String> = zip.file_names().map(str::to_string).collect();
        names.sort();
        assert_eq!(
            names,
            vec!["Reports/", "Reports/Q1/", "Reports/Q1/jan.txt", "Reports/summary.txt"]
        );
        let mut body = String::new();
        zip.by_name("Reports/Q1/jan.txt")
            .unwrap()
            .read_to_string(&mut body)
            .unwrap();
        assert_eq!(body, "january");
    }

    #[tokio::test]
    async fn sibling_folders_with_the_same_name_stay_apart() {
        let folders = MemFolders::default();
        let files = MemFiles::default();
        let blobs = MemBlobs::default();
        let owner = Actor::new(Uuid::new_v4(), Role::Staff);
        let root = folders.seed(owner.user_id, "Reports", None);
        let first = folders.seed(owner.user_id, "Q1", Some(root.id));
        let second = folders.seed(owner.user_id, "Q1", Some(root.id));
        files.seed(owner.user_id, "notes.txt", Some(first.id), Some("k1"));
        files.seed(owner.user_id, "notes.txt", Some(second.id), Some("k2"));
        blobs.insert("k1", b"one");
        blobs.insert("k2", b"two");

        let archive = DownloadFolder {
            folders: &folders,
            files: &files,
            storage: &blobs,
            max_depth: 8,
        }
        .execute(&owner, root.id)
        .await
        .unwrap();

        let mut zip = zip::ZipArchive::new(std::io::Cursor::new(archive.bytes)).unwrap();
        let mut names: Vec<String> = zip.file_names().map(str::to_string).collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "Reports/",
                "Reports/Q1 (1)/",
                "Reports/Q1 (1)/notes.txt",
                "Reports/Q1/",
                "Reports/Q1/notes.txt",
            ]
        );
        let mut bodies = Vec::new();
        for name in ["Reports/Q1/notes.txt", "Reports/Q1 (1)/notes.txt"] {
            let mut body = String::new();
            zip.by_name(name).unwrap().read_to_string(&mut body).unwrap();
            bodies.push(body);
        }
        bodies.sort();
        assert_eq!(bodies, vec!["one", "two"]);
    }

    #[test]
    fn duplicate_names_get_a_counter() {
        let mut taken = HashSet::new();
        assert_eq!(unique_entry(&mut taken, "d", "a.txt"), "d/a.txt");
        assert_eq!(unique_entry(&mut taken, "d", "a.txt"), "d/a (1).txt");
        assert_eq!(unique_entry(&mut taken, "d", "README"), "d/README");
        assert_eq!(unique_entry(&mut taken, "d", "README"), "d/README (1)");
        assert_eq!(unique_dir(&mut taken, "d", "a.txt"), "d/a.txt");
        assert_eq!(unique_dir(&mut taken, "d", "a.txt"), "d/a.txt (1)");
    }
}
