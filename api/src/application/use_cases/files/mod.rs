pub mod create_folder;
pub mod delete_file;
pub mod delete_folder;
pub mod download_folder;
pub mod get_file;
pub mod get_file_content;
pub mod get_folder;
pub mod list_folder;
pub mod list_shared;
pub mod share_file;
pub mod share_folder;
pub mod tree;
pub mod update_folder;
pub mod upload_file;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FolderError {
    #[error("folder or file not found")]
    NotFound,
    #[error("only the owner or an admin can change this")]
    Forbidden,
    #[error("a folder cannot be moved into itself or one of its descendants")]
    Cycle,
    #[error("folder tree is deeper than {0} levels")]
    TooDeep(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareMode {
    Grant,
    Revoke,
}
