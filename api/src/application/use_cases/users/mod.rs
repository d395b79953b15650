pub mod delete_user;
pub mod directory;
pub mod list_users;
pub mod update_role;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UserError {
    #[error("admins cannot remove their own admin role")]
    SelfDemotion,
    #[error("admins cannot delete their own account")]
    SelfDeletion,
}
