use crate::application::ports::user_repository::{UserRepository, UserRow};

/// Names and emails of every user, for share dialogs.
pub struct UserDirectory<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> UserDirectory<'a, R> {
    pub async fn execute(&self) -> anyhow::Result<Vec<UserRow>> {
        self.repo.directory().await
    }
}
