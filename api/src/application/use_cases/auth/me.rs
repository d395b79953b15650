use uuid::Uuid;

use crate::application::access::Actor;
use crate::application::ports::user_repository::{UserRepository, UserRow};
use crate::domain::access::role::Role;

/// Resolves a token subject to the stored user and the actor it acts as.
/// The role comes from the row on every call, never from the token.
pub struct CurrentUser<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> CurrentUser<'a, R> {
    pub async fn execute(&self, user_id: Uuid) -> anyhow::Result<Option<(Actor, UserRow)>> {
        let Some(row) = self.repo.find_by_id(user_id).await? else {
            return Ok(None);
        };
        let actor = Actor::new(row.id, Role::parse(&row.role));
        Ok(Some((actor, row)))
    }
}
