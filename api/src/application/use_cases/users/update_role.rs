use uuid::Uuid;

use super::UserError;
use crate::application::access::{self, Actor};
use crate::application::ports::user_repository::{UserRepository, UserRow};
use crate::domain::access::role::{Action, Resource, Role};

pub struct UpdateRole<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> UpdateRole<'a, R> {
    pub async fn execute(
        &self,
        actor: &Actor,
        id: Uuid,
        role: &str,
    ) -> anyhow::Result<Option<UserRow>> {
        access::require(actor, Resource::Users, Action::Write)?;
        let role = Role::parse_known(role)?;
        if id == actor.user_id && !role.is_admin() {
            return Err(UserError::SelfDemotion.into());
        }
        let updated = self.repo.update_role(id, role.as_str()).await?;
        if let Some(u) = &updated {
            tracing::info!(user_id = %u.id, role = %u.role, by = %actor.user_id, "user_role_updated");
        }
        Ok(updated)
    }
}
