use uuid::Uuid;

use crate::domain::access::role::{Action, Resource, Role};
use crate::domain::files::folder::Shared;

/// Authenticated caller. The role is reloaded from the user row on every
/// request so role changes apply immediately.
#[derive(Debug, Clone)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: Role,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{role} may not {action:?} {resource}")]
pub struct Forbidden {
    pub role: String,
    pub resource: &'static str,
    pub action: Action,
}

// Presentation layer is responsible for building Actor from HTTP inputs.

impl Actor {
    pub fn new(user_id: Uuid, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn can(&self, resource: Resource, action: Action) -> bool {
        self.role.can(resource, action)
    }
}

pub fn require(actor: &Actor, resource: Resource, action: Action) -> Result<(), Forbidden> {
    if actor.can(resource, action) {
        Ok(())
    } else {
        Err(Forbidden {
            role: actor.role.as_str().to_string(),
            resource: resource.key(),
            action,
        })
    }
}

/// Owner, grantee or admin.
pub fn can_view<T: Shared + ?Sized>(actor: &Actor, item: &T) -> bool {
    actor.role.is_admin() || item.owner_id() == actor.user_id || item.is_shared_with(actor.user_id)
}

/// Owner or admin.
pub fn can_manage<T: Shared + ?Sized>(actor: &Actor, item: &T) -> bool {
    actor.role.is_admin() || item.owner_id() == actor.user_id
}
