//! Who may change what.

use crate::models::{Actor, UserRole};

/// Only the owner may edit a resource.
pub fn can_modify(actor: &Actor, resource_owner_id: i32) -> bool {
    actor.id == resource_owner_id
}

/// The owner may delete a resource, and so may any admin.
pub fn can_delete(actor: &Actor, resource_owner_id: i32) -> bool {
    if actor.id == resource_owner_id {
        return true;
    }

    match actor.role {
        UserRole::Admin => true,
        UserRole::User => false,
    }
}

pub fn can_manage_catalog(actor: &Actor) -> bool {
    match actor.role {
        UserRole::Admin => true,
        UserRole::User => false,
    }
}
