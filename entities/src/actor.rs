use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::role::Role;

/// Snapshot of the authenticated principal making a request.
///
/// Supplied by the external session provider and treated as read-only for the
/// duration of a single authorization decision. An inactive actor is
/// equivalent to no actor at all: every permission predicate returns false.
///
/// Invariants: an INDIVIDUAL_USER never carries an `organization_id`;
/// STAFF_USER and ORG_ADMIN always do; a SUPER_ADMIN's membership is
/// irrelevant (treated as global).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
    pub organization_id: Option<Uuid>,
    pub is_active: bool,
}

impl Actor {
    pub fn new(id: Uuid, role: Role, organization_id: Option<Uuid>) -> Self {
        Self {
            id,
            role,
            organization_id,
            is_active: true,
        }
    }

    /// Build an actor snapshot from a stored user record.
    pub fn from_user(user: &crate::user::User) -> Self {
        Self {
            id: user.id,
            role: user.role,
            organization_id: user.organization_id,
            is_active: user.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actor_snapshot_mirrors_user_record() {
        let user = crate::user::User::new(
            "analyst",
            "analyst@example.com",
            "Test Analyst",
            "hash",
            Role::StaffUser,
            Some(Uuid::new_v4()),
        );
        let actor = Actor::from_user(&user);
        assert_eq!(actor.id, user.id);
        assert_eq!(actor.role, Role::StaffUser);
        assert_eq!(actor.organization_id, user.organization_id);
        assert!(actor.is_active);
    }
}
