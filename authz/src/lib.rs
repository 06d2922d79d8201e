//! The authorization decision core.
//!
//! Every permission rule of the platform lives here as a named predicate,
//! so no caller re-derives role logic inline and screens cannot drift apart.
//! The flow is:
//!
//! 1. The session provider furnishes an [`Actor`](entities::Actor) snapshot
//! 2. The caller fetches the target records (case, evidence, user, org)
//! 3. A predicate here computes the decision over those snapshots
//! 4. The mutation layer re-validates with the same predicate before writing
//!
//! Predicates are pure, synchronous and total: they take the actor
//! explicitly (no ambient auth state), touch no storage, and never fail for
//! well-formed input. The one fallible operation is
//! [`cases::case_creation_target`], which resolves the tenant a new case
//! lands in and rejects malformed requests.
//!
//! An inactive actor is treated as no actor at all: every predicate in this
//! crate returns false for it.

pub mod cases;
pub mod error;
pub mod evidence;
pub mod scope;
pub mod users;

pub use cases::{
    can_delete_case, can_edit_case, can_manage_assignments, can_view_case, case_creation_target,
};
pub use error::{AuthzError, Result};
pub use evidence::{can_add_evidence, can_delete_evidence, can_verify_evidence};
pub use scope::same_organization;
pub use users::{
    allowed_roles_for_creation, allowed_roles_for_edit, can_create_organization, can_delete_user,
    can_edit_user, can_edit_user_role_and_organization, can_manage_organization_settings,
    can_manage_users, can_remove_organization, can_reset_user_password, can_update_organization,
};
