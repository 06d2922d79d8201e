//! Organization (tenant) scoping.

use entities::Actor;
use uuid::Uuid;

/// True iff the actor belongs to an organization and the target record
/// carries the same one.
///
/// An actor without an organization is never in scope, and a target without
/// one is never in scope either; there is no "both null" match.
pub fn same_organization(actor: &Actor, target_organization: Option<Uuid>) -> bool {
    match (actor.organization_id, target_organization) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
