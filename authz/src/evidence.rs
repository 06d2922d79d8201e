//! Evidence authorization engine.
//!
//! Deletion authority hangs off uploader identity, not case access: an
//! uploader keeps the right to delete their own upload even after being
//! unassigned from the case. That asymmetry against `can_edit_case` is
//! observed platform behavior and is preserved, not corrected.

use entities::{Actor, Case, Evidence, Role};

use crate::cases::can_edit_case;
use crate::scope::same_organization;

/// Whether the actor may delete this particular evidence item.
///
/// Admins by role, or the uploader. Callers walking a list must evaluate
/// this per item; uploader matches make the answer differ between items in
/// the same collection.
pub fn can_delete_evidence(actor: &Actor, evidence: &Evidence) -> bool {
    if !actor.is_active {
        return false;
    }
    actor.role.is_admin() || evidence.uploaded_by == Some(actor.id)
}

/// Whether the actor may toggle the verification flag.
///
/// Verification is an edit-class action on the owning case.
pub fn can_verify_evidence(actor: &Actor, case: &Case) -> bool {
    can_edit_case(actor, case)
}

/// Whether the actor may attach new evidence to the case.
///
/// Does not consider case status; the terminal-state lock is a business rule
/// the mutation layer applies before this check.
pub fn can_add_evidence(actor: &Actor, case: &Case) -> bool {
    if !actor.is_active {
        return false;
    }
    match actor.role {
        Role::SuperAdmin => true,
        Role::IndividualUser => {
            case.created_by == actor.id || case.assigned_to == Some(actor.id)
        }
        Role::OrgAdmin | Role::StaffUser => {
            same_organization(actor, case.organization_id) || case.assigned_to == Some(actor.id)
        }
    }
}
