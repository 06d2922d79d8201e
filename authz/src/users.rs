//! User and organization management authorization.
//!
//! The invariant running through every rule here: no actor can elevate or
//! modify a peer or higher role. ORG_ADMIN may hand out ORG_ADMIN when
//! creating an account but may never edit an existing peer; its role edits
//! are bounded by [`allowed_roles_for_edit`], and organization reassignment
//! on existing accounts is SUPER_ADMIN territory. These checks run
//! server-side regardless of what a client's UI disabled.

use entities::{Actor, Organization, Role, User};

use crate::scope::same_organization;

/// Whether the actor may see and administer user accounts at all.
pub fn can_manage_users(actor: &Actor) -> bool {
    actor.is_active && actor.role.is_admin()
}

/// Whether the actor may change a target's role and organization membership
/// without restriction.
///
/// SUPER_ADMIN only. ORG_ADMIN role changes are bounded by
/// [`allowed_roles_for_edit`] instead, and organization reassignment is
/// never available to it.
pub fn can_edit_user_role_and_organization(actor: &Actor) -> bool {
    actor.is_active && actor.role == Role::SuperAdmin
}

/// Roles the actor may hand out when creating a new account.
pub fn allowed_roles_for_creation(actor: &Actor) -> &'static [Role] {
    if !actor.is_active {
        return &[];
    }
    match actor.role {
        Role::SuperAdmin => &[
            Role::SuperAdmin,
            Role::OrgAdmin,
            Role::StaffUser,
            Role::IndividualUser,
        ],
        Role::OrgAdmin => &[Role::OrgAdmin, Role::StaffUser, Role::IndividualUser],
        Role::StaffUser | Role::IndividualUser => &[],
    }
}

/// Roles the actor may select when editing an existing account.
///
/// Narrower than the creation set for ORG_ADMIN: existing peers are
/// untouchable, so only the two base roles remain choosable.
pub fn allowed_roles_for_edit(actor: &Actor) -> &'static [Role] {
    if !actor.is_active {
        return &[];
    }
    match actor.role {
        Role::SuperAdmin => &[
            Role::SuperAdmin,
            Role::OrgAdmin,
            Role::StaffUser,
            Role::IndividualUser,
        ],
        Role::OrgAdmin => &[Role::StaffUser, Role::IndividualUser],
        Role::StaffUser | Role::IndividualUser => &[],
    }
}

/// Whether the actor may edit the target account.
///
/// Self-edits are always permitted here; the mutation layer separately
/// refuses role/organization changes on the self path. ORG_ADMIN reaches
/// only base-role users inside its own organization.
pub fn can_edit_user(actor: &Actor, target: &User) -> bool {
    if !actor.is_active {
        return false;
    }
    if actor.role == Role::SuperAdmin || actor.id == target.id {
        return true;
    }
    actor.role == Role::OrgAdmin
        && same_organization(actor, target.organization_id)
        && actor.role.is_elevated_over(target.role)
}

/// Whether the actor may hard-delete the target account.
///
/// Nobody deletes their own account. The destructive call is additionally
/// gated by re-authentication at the mutation layer.
pub fn can_delete_user(actor: &Actor, target: &User) -> bool {
    if !actor.is_active || actor.id == target.id {
        return false;
    }
    match actor.role {
        Role::SuperAdmin => true,
        Role::OrgAdmin => {
            same_organization(actor, target.organization_id)
                && actor.role.is_elevated_over(target.role)
        }
        Role::StaffUser | Role::IndividualUser => false,
    }
}

/// Whether the actor may reset the target's password on their behalf.
pub fn can_reset_user_password(actor: &Actor, target: &User) -> bool {
    if !actor.is_active {
        return false;
    }
    match actor.role {
        Role::SuperAdmin => true,
        Role::OrgAdmin => {
            same_organization(actor, target.organization_id)
                && actor.role.is_elevated_over(target.role)
        }
        Role::StaffUser | Role::IndividualUser => false,
    }
}

/// Organization creation is SUPER_ADMIN-only.
pub fn can_create_organization(actor: &Actor) -> bool {
    actor.is_active && actor.role == Role::SuperAdmin
}

/// Whether the actor may touch the organization record at all.
///
/// SUPER_ADMIN anywhere; ORG_ADMIN only its own organization, and then only
/// the fields [`can_manage_organization_settings`] leaves to it (name, slug).
pub fn can_update_organization(actor: &Actor, organization: &Organization) -> bool {
    if !actor.is_active {
        return false;
    }
    match actor.role {
        Role::SuperAdmin => true,
        Role::OrgAdmin => same_organization(actor, Some(organization.id)),
        Role::StaffUser | Role::IndividualUser => false,
    }
}

/// Whether the actor may change plan, quotas, or the active flag.
pub fn can_manage_organization_settings(actor: &Actor) -> bool {
    actor.is_active && actor.role == Role::SuperAdmin
}

/// Hard organization deletion is SUPER_ADMIN-only.
pub fn can_remove_organization(actor: &Actor) -> bool {
    actor.is_active && actor.role == Role::SuperAdmin
}
