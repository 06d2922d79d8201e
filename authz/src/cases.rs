//! Case authorization engine.
//!
//! Edit rights and assignment-management rights are deliberately different
//! gates: assignment is a privileged delegation action reserved for admins,
//! while editing follows ownership. A staff or individual user who owns a
//! case outright still cannot manage its assignment list.

use entities::{Actor, Case, Role};
use uuid::Uuid;

use crate::error::{AuthzError, Result};
use crate::scope::same_organization;

/// Whether the actor may see the case at all.
///
/// `explicit_assignee_ids` is the set of user ids assigned to this case
/// through the assignment table; the caller fetches it alongside the case.
/// Base roles see a case when they created it, hold the legacy assignment,
/// or appear in that set.
pub fn can_view_case(actor: &Actor, case: &Case, explicit_assignee_ids: &[Uuid]) -> bool {
    if !actor.is_active {
        return false;
    }
    match actor.role {
        Role::SuperAdmin => true,
        Role::OrgAdmin => same_organization(actor, case.organization_id),
        Role::StaffUser | Role::IndividualUser => {
            case.created_by == actor.id
                || case.assigned_to == Some(actor.id)
                || explicit_assignee_ids.contains(&actor.id)
        }
    }
}

/// Whether the actor may mutate the case (fields, status, legacy assignee).
///
/// For the base roles only creator and the legacy assignee qualify; an
/// explicit assignment grants visibility, not edit rights.
pub fn can_edit_case(actor: &Actor, case: &Case) -> bool {
    if !actor.is_active {
        return false;
    }
    match actor.role {
        Role::SuperAdmin => true,
        Role::OrgAdmin => same_organization(actor, case.organization_id),
        Role::StaffUser | Role::IndividualUser => {
            case.created_by == actor.id || case.assigned_to == Some(actor.id)
        }
    }
}

/// Whether the actor may add or remove explicit assignments on the case.
///
/// Admin-only, regardless of ownership.
pub fn can_manage_assignments(actor: &Actor, case: &Case) -> bool {
    if !actor.is_active {
        return false;
    }
    match actor.role {
        Role::SuperAdmin => true,
        Role::OrgAdmin => same_organization(actor, case.organization_id),
        Role::StaffUser | Role::IndividualUser => false,
    }
}

/// Whether the actor may delete the case.
///
/// Creators-and-admins only: an individual user may delete their own cases,
/// but a staff user may not delete even the cases they created.
pub fn can_delete_case(actor: &Actor, case: &Case) -> bool {
    if !actor.is_active {
        return false;
    }
    match actor.role {
        Role::SuperAdmin => true,
        Role::OrgAdmin => same_organization(actor, case.organization_id),
        Role::IndividualUser => case.created_by == actor.id,
        Role::StaffUser => false,
    }
}

/// Resolve which tenant a new case belongs to.
///
/// SUPER_ADMIN must name the organization explicitly; ORG_ADMIN and
/// STAFF_USER always land in their own (naming a different one is refused);
/// INDIVIDUAL_USER cases carry no organization at all.
pub fn case_creation_target(
    actor: &Actor,
    requested_organization: Option<Uuid>,
) -> Result<Option<Uuid>> {
    if !actor.is_active {
        return Err(AuthzError::Forbidden);
    }
    match actor.role {
        Role::SuperAdmin => match requested_organization {
            Some(org) => Ok(Some(org)),
            None => Err(AuthzError::Validation(
                "Super Admin must specify an organization when creating a case".to_string(),
            )),
        },
        Role::OrgAdmin | Role::StaffUser => {
            let own = actor.organization_id.ok_or_else(|| {
                AuthzError::Validation(
                    "User must belong to an organization to create a case".to_string(),
                )
            })?;
            match requested_organization {
                Some(requested) if requested != own => Err(AuthzError::Forbidden),
                _ => Ok(Some(own)),
            }
        }
        Role::IndividualUser => match requested_organization {
            Some(_) => Err(AuthzError::Validation(
                "Individual cases carry no organization".to_string(),
            )),
            None => Ok(None),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn org_case(org: Uuid, created_by: Uuid) -> Case {
        Case::new("test case", created_by, Some(org))
    }

    #[test]
    fn super_admin_edits_and_manages_any_case() {
        let admin = Actor::new(Uuid::new_v4(), Role::SuperAdmin, None);
        let case = org_case(Uuid::new_v4(), Uuid::new_v4());
        assert!(can_edit_case(&admin, &case));
        assert!(can_manage_assignments(&admin, &case));
        assert!(can_delete_case(&admin, &case));
        assert!(can_view_case(&admin, &case, &[]));
    }

    #[test]
    fn org_admin_is_confined_to_its_tenant() {
        let org = Uuid::new_v4();
        let admin = Actor::new(Uuid::new_v4(), Role::OrgAdmin, Some(org));

        let own = org_case(org, Uuid::new_v4());
        assert!(can_edit_case(&admin, &own));
        assert!(can_manage_assignments(&admin, &own));

        let foreign = org_case(Uuid::new_v4(), Uuid::new_v4());
        assert!(!can_edit_case(&admin, &foreign));
        assert!(!can_manage_assignments(&admin, &foreign));
        assert!(!can_delete_case(&admin, &foreign));

        let individual_case = Case::new("personal", Uuid::new_v4(), None);
        assert!(!can_edit_case(&admin, &individual_case));
    }

    #[test]
    fn staff_edit_follows_ownership_not_organization() {
        let org = Uuid::new_v4();
        let staff = Actor::new(Uuid::new_v4(), Role::StaffUser, Some(org));

        let created = org_case(org, staff.id);
        assert!(can_edit_case(&staff, &created));

        let mut assigned = org_case(org, Uuid::new_v4());
        assigned.assigned_to = Some(staff.id);
        assert!(can_edit_case(&staff, &assigned));

        let unrelated = org_case(org, Uuid::new_v4());
        assert!(!can_edit_case(&staff, &unrelated));
    }

    #[test]
    fn base_roles_never_manage_assignments() {
        let org = Uuid::new_v4();
        let staff = Actor::new(Uuid::new_v4(), Role::StaffUser, Some(org));
        let individual = Actor::new(Uuid::new_v4(), Role::IndividualUser, None);

        // Even full ownership does not grant assignment management.
        let mut owned = org_case(org, staff.id);
        owned.assigned_to = Some(staff.id);
        assert!(!can_manage_assignments(&staff, &owned));

        let own_personal = Case::new("mine", individual.id, None);
        assert!(!can_manage_assignments(&individual, &own_personal));
    }

    #[test]
    fn explicit_assignment_grants_view_but_not_edit() {
        let org = Uuid::new_v4();
        let staff = Actor::new(Uuid::new_v4(), Role::StaffUser, Some(org));
        let case = org_case(org, Uuid::new_v4());

        assert!(!can_view_case(&staff, &case, &[]));
        assert!(can_view_case(&staff, &case, &[staff.id]));
        assert!(!can_edit_case(&staff, &case));
    }

    #[test]
    fn staff_cannot_delete_even_their_own_cases() {
        let org = Uuid::new_v4();
        let staff = Actor::new(Uuid::new_v4(), Role::StaffUser, Some(org));
        let case = org_case(org, staff.id);
        assert!(!can_delete_case(&staff, &case));

        let individual = Actor::new(Uuid::new_v4(), Role::IndividualUser, None);
        let personal = Case::new("mine", individual.id, None);
        assert!(can_delete_case(&individual, &personal));
    }

    #[test]
    fn inactive_actor_is_denied_everything() {
        let org = Uuid::new_v4();
        let mut admin = Actor::new(Uuid::new_v4(), Role::SuperAdmin, Some(org));
        admin.is_active = false;
        let case = org_case(org, admin.id);
        assert!(!can_view_case(&admin, &case, &[]));
        assert!(!can_edit_case(&admin, &case));
        assert!(!can_manage_assignments(&admin, &case));
        assert!(!can_delete_case(&admin, &case));
        assert_eq!(
            case_creation_target(&admin, Some(org)),
            Err(AuthzError::Forbidden)
        );
    }

    #[test]
    fn super_admin_must_name_a_tenant_when_creating() {
        let admin = Actor::new(Uuid::new_v4(), Role::SuperAdmin, None);
        assert!(matches!(
            case_creation_target(&admin, None),
            Err(AuthzError::Validation(_))
        ));
        let org = Uuid::new_v4();
        assert_eq!(case_creation_target(&admin, Some(org)), Ok(Some(org)));
    }

    #[test]
    fn scoped_roles_implicitly_target_their_own_tenant() {
        let org = Uuid::new_v4();
        let staff = Actor::new(Uuid::new_v4(), Role::StaffUser, Some(org));
        assert_eq!(case_creation_target(&staff, None), Ok(Some(org)));
        assert_eq!(case_creation_target(&staff, Some(org)), Ok(Some(org)));
        assert_eq!(
            case_creation_target(&staff, Some(Uuid::new_v4())),
            Err(AuthzError::Forbidden)
        );
    }

    #[test]
    fn individual_cases_carry_no_tenant() {
        let individual = Actor::new(Uuid::new_v4(), Role::IndividualUser, None);
        assert_eq!(case_creation_target(&individual, None), Ok(None));
        assert!(matches!(
            case_creation_target(&individual, Some(Uuid::new_v4())),
            Err(AuthzError::Validation(_))
        ));
    }
}
