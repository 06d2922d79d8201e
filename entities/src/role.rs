use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EntityError;

/// The four platform roles.
///
/// SUPER_ADMIN sits above everything; ORG_ADMIN sits above the two base
/// roles within its own organization. STAFF_USER and INDIVIDUAL_USER are
/// non-comparable peers with disjoint capabilities (staff work inside an
/// organization, individuals outside any), not ranks of each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SuperAdmin,
    OrgAdmin,
    StaffUser,
    IndividualUser,
}

impl Role {
    /// True when this role outranks `other` in the hierarchy.
    ///
    /// Only two relations hold: SUPER_ADMIN over every other role, and
    /// ORG_ADMIN over the two base roles. ORG_ADMIN is never elevated over a
    /// peer ORG_ADMIN, and nothing outranks SUPER_ADMIN.
    pub fn is_elevated_over(self, other: Role) -> bool {
        match self {
            Role::SuperAdmin => other != Role::SuperAdmin,
            Role::OrgAdmin => matches!(other, Role::StaffUser | Role::IndividualUser),
            Role::StaffUser | Role::IndividualUser => false,
        }
    }

    /// True for the two administrative roles.
    pub fn is_admin(self) -> bool {
        matches!(self, Role::SuperAdmin | Role::OrgAdmin)
    }

    /// True for roles that must carry an organization membership.
    pub fn requires_organization(self) -> bool {
        matches!(self, Role::OrgAdmin | Role::StaffUser)
    }

    /// The wire form used by the original API (SCREAMING_SNAKE_CASE).
    pub fn as_str(self) -> &'static str {
        match self {
            Role::SuperAdmin => "SUPER_ADMIN",
            Role::OrgAdmin => "ORG_ADMIN",
            Role::StaffUser => "STAFF_USER",
            Role::IndividualUser => "INDIVIDUAL_USER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = EntityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUPER_ADMIN" => Ok(Role::SuperAdmin),
            "ORG_ADMIN" => Ok(Role::OrgAdmin),
            "STAFF_USER" => Ok(Role::StaffUser),
            "INDIVIDUAL_USER" => Ok(Role::IndividualUser),
            other => Err(EntityError::UnknownRole(other.to_string())),
        }
    }
}
