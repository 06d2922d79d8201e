use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EntityError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaseStatus {
    Open,
    InProgress,
    Closed,
    Archived,
}

impl CaseStatus {
    /// Terminal states lock out evidence creation for every role.
    pub fn is_terminal(self) -> bool {
        matches!(self, CaseStatus::Closed | CaseStatus::Archived)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CaseStatus::Open => "OPEN",
            CaseStatus::InProgress => "IN_PROGRESS",
            CaseStatus::Closed => "CLOSED",
            CaseStatus::Archived => "ARCHIVED",
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaseStatus {
    type Err = EntityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(CaseStatus::Open),
            "IN_PROGRESS" => Ok(CaseStatus::InProgress),
            "CLOSED" => Ok(CaseStatus::Closed),
            "ARCHIVED" => Ok(CaseStatus::Archived),
            other => Err(EntityError::UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CasePriority {
    Low,
    Medium,
    High,
    Critical,
}

/// An investigation case.
///
/// `organization_id` is absent for cases created by individual users.
/// `assigned_to` is the legacy single-assignee field kept alongside the
/// many-to-many assignment table; it is edited through case updates, never
/// through the assignment subsystem.
///
/// There is no status state machine: any actor with edit rights may move a
/// case through any status in any order, including reopening an archived
/// case. That permissiveness is deliberate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: CaseStatus,
    pub priority: CasePriority,
    pub created_by: Uuid,
    pub assigned_to: Option<Uuid>,
    pub organization_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl Case {
    pub fn new(title: impl Into<String>, created_by: Uuid, organization_id: Option<Uuid>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: None,
            status: CaseStatus::Open,
            priority: CasePriority::Medium,
            created_by,
            assigned_to: None,
            organization_id,
            created_at: now,
            updated_at: now,
            closed_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_and_archived_are_terminal() {
        assert!(CaseStatus::Closed.is_terminal());
        assert!(CaseStatus::Archived.is_terminal());
        assert!(!CaseStatus::Open.is_terminal());
        assert!(!CaseStatus::InProgress.is_terminal());
    }

    #[test]
    fn status_round_trips_through_wire_form() {
        for status in [
            CaseStatus::Open,
            CaseStatus::InProgress,
            CaseStatus::Closed,
            CaseStatus::Archived,
        ] {
            assert_eq!(status.as_str().parse::<CaseStatus>().unwrap(), status);
        }
    }

    #[test]
    fn new_case_opens_at_medium_priority() {
        let case = Case::new("Phishing domain cluster", Uuid::new_v4(), None);
        assert_eq!(case.status, CaseStatus::Open);
        assert_eq!(case.priority, CasePriority::Medium);
        assert!(case.assigned_to.is_none());
        assert!(case.closed_at.is_none());
    }
}
