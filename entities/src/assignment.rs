use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::case::Case;

/// A row in the many-to-many case/user assignment table.
///
/// Unique per (case_id, user_id). Rows created through the assignment
/// subsystem are always explicit; the legacy single-assignee relation is
/// never materialized as a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseAssignment {
    pub id: Uuid,
    pub case_id: Uuid,
    pub user_id: Uuid,
    pub assigned_by: Option<Uuid>,
    pub assigned_at: DateTime<Utc>,
}

impl CaseAssignment {
    pub fn new(case_id: Uuid, user_id: Uuid, assigned_by: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            case_id,
            user_id,
            assigned_by: Some(assigned_by),
            assigned_at: Utc::now(),
        }
    }
}

/// A case-to-user relation as presented to callers.
///
/// The legacy variant is synthesized from the case's single `assigned_to`
/// field at read time. It is read-only through the assignment subsystem:
/// clearing it means editing the case, which is an edit-class operation with
/// different authorization, so the two shapes are kept as a tagged variant
/// rather than merged into one mutable list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Assignment {
    Legacy { case_id: Uuid, user_id: Uuid },
    Explicit(CaseAssignment),
}

impl Assignment {
    pub fn is_legacy(&self) -> bool {
        matches!(self, Assignment::Legacy { .. })
    }

    pub fn user_id(&self) -> Uuid {
        match self {
            Assignment::Legacy { user_id, .. } => *user_id,
            Assignment::Explicit(row) => row.user_id,
        }
    }

    pub fn case_id(&self) -> Uuid {
        match self {
            Assignment::Legacy { case_id, .. } => *case_id,
            Assignment::Explicit(row) => row.case_id,
        }
    }

    /// Synthesize the legacy assignment from a case's `assigned_to` field,
    /// if set.
    pub fn legacy_of(case: &Case) -> Option<Assignment> {
        case.assigned_to.map(|user_id| Assignment::Legacy {
            case_id: case.id,
            user_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_variant_is_derived_from_the_case_field() {
        let mut case = Case::new("t", Uuid::new_v4(), None);
        assert!(Assignment::legacy_of(&case).is_none());

        let assignee = Uuid::new_v4();
        case.assigned_to = Some(assignee);
        let legacy = Assignment::legacy_of(&case).unwrap();
        assert!(legacy.is_legacy());
        assert_eq!(legacy.user_id(), assignee);
        assert_eq!(legacy.case_id(), case.id);
    }

    #[test]
    fn explicit_rows_keep_their_provenance() {
        let by = Uuid::new_v4();
        let row = CaseAssignment::new(Uuid::new_v4(), Uuid::new_v4(), by);
        let assignment = Assignment::Explicit(row.clone());
        assert!(!assignment.is_legacy());
        assert_eq!(assignment.user_id(), row.user_id);
    }
}
