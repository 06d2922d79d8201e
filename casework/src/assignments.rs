//! Explicit assignment management.
//!
//! The legacy single-assignee relation is visible through this module but
//! never mutable here: clearing it is a case edit, with case-edit
//! authorization. Removing a legacy assignment through the assignment
//! subsystem is refused as a validation error so callers are pointed at the
//! right operation instead of getting a confusing not-found.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use audit::{AuditOutcome, AuditTrail};
use authz::{can_manage_assignments, can_view_case};
use entities::{Actor, Assignment, Case, CaseAssignment, Role, User};
use store::{AssignmentStore, CaseStore, UserStore};

use crate::error::{CaseworkError, Result};

pub struct AssignmentService {
    assignments: Arc<dyn AssignmentStore>,
    cases: Arc<dyn CaseStore>,
    users: Arc<dyn UserStore>,
    audit: Arc<AuditTrail>,
}

impl AssignmentService {
    pub fn new(
        assignments: Arc<dyn AssignmentStore>,
        cases: Arc<dyn CaseStore>,
        users: Arc<dyn UserStore>,
        audit: Arc<AuditTrail>,
    ) -> Self {
        Self {
            assignments,
            cases,
            users,
            audit,
        }
    }

    /// Assign a batch of users to a case.
    ///
    /// Idempotent per pair: users already assigned are skipped, not errors,
    /// so retrying a partially applied batch converges. Every named user must
    /// exist, be active, and (for organization cases) belong to the case's
    /// tenant.
    pub async fn assign_users(
        &self,
        actor: &Actor,
        case_id: Uuid,
        user_ids: &[Uuid],
    ) -> Result<Vec<CaseAssignment>> {
        let case = self.load_case(case_id).await?;

        if !can_manage_assignments(actor, &case) {
            self.audit
                .record(
                    Some(actor.id),
                    "ASSIGN",
                    "Case",
                    Some(case_id),
                    None,
                    AuditOutcome::Denied,
                )
                .await?;
            return Err(CaseworkError::Forbidden);
        }

        let mut unique: Vec<Uuid> = Vec::new();
        for id in user_ids {
            if !unique.contains(id) {
                unique.push(*id);
            }
        }

        for user_id in &unique {
            let user = self
                .users
                .get_user(*user_id)
                .await?
                .ok_or_else(|| CaseworkError::Validation(format!("User {user_id} not found")))?;
            if !user.is_active {
                return Err(CaseworkError::Validation(format!(
                    "User {user_id} is inactive and cannot be assigned"
                )));
            }
            if let Some(case_org) = case.organization_id {
                if user.organization_id != Some(case_org) {
                    return Err(CaseworkError::Validation(format!(
                        "User {user_id} does not belong to the case's organization"
                    )));
                }
            }
        }

        let mut created = Vec::new();
        for user_id in unique {
            if self.assignments.assignment_exists(case_id, user_id).await? {
                continue;
            }
            let row = CaseAssignment::new(case_id, user_id, actor.id);
            self.assignments.insert_assignment(row.clone()).await?;
            created.push(row);
        }

        self.audit
            .record(
                Some(actor.id),
                "ASSIGN",
                "Case",
                Some(case_id),
                Some(serde_json::json!({
                    "user_ids": created.iter().map(|row| row.user_id).collect::<Vec<_>>(),
                })),
                AuditOutcome::Success,
            )
            .await?;
        info!(case_id = %case_id, count = created.len(), "users assigned");
        Ok(created)
    }

    /// Remove one explicit assignment.
    pub async fn remove_assignment(
        &self,
        actor: &Actor,
        case_id: Uuid,
        user_id: Uuid,
    ) -> Result<()> {
        let case = self.load_case(case_id).await?;

        if !can_manage_assignments(actor, &case) {
            self.audit
                .record(
                    Some(actor.id),
                    "UNASSIGN",
                    "Case",
                    Some(case_id),
                    None,
                    AuditOutcome::Denied,
                )
                .await?;
            return Err(CaseworkError::Forbidden);
        }

        if self.assignments.assignment_exists(case_id, user_id).await? {
            self.assignments.delete_assignment(case_id, user_id).await?;
            self.audit
                .record(
                    Some(actor.id),
                    "UNASSIGN",
                    "Case",
                    Some(case_id),
                    Some(serde_json::json!({ "user_id": user_id })),
                    AuditOutcome::Success,
                )
                .await?;
            info!(case_id = %case_id, %user_id, "assignment removed");
            return Ok(());
        }

        if case.assigned_to == Some(user_id) {
            return Err(CaseworkError::Validation(
                "This user holds the legacy assignment; change it by editing the case".to_string(),
            ));
        }
        Err(CaseworkError::NotFound("Assignment"))
    }

    /// Every assignment on a case: the synthesized legacy relation first,
    /// then the explicit rows.
    pub async fn list_assignments(&self, actor: &Actor, case_id: Uuid) -> Result<Vec<Assignment>> {
        let case = self.load_case(case_id).await?;
        let rows = self.assignments.list_assignments_for_case(case_id).await?;
        let assignee_ids: Vec<Uuid> = rows.iter().map(|row| row.user_id).collect();
        if !can_view_case(actor, &case, &assignee_ids) {
            return Err(CaseworkError::Forbidden);
        }

        let mut out = Vec::with_capacity(rows.len() + 1);
        if let Some(legacy) = Assignment::legacy_of(&case) {
            out.push(legacy);
        }
        out.extend(rows.into_iter().map(Assignment::Explicit));
        Ok(out)
    }

    /// Active users the actor could assign to cases it manages.
    pub async fn assignable_users(&self, actor: &Actor) -> Result<Vec<User>> {
        if !actor.is_active {
            return Err(CaseworkError::Forbidden);
        }
        let users = match actor.role {
            Role::SuperAdmin => self.users.list_users(None).await?,
            Role::OrgAdmin | Role::StaffUser => match actor.organization_id {
                Some(org) => self.users.list_users(Some(org)).await?,
                None => Vec::new(),
            },
            Role::IndividualUser => return Err(CaseworkError::Forbidden),
        };
        Ok(users.into_iter().filter(|user| user.is_active).collect())
    }

    async fn load_case(&self, id: Uuid) -> Result<Case> {
        self.cases
            .get_case(id)
            .await?
            .ok_or(CaseworkError::NotFound("Case"))
    }
}
