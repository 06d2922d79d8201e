//! Case lifecycle operations.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use audit::{AuditOutcome, AuditTrail};
use authz::{can_delete_case, can_edit_case, can_view_case, case_creation_target};
use entities::{Actor, Case, CasePriority, CaseStatus, Role};
use store::{AssignmentStore, CaseStore, EvidenceStore, OrganizationStore};

use crate::error::{CaseworkError, Result};

/// Input for case creation.
#[derive(Debug, Clone)]
pub struct NewCase {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<CasePriority>,
    /// Only meaningful for SUPER_ADMIN; other roles have their tenant
    /// resolved for them.
    pub organization_id: Option<Uuid>,
}

/// Partial update for a case. Absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct CaseUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<CaseStatus>,
    pub priority: Option<CasePriority>,
    /// `Some(None)` clears the legacy assignee; this is the only path that
    /// changes the legacy relation.
    pub assigned_to: Option<Option<Uuid>>,
}

pub struct CaseService {
    cases: Arc<dyn CaseStore>,
    evidence: Arc<dyn EvidenceStore>,
    assignments: Arc<dyn AssignmentStore>,
    organizations: Arc<dyn OrganizationStore>,
    audit: Arc<AuditTrail>,
}

impl CaseService {
    pub fn new(
        cases: Arc<dyn CaseStore>,
        evidence: Arc<dyn EvidenceStore>,
        assignments: Arc<dyn AssignmentStore>,
        organizations: Arc<dyn OrganizationStore>,
        audit: Arc<AuditTrail>,
    ) -> Self {
        Self {
            cases,
            evidence,
            assignments,
            organizations,
            audit,
        }
    }

    /// Create a case in the tenant resolved for the actor.
    ///
    /// Organization-scoped cases are counted against the tenant's case
    /// quota before insertion.
    pub async fn create_case(&self, actor: &Actor, input: NewCase) -> Result<Case> {
        if input.title.trim().is_empty() {
            return Err(CaseworkError::Validation(
                "Case title must not be empty".to_string(),
            ));
        }

        let target = match case_creation_target(actor, input.organization_id) {
            Ok(target) => target,
            Err(err) => {
                if matches!(err, authz::AuthzError::Forbidden) {
                    self.audit
                        .record(
                            Some(actor.id),
                            "CREATE",
                            "Case",
                            None,
                            None,
                            AuditOutcome::Denied,
                        )
                        .await?;
                }
                return Err(err.into());
            }
        };

        if let Some(org_id) = target {
            let organization = self
                .organizations
                .get_organization(org_id)
                .await?
                .ok_or(CaseworkError::NotFound("Organization"))?;
            let current = self.cases.count_organization_cases(org_id).await?;
            if current >= organization.max_cases {
                return Err(CaseworkError::Validation(format!(
                    "Organization has reached its case limit of {}",
                    organization.max_cases
                )));
            }
        }

        let mut case = Case::new(input.title, actor.id, target);
        case.description = input.description;
        if let Some(priority) = input.priority {
            case.priority = priority;
        }
        self.cases.insert_case(case.clone()).await?;

        self.audit
            .record(
                Some(actor.id),
                "CREATE",
                "Case",
                Some(case.id),
                Some(serde_json::json!({ "title": case.title })),
                AuditOutcome::Success,
            )
            .await?;
        info!(case_id = %case.id, "case created");
        Ok(case)
    }

    /// Fetch a single case, applying the view gate.
    pub async fn get_case(&self, actor: &Actor, id: Uuid) -> Result<Case> {
        let case = self
            .cases
            .get_case(id)
            .await?
            .ok_or(CaseworkError::NotFound("Case"))?;
        let assignee_ids = self.explicit_assignee_ids(id).await?;
        if !can_view_case(actor, &case, &assignee_ids) {
            return Err(CaseworkError::Forbidden);
        }
        Ok(case)
    }

    /// All cases visible to the actor.
    ///
    /// SUPER_ADMIN sees everything, ORG_ADMIN its tenant, and the base roles
    /// the cases they created, hold the legacy assignment on, or are
    /// explicitly assigned to.
    pub async fn list_cases(&self, actor: &Actor) -> Result<Vec<Case>> {
        if !actor.is_active {
            return Err(CaseworkError::Forbidden);
        }
        match actor.role {
            Role::SuperAdmin => Ok(self.cases.list_cases().await?),
            Role::OrgAdmin => match actor.organization_id {
                Some(org) => Ok(self.cases.list_cases_for_organization(org).await?),
                None => Ok(Vec::new()),
            },
            Role::StaffUser | Role::IndividualUser => {
                let assigned: Vec<Uuid> =
                    self.assignments.list_case_ids_for_user(actor.id).await?;
                let all = self.cases.list_cases().await?;
                Ok(all
                    .into_iter()
                    .filter(|case| {
                        case.created_by == actor.id
                            || case.assigned_to == Some(actor.id)
                            || assigned.contains(&case.id)
                    })
                    .collect())
            }
        }
    }

    /// Apply a partial update.
    ///
    /// `closed_at` is stamped when the case enters CLOSED and cleared when it
    /// leaves; no other transition bookkeeping exists, since any status may
    /// follow any other.
    pub async fn update_case(&self, actor: &Actor, id: Uuid, update: CaseUpdate) -> Result<Case> {
        let mut case = self
            .cases
            .get_case(id)
            .await?
            .ok_or(CaseworkError::NotFound("Case"))?;

        if !can_edit_case(actor, &case) {
            self.audit
                .record(
                    Some(actor.id),
                    "UPDATE",
                    "Case",
                    Some(id),
                    None,
                    AuditOutcome::Denied,
                )
                .await?;
            return Err(CaseworkError::Forbidden);
        }

        if let Some(ref title) = update.title {
            if title.trim().is_empty() {
                return Err(CaseworkError::Validation(
                    "Case title must not be empty".to_string(),
                ));
            }
        }

        let mut changed: Vec<&str> = Vec::new();
        if let Some(title) = update.title {
            case.title = title;
            changed.push("title");
        }
        if let Some(description) = update.description {
            case.description = Some(description);
            changed.push("description");
        }
        if let Some(priority) = update.priority {
            case.priority = priority;
            changed.push("priority");
        }
        if let Some(assigned_to) = update.assigned_to {
            case.assigned_to = assigned_to;
            changed.push("assigned_to");
        }
        if let Some(status) = update.status {
            if status == CaseStatus::Closed && case.status != CaseStatus::Closed {
                case.closed_at = Some(chrono::Utc::now());
            } else if status != CaseStatus::Closed && case.status == CaseStatus::Closed {
                case.closed_at = None;
            }
            case.status = status;
            changed.push("status");
        }
        case.updated_at = chrono::Utc::now();

        self.cases.update_case(case.clone()).await?;
        self.audit
            .record(
                Some(actor.id),
                "UPDATE",
                "Case",
                Some(id),
                Some(serde_json::json!({ "fields": changed })),
                AuditOutcome::Success,
            )
            .await?;
        debug!(case_id = %id, ?changed, "case updated");
        Ok(case)
    }

    /// Delete a case together with its evidence and assignment rows.
    pub async fn delete_case(&self, actor: &Actor, id: Uuid) -> Result<()> {
        let case = self
            .cases
            .get_case(id)
            .await?
            .ok_or(CaseworkError::NotFound("Case"))?;

        if !can_delete_case(actor, &case) {
            self.audit
                .record(
                    Some(actor.id),
                    "DELETE",
                    "Case",
                    Some(id),
                    None,
                    AuditOutcome::Denied,
                )
                .await?;
            return Err(CaseworkError::Forbidden);
        }

        self.evidence.delete_evidence_for_case(id).await?;
        self.assignments.delete_assignments_for_case(id).await?;
        self.cases.delete_case(id).await?;

        self.audit
            .record(
                Some(actor.id),
                "DELETE",
                "Case",
                Some(id),
                Some(serde_json::json!({ "title": case.title })),
                AuditOutcome::Success,
            )
            .await?;
        info!(case_id = %id, "case deleted");
        Ok(())
    }

    pub(crate) async fn explicit_assignee_ids(&self, case_id: Uuid) -> Result<Vec<Uuid>> {
        Ok(self
            .assignments
            .list_assignments_for_case(case_id)
            .await?
            .into_iter()
            .map(|row| row.user_id)
            .collect())
    }
}
