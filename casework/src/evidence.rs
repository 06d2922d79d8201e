//! Evidence operations.
//!
//! Reads follow the owning case's view gate. Writes follow case edit
//! rights, except deletion, which hangs off uploader identity and role.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use audit::{AuditOutcome, AuditTrail};
use authz::{can_add_evidence, can_delete_evidence, can_verify_evidence, can_view_case};
use entities::{Actor, Case, Evidence, EvidenceKind};
use store::{AssignmentStore, CaseStore, EvidenceStore};

use crate::error::{CaseworkError, Result};

/// Input for attaching evidence to a case.
#[derive(Debug, Clone)]
pub struct NewEvidence {
    pub case_id: Uuid,
    pub kind: EvidenceKind,
    pub name: String,
    pub description: Option<String>,
    pub file_path: Option<String>,
    pub file_hash: Option<String>,
    pub file_size: Option<u64>,
    pub tags: Option<String>,
}

/// Partial update for an evidence record. Absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct EvidenceUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub kind: Option<EvidenceKind>,
    pub tags: Option<String>,
}

pub struct EvidenceService {
    evidence: Arc<dyn EvidenceStore>,
    cases: Arc<dyn CaseStore>,
    assignments: Arc<dyn AssignmentStore>,
    audit: Arc<AuditTrail>,
}

impl EvidenceService {
    pub fn new(
        evidence: Arc<dyn EvidenceStore>,
        cases: Arc<dyn CaseStore>,
        assignments: Arc<dyn AssignmentStore>,
        audit: Arc<AuditTrail>,
    ) -> Self {
        Self {
            evidence,
            cases,
            assignments,
            audit,
        }
    }

    /// Attach new evidence to a case.
    ///
    /// Terminal case statuses lock out creation for every role, including
    /// SUPER_ADMIN; this is a state rule, not an authorization rule, so it is
    /// checked before the permission gate and reported as a validation error.
    pub async fn add_evidence(&self, actor: &Actor, input: NewEvidence) -> Result<Evidence> {
        let case = self.load_case(input.case_id).await?;

        if case.status.is_terminal() {
            return Err(CaseworkError::Validation(format!(
                "Cannot add evidence to a case with status {}",
                case.status
            )));
        }
        if !can_add_evidence(actor, &case) {
            self.audit
                .record(
                    Some(actor.id),
                    "CREATE",
                    "Evidence",
                    None,
                    None,
                    AuditOutcome::Denied,
                )
                .await?;
            return Err(CaseworkError::Forbidden);
        }
        if input.name.trim().is_empty() {
            return Err(CaseworkError::Validation(
                "Evidence name must not be empty".to_string(),
            ));
        }

        // Evidence inherits the tenant of its case, never the uploader's.
        let mut item = Evidence::new(
            case.id,
            input.kind,
            input.name,
            actor.id,
            case.organization_id,
        );
        item.description = input.description;
        item.file_path = input.file_path;
        item.file_hash = input.file_hash;
        item.file_size = input.file_size;
        item.tags = input.tags;
        self.evidence.insert_evidence(item.clone()).await?;

        self.audit
            .record(
                Some(actor.id),
                "CREATE",
                "Evidence",
                Some(item.id),
                Some(serde_json::json!({ "case_id": case.id, "name": item.name })),
                AuditOutcome::Success,
            )
            .await?;
        info!(evidence_id = %item.id, case_id = %case.id, "evidence added");
        Ok(item)
    }

    /// All evidence on a case the actor may view.
    pub async fn list_evidence(&self, actor: &Actor, case_id: Uuid) -> Result<Vec<Evidence>> {
        let case = self.load_case(case_id).await?;
        self.require_view(actor, &case).await?;
        Ok(self.evidence.list_evidence_for_case(case_id).await?)
    }

    pub async fn get_evidence(&self, actor: &Actor, id: Uuid) -> Result<Evidence> {
        let item = self
            .evidence
            .get_evidence(id)
            .await?
            .ok_or(CaseworkError::NotFound("Evidence"))?;
        let case = self.load_case(item.case_id).await?;
        self.require_view(actor, &case).await?;
        Ok(item)
    }

    /// Update descriptive fields. Edit-class on the owning case.
    pub async fn update_evidence(
        &self,
        actor: &Actor,
        id: Uuid,
        update: EvidenceUpdate,
    ) -> Result<Evidence> {
        let mut item = self
            .evidence
            .get_evidence(id)
            .await?
            .ok_or(CaseworkError::NotFound("Evidence"))?;
        let case = self.load_case(item.case_id).await?;

        if !can_verify_evidence(actor, &case) {
            self.audit
                .record(
                    Some(actor.id),
                    "UPDATE",
                    "Evidence",
                    Some(id),
                    None,
                    AuditOutcome::Denied,
                )
                .await?;
            return Err(CaseworkError::Forbidden);
        }
        if let Some(ref name) = update.name {
            if name.trim().is_empty() {
                return Err(CaseworkError::Validation(
                    "Evidence name must not be empty".to_string(),
                ));
            }
        }

        if let Some(name) = update.name {
            item.name = name;
        }
        if let Some(description) = update.description {
            item.description = Some(description);
        }
        if let Some(kind) = update.kind {
            item.kind = kind;
        }
        if let Some(tags) = update.tags {
            item.tags = Some(tags);
        }
        item.updated_at = chrono::Utc::now();
        self.evidence.update_evidence(item.clone()).await?;

        self.audit
            .record(
                Some(actor.id),
                "UPDATE",
                "Evidence",
                Some(id),
                None,
                AuditOutcome::Success,
            )
            .await?;
        Ok(item)
    }

    /// Toggle the verification flag.
    pub async fn verify_evidence(&self, actor: &Actor, id: Uuid, verified: bool) -> Result<Evidence> {
        let mut item = self
            .evidence
            .get_evidence(id)
            .await?
            .ok_or(CaseworkError::NotFound("Evidence"))?;
        let case = self.load_case(item.case_id).await?;

        if !can_verify_evidence(actor, &case) {
            self.audit
                .record(
                    Some(actor.id),
                    "VERIFY",
                    "Evidence",
                    Some(id),
                    None,
                    AuditOutcome::Denied,
                )
                .await?;
            return Err(CaseworkError::Forbidden);
        }

        item.is_verified = verified;
        item.updated_at = chrono::Utc::now();
        self.evidence.update_evidence(item.clone()).await?;

        self.audit
            .record(
                Some(actor.id),
                "VERIFY",
                "Evidence",
                Some(id),
                Some(serde_json::json!({ "verified": verified })),
                AuditOutcome::Success,
            )
            .await?;
        debug!(evidence_id = %id, verified, "evidence verification updated");
        Ok(item)
    }

    /// Delete one evidence item.
    ///
    /// The gate is per item: in the same collection an uploader may delete
    /// their own uploads and nothing else.
    pub async fn delete_evidence(&self, actor: &Actor, id: Uuid) -> Result<()> {
        let item = self
            .evidence
            .get_evidence(id)
            .await?
            .ok_or(CaseworkError::NotFound("Evidence"))?;

        if !can_delete_evidence(actor, &item) {
            self.audit
                .record(
                    Some(actor.id),
                    "DELETE",
                    "Evidence",
                    Some(id),
                    None,
                    AuditOutcome::Denied,
                )
                .await?;
            return Err(CaseworkError::Forbidden);
        }

        self.evidence.delete_evidence(id).await?;
        self.audit
            .record(
                Some(actor.id),
                "DELETE",
                "Evidence",
                Some(id),
                Some(serde_json::json!({ "case_id": item.case_id, "name": item.name })),
                AuditOutcome::Success,
            )
            .await?;
        info!(evidence_id = %id, "evidence deleted");
        Ok(())
    }

    async fn load_case(&self, id: Uuid) -> Result<Case> {
        self.cases
            .get_case(id)
            .await?
            .ok_or(CaseworkError::NotFound("Case"))
    }

    async fn require_view(&self, actor: &Actor, case: &Case) -> Result<()> {
        let assignee_ids: Vec<Uuid> = self
            .assignments
            .list_assignments_for_case(case.id)
            .await?
            .into_iter()
            .map(|row| row.user_id)
            .collect();
        if can_view_case(actor, case, &assignee_ids) {
            Ok(())
        } else {
            Err(CaseworkError::Forbidden)
        }
    }
}
