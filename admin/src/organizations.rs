//! Tenant administration.
//!
//! ORG_ADMIN's reach over its own organization record is name and slug
//! only; plan, quotas, the active flag, creation and removal are all
//! SUPER_ADMIN territory.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use audit::{AuditOutcome, AuditTrail};
use authz::{
    can_create_organization, can_manage_organization_settings, can_remove_organization,
    can_update_organization, same_organization,
};
use entities::{Actor, Organization, Role};
use store::{AssignmentStore, CaseStore, EvidenceStore, OrganizationStore, Reauthenticator, UserStore};

use crate::error::{AdminError, Result};

#[derive(Debug, Clone)]
pub struct NewOrganization {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub plan: Option<String>,
    pub max_users: Option<u32>,
    pub max_cases: Option<u32>,
}

/// Partial update for an organization. Absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct OrganizationUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub plan: Option<String>,
    pub max_users: Option<u32>,
    pub max_cases: Option<u32>,
    pub is_active: Option<bool>,
}

impl OrganizationUpdate {
    /// Whether any field beyond name and slug is being changed.
    fn touches_settings(&self) -> bool {
        self.description.is_some()
            || self.plan.is_some()
            || self.max_users.is_some()
            || self.max_cases.is_some()
            || self.is_active.is_some()
    }
}

pub struct OrganizationService {
    organizations: Arc<dyn OrganizationStore>,
    users: Arc<dyn UserStore>,
    cases: Arc<dyn CaseStore>,
    evidence: Arc<dyn EvidenceStore>,
    assignments: Arc<dyn AssignmentStore>,
    reauth: Arc<dyn Reauthenticator>,
    audit: Arc<AuditTrail>,
}

impl OrganizationService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        organizations: Arc<dyn OrganizationStore>,
        users: Arc<dyn UserStore>,
        cases: Arc<dyn CaseStore>,
        evidence: Arc<dyn EvidenceStore>,
        assignments: Arc<dyn AssignmentStore>,
        reauth: Arc<dyn Reauthenticator>,
        audit: Arc<AuditTrail>,
    ) -> Self {
        Self {
            organizations,
            users,
            cases,
            evidence,
            assignments,
            reauth,
            audit,
        }
    }

    pub async fn create_organization(
        &self,
        actor: &Actor,
        input: NewOrganization,
    ) -> Result<Organization> {
        if !can_create_organization(actor) {
            self.deny(actor, "CREATE", None).await?;
            return Err(AdminError::Forbidden);
        }
        if input.name.trim().is_empty() {
            return Err(AdminError::Validation(
                "Organization name must not be empty".to_string(),
            ));
        }
        if self
            .organizations
            .find_organization_by_name(&input.name)
            .await?
            .is_some()
        {
            return Err(AdminError::Validation(
                "An organization with this name already exists".to_string(),
            ));
        }

        let mut organization = Organization::new(input.name, input.slug);
        organization.description = input.description;
        if let Some(plan) = input.plan {
            organization.plan = plan;
        }
        if let Some(max_users) = input.max_users {
            organization.max_users = max_users;
        }
        if let Some(max_cases) = input.max_cases {
            organization.max_cases = max_cases;
        }
        self.organizations
            .insert_organization(organization.clone())
            .await?;

        self.audit
            .record(
                Some(actor.id),
                "CREATE",
                "Organization",
                Some(organization.id),
                Some(serde_json::json!({ "name": organization.name })),
                AuditOutcome::Success,
            )
            .await?;
        info!(organization_id = %organization.id, "organization created");
        Ok(organization)
    }

    /// SUPER_ADMIN sees any organization; everyone else only their own.
    pub async fn get_organization(&self, actor: &Actor, id: Uuid) -> Result<Organization> {
        let organization = self
            .organizations
            .get_organization(id)
            .await?
            .ok_or(AdminError::NotFound("Organization"))?;
        if !actor.is_active {
            return Err(AdminError::Forbidden);
        }
        if actor.role == Role::SuperAdmin || same_organization(actor, Some(id)) {
            Ok(organization)
        } else {
            Err(AdminError::Forbidden)
        }
    }

    pub async fn list_organizations(&self, actor: &Actor) -> Result<Vec<Organization>> {
        if !actor.is_active || actor.role != Role::SuperAdmin {
            return Err(AdminError::Forbidden);
        }
        Ok(self.organizations.list_organizations().await?)
    }

    /// Apply a partial update.
    ///
    /// Settings-class fields (plan, quotas, active flag, description) bounce
    /// off anyone who is not SUPER_ADMIN, even the tenant's own admin.
    pub async fn update_organization(
        &self,
        actor: &Actor,
        id: Uuid,
        update: OrganizationUpdate,
    ) -> Result<Organization> {
        let mut organization = self
            .organizations
            .get_organization(id)
            .await?
            .ok_or(AdminError::NotFound("Organization"))?;

        if !can_update_organization(actor, &organization) {
            self.deny(actor, "UPDATE", Some(id)).await?;
            return Err(AdminError::Forbidden);
        }
        if update.touches_settings() && !can_manage_organization_settings(actor) {
            self.deny(actor, "UPDATE", Some(id)).await?;
            return Err(AdminError::Forbidden);
        }

        if let Some(ref name) = update.name {
            if name != &organization.name
                && self
                    .organizations
                    .find_organization_by_name(name)
                    .await?
                    .is_some()
            {
                return Err(AdminError::Validation(
                    "An organization with this name already exists".to_string(),
                ));
            }
        }

        if let Some(name) = update.name {
            organization.name = name;
        }
        if let Some(slug) = update.slug {
            organization.slug = slug;
        }
        if let Some(description) = update.description {
            organization.description = Some(description);
        }
        if let Some(plan) = update.plan {
            organization.plan = plan;
        }
        if let Some(max_users) = update.max_users {
            organization.max_users = max_users;
        }
        if let Some(max_cases) = update.max_cases {
            organization.max_cases = max_cases;
        }
        if let Some(is_active) = update.is_active {
            organization.is_active = is_active;
        }
        organization.updated_at = chrono::Utc::now();

        self.organizations
            .update_organization(organization.clone())
            .await?;
        self.audit
            .record(
                Some(actor.id),
                "UPDATE",
                "Organization",
                Some(id),
                None,
                AuditOutcome::Success,
            )
            .await?;
        Ok(organization)
    }

    /// Deactivate a tenant and cascade deactivation to every member.
    ///
    /// Members keep their records but fail every authorization predicate
    /// until reactivated individually.
    pub async fn deactivate_organization(&self, actor: &Actor, id: Uuid) -> Result<Organization> {
        let mut organization = self
            .organizations
            .get_organization(id)
            .await?
            .ok_or(AdminError::NotFound("Organization"))?;

        if !can_manage_organization_settings(actor) {
            self.deny(actor, "DEACTIVATE", Some(id)).await?;
            return Err(AdminError::Forbidden);
        }

        organization.is_active = false;
        organization.updated_at = chrono::Utc::now();
        self.organizations
            .update_organization(organization.clone())
            .await?;

        let members = self.users.list_users(Some(id)).await?;
        let member_count = members.len();
        for mut member in members {
            member.is_active = false;
            member.updated_at = chrono::Utc::now();
            self.users.update_user(member).await?;
        }

        self.audit
            .record(
                Some(actor.id),
                "DEACTIVATE",
                "Organization",
                Some(id),
                Some(serde_json::json!({ "members_deactivated": member_count })),
                AuditOutcome::Success,
            )
            .await?;
        info!(organization_id = %id, member_count, "organization deactivated");
        Ok(organization)
    }

    /// Hard-delete a tenant with everything in it: cases (and their evidence
    /// and assignment rows), member accounts, then the record itself.
    /// Re-authentication gated.
    pub async fn delete_organization(
        &self,
        actor: &Actor,
        id: Uuid,
        actor_password: &str,
    ) -> Result<()> {
        let organization = self
            .organizations
            .get_organization(id)
            .await?
            .ok_or(AdminError::NotFound("Organization"))?;

        if !can_remove_organization(actor) {
            self.deny(actor, "DELETE", Some(id)).await?;
            return Err(AdminError::Forbidden);
        }
        if !self.reauth.verify(actor.id, actor_password).await? {
            warn!(actor_id = %actor.id, "re-authentication failed for organization deletion");
            self.audit
                .record(
                    Some(actor.id),
                    "DELETE",
                    "Organization",
                    Some(id),
                    Some(serde_json::json!({ "reason": "reauthentication_failed" })),
                    AuditOutcome::Failed,
                )
                .await?;
            return Err(AdminError::Authentication);
        }

        for case in self.cases.list_cases_for_organization(id).await? {
            self.evidence.delete_evidence_for_case(case.id).await?;
            self.assignments.delete_assignments_for_case(case.id).await?;
            self.cases.delete_case(case.id).await?;
        }
        for member in self.users.list_users(Some(id)).await? {
            self.users.delete_user(member.id).await?;
        }
        self.organizations.delete_organization(id).await?;

        self.audit
            .record(
                Some(actor.id),
                "DELETE",
                "Organization",
                Some(id),
                Some(serde_json::json!({ "name": organization.name })),
                AuditOutcome::Success,
            )
            .await?;
        info!(organization_id = %id, "organization deleted");
        Ok(())
    }

    async fn deny(&self, actor: &Actor, action: &str, target: Option<Uuid>) -> Result<()> {
        self.audit
            .record(
                Some(actor.id),
                action,
                "Organization",
                target,
                None,
                AuditOutcome::Denied,
            )
            .await?;
        Ok(())
    }
}
