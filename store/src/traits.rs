//! Repository traits for the external persistence collaborator.
//!
//! All operations are async and object-safe so services can hold
//! `Arc<dyn ...>` handles. The store is the final authority on uniqueness
//! constraints; services check first for friendlier errors, but the store
//! must refuse duplicates regardless. Write serialization (two simultaneous
//! assignment edits, say) is the store's job as well; last-write-wins is
//! acceptable.

use async_trait::async_trait;
use entities::{Case, CaseAssignment, Evidence, Organization, User};
use uuid::Uuid;

use crate::error::Result;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
    /// All users when `organization_id` is `None`, otherwise members only.
    async fn list_users(&self, organization_id: Option<Uuid>) -> Result<Vec<User>>;
    async fn count_organization_users(&self, organization_id: Uuid) -> Result<u32>;
    async fn insert_user(&self, user: User) -> Result<()>;
    async fn update_user(&self, user: User) -> Result<()>;
    async fn delete_user(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait OrganizationStore: Send + Sync {
    async fn get_organization(&self, id: Uuid) -> Result<Option<Organization>>;
    async fn find_organization_by_name(&self, name: &str) -> Result<Option<Organization>>;
    async fn list_organizations(&self) -> Result<Vec<Organization>>;
    async fn insert_organization(&self, organization: Organization) -> Result<()>;
    async fn update_organization(&self, organization: Organization) -> Result<()>;
    async fn delete_organization(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait CaseStore: Send + Sync {
    async fn get_case(&self, id: Uuid) -> Result<Option<Case>>;
    async fn list_cases(&self) -> Result<Vec<Case>>;
    async fn list_cases_for_organization(&self, organization_id: Uuid) -> Result<Vec<Case>>;
    async fn count_organization_cases(&self, organization_id: Uuid) -> Result<u32>;
    async fn insert_case(&self, case: Case) -> Result<()>;
    async fn update_case(&self, case: Case) -> Result<()>;
    async fn delete_case(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait EvidenceStore: Send + Sync {
    async fn get_evidence(&self, id: Uuid) -> Result<Option<Evidence>>;
    async fn list_evidence_for_case(&self, case_id: Uuid) -> Result<Vec<Evidence>>;
    async fn insert_evidence(&self, evidence: Evidence) -> Result<()>;
    async fn update_evidence(&self, evidence: Evidence) -> Result<()>;
    async fn delete_evidence(&self, id: Uuid) -> Result<()>;
    /// Cascade hook used by case deletion.
    async fn delete_evidence_for_case(&self, case_id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait AssignmentStore: Send + Sync {
    async fn list_assignments_for_case(&self, case_id: Uuid) -> Result<Vec<CaseAssignment>>;
    async fn list_case_ids_for_user(&self, user_id: Uuid) -> Result<Vec<Uuid>>;
    async fn assignment_exists(&self, case_id: Uuid, user_id: Uuid) -> Result<bool>;
    async fn insert_assignment(&self, assignment: CaseAssignment) -> Result<()>;
    async fn delete_assignment(&self, case_id: Uuid, user_id: Uuid) -> Result<()>;
    /// Cascade hook used by case deletion.
    async fn delete_assignments_for_case(&self, case_id: Uuid) -> Result<()>;
}
