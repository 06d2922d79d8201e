//! In-memory store implementation.
//!
//! Backs the composition root and the integration tests. Each entity map
//! sits behind its own RwLock; no lock is held across an await point.

use std::collections::HashMap;

use async_trait::async_trait;
use entities::{Case, CaseAssignment, Evidence, Organization, User};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::traits::{AssignmentStore, CaseStore, EvidenceStore, OrganizationStore, UserStore};

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    organizations: RwLock<HashMap<Uuid, Organization>>,
    cases: RwLock<HashMap<Uuid, Case>>,
    evidence: RwLock<HashMap<Uuid, Evidence>>,
    assignments: RwLock<Vec<CaseAssignment>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list_users(&self, organization_id: Option<Uuid>) -> Result<Vec<User>> {
        let users = self.users.read().await;
        let mut listed: Vec<User> = match organization_id {
            Some(org) => users
                .values()
                .filter(|u| u.organization_id == Some(org))
                .cloned()
                .collect(),
            None => users.values().cloned().collect(),
        };
        listed.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(listed)
    }

    async fn count_organization_users(&self, organization_id: Uuid) -> Result<u32> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .filter(|u| u.organization_id == Some(organization_id))
            .count() as u32)
    }

    async fn insert_user(&self, user: User) -> Result<()> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(StoreError::Conflict(
                "username or email already registered".to_string(),
            ));
        }
        debug!(user_id = %user.id, "inserting user");
        users.insert(user.id, user);
        Ok(())
    }

    async fn update_user(&self, user: User) -> Result<()> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(StoreError::NotFound);
        }
        users.insert(user.id, user);
        Ok(())
    }

    async fn delete_user(&self, id: Uuid) -> Result<()> {
        self.users
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl OrganizationStore for MemoryStore {
    async fn get_organization(&self, id: Uuid) -> Result<Option<Organization>> {
        Ok(self.organizations.read().await.get(&id).cloned())
    }

    async fn find_organization_by_name(&self, name: &str) -> Result<Option<Organization>> {
        Ok(self
            .organizations
            .read()
            .await
            .values()
            .find(|o| o.name == name)
            .cloned())
    }

    async fn list_organizations(&self) -> Result<Vec<Organization>> {
        let mut listed: Vec<Organization> =
            self.organizations.read().await.values().cloned().collect();
        listed.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(listed)
    }

    async fn insert_organization(&self, organization: Organization) -> Result<()> {
        let mut orgs = self.organizations.write().await;
        if orgs.values().any(|o| o.name == organization.name) {
            return Err(StoreError::Conflict(
                "organization name already exists".to_string(),
            ));
        }
        orgs.insert(organization.id, organization);
        Ok(())
    }

    async fn update_organization(&self, organization: Organization) -> Result<()> {
        let mut orgs = self.organizations.write().await;
        if !orgs.contains_key(&organization.id) {
            return Err(StoreError::NotFound);
        }
        orgs.insert(organization.id, organization);
        Ok(())
    }

    async fn delete_organization(&self, id: Uuid) -> Result<()> {
        self.organizations
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl CaseStore for MemoryStore {
    async fn get_case(&self, id: Uuid) -> Result<Option<Case>> {
        Ok(self.cases.read().await.get(&id).cloned())
    }

    async fn list_cases(&self) -> Result<Vec<Case>> {
        let mut listed: Vec<Case> = self.cases.read().await.values().cloned().collect();
        listed.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(listed)
    }

    async fn list_cases_for_organization(&self, organization_id: Uuid) -> Result<Vec<Case>> {
        let mut listed: Vec<Case> = self
            .cases
            .read()
            .await
            .values()
            .filter(|c| c.organization_id == Some(organization_id))
            .cloned()
            .collect();
        listed.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(listed)
    }

    async fn count_organization_cases(&self, organization_id: Uuid) -> Result<u32> {
        Ok(self
            .cases
            .read()
            .await
            .values()
            .filter(|c| c.organization_id == Some(organization_id))
            .count() as u32)
    }

    async fn insert_case(&self, case: Case) -> Result<()> {
        self.cases.write().await.insert(case.id, case);
        Ok(())
    }

    async fn update_case(&self, case: Case) -> Result<()> {
        let mut cases = self.cases.write().await;
        if !cases.contains_key(&case.id) {
            return Err(StoreError::NotFound);
        }
        cases.insert(case.id, case);
        Ok(())
    }

    async fn delete_case(&self, id: Uuid) -> Result<()> {
        self.cases
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl EvidenceStore for MemoryStore {
    async fn get_evidence(&self, id: Uuid) -> Result<Option<Evidence>> {
        Ok(self.evidence.read().await.get(&id).cloned())
    }

    async fn list_evidence_for_case(&self, case_id: Uuid) -> Result<Vec<Evidence>> {
        let mut listed: Vec<Evidence> = self
            .evidence
            .read()
            .await
            .values()
            .filter(|e| e.case_id == case_id)
            .cloned()
            .collect();
        listed.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(listed)
    }

    async fn insert_evidence(&self, evidence: Evidence) -> Result<()> {
        self.evidence.write().await.insert(evidence.id, evidence);
        Ok(())
    }

    async fn update_evidence(&self, evidence: Evidence) -> Result<()> {
        let mut items = self.evidence.write().await;
        if !items.contains_key(&evidence.id) {
            return Err(StoreError::NotFound);
        }
        items.insert(evidence.id, evidence);
        Ok(())
    }

    async fn delete_evidence(&self, id: Uuid) -> Result<()> {
        self.evidence
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn delete_evidence_for_case(&self, case_id: Uuid) -> Result<()> {
        self.evidence.write().await.retain(|_, e| e.case_id != case_id);
        Ok(())
    }
}

#[async_trait]
impl AssignmentStore for MemoryStore {
    async fn list_assignments_for_case(&self, case_id: Uuid) -> Result<Vec<CaseAssignment>> {
        Ok(self
            .assignments
            .read()
            .await
            .iter()
            .filter(|a| a.case_id == case_id)
            .cloned()
            .collect())
    }

    async fn list_case_ids_for_user(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        Ok(self
            .assignments
            .read()
            .await
            .iter()
            .filter(|a| a.user_id == user_id)
            .map(|a| a.case_id)
            .collect())
    }

    async fn assignment_exists(&self, case_id: Uuid, user_id: Uuid) -> Result<bool> {
        Ok(self
            .assignments
            .read()
            .await
            .iter()
            .any(|a| a.case_id == case_id && a.user_id == user_id))
    }

    async fn insert_assignment(&self, assignment: CaseAssignment) -> Result<()> {
        let mut rows = self.assignments.write().await;
        // Unique (case_id, user_id) pairs, as in the assignment table schema.
        if rows
            .iter()
            .any(|a| a.case_id == assignment.case_id && a.user_id == assignment.user_id)
        {
            return Err(StoreError::Conflict(
                "user already assigned to case".to_string(),
            ));
        }
        rows.push(assignment);
        Ok(())
    }

    async fn delete_assignment(&self, case_id: Uuid, user_id: Uuid) -> Result<()> {
        let mut rows = self.assignments.write().await;
        let before = rows.len();
        rows.retain(|a| !(a.case_id == case_id && a.user_id == user_id));
        if rows.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete_assignments_for_case(&self, case_id: Uuid) -> Result<()> {
        self.assignments
            .write()
            .await
            .retain(|a| a.case_id != case_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entities::Role;

    #[tokio::test]
    async fn duplicate_usernames_are_refused() {
        let store = MemoryStore::new();
        let a = User::new("dup", "a@example.com", "A", "hash", Role::IndividualUser, None);
        let b = User::new("dup", "b@example.com", "B", "hash", Role::IndividualUser, None);
        store.insert_user(a).await.unwrap();
        assert!(matches!(
            store.insert_user(b).await,
            Err(StoreError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn duplicate_assignment_pairs_are_refused() {
        let store = MemoryStore::new();
        let case_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        let by = Uuid::new_v4();
        store
            .insert_assignment(CaseAssignment::new(case_id, user_id, by))
            .await
            .unwrap();
        assert!(matches!(
            store
                .insert_assignment(CaseAssignment::new(case_id, user_id, by))
                .await,
            Err(StoreError::Conflict(_))
        ));
        assert!(store.assignment_exists(case_id, user_id).await.unwrap());
    }

    #[tokio::test]
    async fn case_cascades_clear_dependents() {
        let store = MemoryStore::new();
        let case = Case::new("c", Uuid::new_v4(), None);
        let case_id = case.id;
        store.insert_case(case).await.unwrap();
        store
            .insert_evidence(Evidence::new(
                case_id,
                entities::EvidenceKind::Text,
                "note",
                Uuid::new_v4(),
                None,
            ))
            .await
            .unwrap();
        store
            .insert_assignment(CaseAssignment::new(case_id, Uuid::new_v4(), Uuid::new_v4()))
            .await
            .unwrap();

        store.delete_evidence_for_case(case_id).await.unwrap();
        store.delete_assignments_for_case(case_id).await.unwrap();
        store.delete_case(case_id).await.unwrap();

        assert!(store.list_evidence_for_case(case_id).await.unwrap().is_empty());
        assert!(store
            .list_assignments_for_case(case_id)
            .await
            .unwrap()
            .is_empty());
        assert!(store.get_case(case_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn organization_counts_track_membership() {
        let store = MemoryStore::new();
        let org = Uuid::new_v4();
        for i in 0..3 {
            store
                .insert_user(User::new(
                    format!("user{i}"),
                    format!("user{i}@example.com"),
                    "U",
                    "hash",
                    Role::StaffUser,
                    Some(org),
                ))
                .await
                .unwrap();
        }
        assert_eq!(store.count_organization_users(org).await.unwrap(), 3);
        assert_eq!(
            store
                .count_organization_users(Uuid::new_v4())
                .await
                .unwrap(),
            0
        );
    }
}
