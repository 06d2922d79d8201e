//! Composition root.
//!
//! Wires the in-memory store, the audit trail, and the casework and admin
//! services into a single [`Platform`] handle. A deployment embedding the
//! core swaps the store for its own trait implementations and calls the
//! same services.

pub mod config;
pub mod logging;

use std::sync::Arc;

use admin::{OrganizationService, UserService};
use audit::{AuditConfig, AuditTrail};
use casework::{AssignmentService, CaseService, EvidenceService};
use entities::{Role, User};
use store::{hash_password, MemoryStore, PasswordGate, UserStore};

pub use config::PlatformConfig;
pub use logging::{init_logging, log_shutdown};

pub struct Platform {
    pub store: Arc<MemoryStore>,
    pub audit: Arc<AuditTrail>,
    pub cases: CaseService,
    pub evidence: EvidenceService,
    pub assignments: AssignmentService,
    pub users: UserService,
    pub organizations: OrganizationService,
}

impl Platform {
    pub fn new(config: &PlatformConfig) -> Result<Self, audit::AuditError> {
        let audit = Arc::new(AuditTrail::new(AuditConfig {
            trail_path: config.audit_trail_path(),
        })?);
        let store = Arc::new(MemoryStore::default());
        let reauth = Arc::new(PasswordGate::new(store.clone()));

        let cases = CaseService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            audit.clone(),
        );
        let evidence =
            EvidenceService::new(store.clone(), store.clone(), store.clone(), audit.clone());
        let assignments =
            AssignmentService::new(store.clone(), store.clone(), store.clone(), audit.clone());
        let users = UserService::new(store.clone(), store.clone(), reauth.clone(), audit.clone());
        let organizations = OrganizationService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            reauth,
            audit.clone(),
        );

        tracing::info!("platform services wired");
        Ok(Self {
            store,
            audit,
            cases,
            evidence,
            assignments,
            users,
            organizations,
        })
    }

    /// Seed the first SUPER_ADMIN account on an empty deployment.
    ///
    /// No-op when the username is already taken, so repeated startups
    /// converge.
    pub async fn bootstrap_super_admin(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, store::StoreError> {
        if let Some(existing) = self.store.find_user_by_username(username).await? {
            return Ok(existing);
        }
        let user = User::new(
            username,
            email,
            "Platform Administrator",
            hash_password(password)?,
            Role::SuperAdmin,
            None,
        );
        self.store.insert_user(user.clone()).await?;
        tracing::info!(user_id = %user.id, "bootstrap super admin created");
        Ok(user)
    }
}
