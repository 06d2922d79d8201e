//! User account administration.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use audit::{AuditOutcome, AuditTrail};
use authz::{
    allowed_roles_for_creation, allowed_roles_for_edit, can_delete_user, can_edit_user,
    can_edit_user_role_and_organization, can_manage_users, can_reset_user_password,
};
use entities::{Actor, Role, User};
use store::{hash_password, verify_password, OrganizationStore, Reauthenticator, UserStore};

use crate::error::{AdminError, Result};

const MIN_PASSWORD_LEN: usize = 8;

/// Input for account creation.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub role: Role,
    /// Ignored for ORG_ADMIN actors, whose accounts always land in their
    /// own tenant.
    pub organization_id: Option<Uuid>,
}

/// Partial update for an account. Absent fields are left untouched.
///
/// `organization_id` reassignment is SUPER_ADMIN-only, including on your
/// own account. `role` changes are bounded by the actor's edit matrix: an
/// ORG_ADMIN may move a same-org base-role user between STAFF_USER and
/// INDIVIDUAL_USER but nothing beyond that.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: Option<Role>,
    pub organization_id: Option<Option<Uuid>>,
    pub is_active: Option<bool>,
}

pub struct UserService {
    users: Arc<dyn UserStore>,
    organizations: Arc<dyn OrganizationStore>,
    reauth: Arc<dyn Reauthenticator>,
    audit: Arc<AuditTrail>,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserStore>,
        organizations: Arc<dyn OrganizationStore>,
        reauth: Arc<dyn Reauthenticator>,
        audit: Arc<AuditTrail>,
    ) -> Self {
        Self {
            users,
            organizations,
            reauth,
            audit,
        }
    }

    /// Create an account.
    ///
    /// The handed-out role must be in the actor's creation matrix; the
    /// target tenant is the actor's own for ORG_ADMIN and free for
    /// SUPER_ADMIN. Organization-scoped accounts count against the tenant's
    /// user quota.
    pub async fn create_user(&self, actor: &Actor, input: NewUser) -> Result<User> {
        if !can_manage_users(actor) {
            self.deny(actor, "CREATE", None).await?;
            return Err(AdminError::Forbidden);
        }
        if !allowed_roles_for_creation(actor).contains(&input.role) {
            self.deny(actor, "CREATE", None).await?;
            return Err(AdminError::Forbidden);
        }
        validate_password(&input.password)?;
        if input.username.trim().is_empty() {
            return Err(AdminError::Validation(
                "Username must not be empty".to_string(),
            ));
        }

        let organization_id = match actor.role {
            Role::SuperAdmin => input.organization_id,
            // ORG_ADMIN accounts always land in the admin's own tenant.
            _ => actor.organization_id,
        };
        if input.role.requires_organization() && organization_id.is_none() {
            return Err(AdminError::Validation(format!(
                "Role {} requires an organization",
                input.role
            )));
        }

        if let Some(org_id) = organization_id {
            let organization = self
                .organizations
                .get_organization(org_id)
                .await?
                .ok_or(AdminError::NotFound("Organization"))?;
            let current = self.users.count_organization_users(org_id).await?;
            if current >= organization.max_users {
                return Err(AdminError::Validation(format!(
                    "Organization has reached its user limit of {}",
                    organization.max_users
                )));
            }
        }

        if self
            .users
            .find_user_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(AdminError::Validation(
                "Username is already taken".to_string(),
            ));
        }
        if self.users.find_user_by_email(&input.email).await?.is_some() {
            return Err(AdminError::Validation(
                "Email is already registered".to_string(),
            ));
        }

        let user = User::new(
            input.username,
            input.email,
            input.full_name,
            hash_password(&input.password)?,
            input.role,
            organization_id,
        );
        self.users.insert_user(user.clone()).await?;

        self.audit
            .record(
                Some(actor.id),
                "CREATE",
                "User",
                Some(user.id),
                Some(serde_json::json!({ "username": user.username, "role": user.role })),
                AuditOutcome::Success,
            )
            .await?;
        info!(user_id = %user.id, role = %user.role, "user created");
        Ok(user)
    }

    pub async fn get_user(&self, actor: &Actor, id: Uuid) -> Result<User> {
        let target = self
            .users
            .get_user(id)
            .await?
            .ok_or(AdminError::NotFound("User"))?;
        if actor.id == id || can_edit_user(actor, &target) {
            Ok(target)
        } else {
            Err(AdminError::Forbidden)
        }
    }

    /// Accounts visible to the actor: everyone for SUPER_ADMIN, the
    /// actor's tenant for ORG_ADMIN.
    pub async fn list_users(&self, actor: &Actor) -> Result<Vec<User>> {
        if !can_manage_users(actor) {
            return Err(AdminError::Forbidden);
        }
        match actor.role {
            Role::SuperAdmin => Ok(self.users.list_users(None).await?),
            _ => match actor.organization_id {
                Some(org) => Ok(self.users.list_users(Some(org)).await?),
                None => Ok(Vec::new()),
            },
        }
    }

    /// Apply a partial update to an account.
    pub async fn update_user(&self, actor: &Actor, id: Uuid, update: UserUpdate) -> Result<User> {
        let mut target = self
            .users
            .get_user(id)
            .await?
            .ok_or(AdminError::NotFound("User"))?;

        if !can_edit_user(actor, &target) {
            self.deny(actor, "UPDATE", Some(id)).await?;
            return Err(AdminError::Forbidden);
        }

        if update.organization_id.is_some() && !can_edit_user_role_and_organization(actor) {
            self.deny(actor, "UPDATE", Some(id)).await?;
            return Err(AdminError::Forbidden);
        }
        if let Some(role) = update.role {
            // Self-demotion and edits on peers or above are rejected for
            // everyone below SUPER_ADMIN, whatever the requested role.
            let reaches_target = actor.role == Role::SuperAdmin
                || (actor.id != target.id && actor.role.is_elevated_over(target.role));
            if !reaches_target || !allowed_roles_for_edit(actor).contains(&role) {
                self.deny(actor, "UPDATE", Some(id)).await?;
                return Err(AdminError::Forbidden);
            }
        }
        if update.is_active == Some(false) && actor.id == target.id {
            return Err(AdminError::Validation(
                "Cannot deactivate your own account".to_string(),
            ));
        }

        if let Some(email) = update.email {
            if email != target.email && self.users.find_user_by_email(&email).await?.is_some() {
                return Err(AdminError::Validation(
                    "Email is already registered".to_string(),
                ));
            }
            target.email = email;
        }
        if let Some(full_name) = update.full_name {
            target.full_name = full_name;
        }
        if let Some(role) = update.role {
            target.role = role;
        }
        if let Some(organization_id) = update.organization_id {
            target.organization_id = organization_id;
        }
        if target.role.requires_organization() && target.organization_id.is_none() {
            return Err(AdminError::Validation(format!(
                "Role {} requires an organization",
                target.role
            )));
        }
        if let Some(is_active) = update.is_active {
            target.is_active = is_active;
        }
        target.updated_at = chrono::Utc::now();

        self.users.update_user(target.clone()).await?;
        self.audit
            .record(
                Some(actor.id),
                "UPDATE",
                "User",
                Some(id),
                None,
                AuditOutcome::Success,
            )
            .await?;
        Ok(target)
    }

    /// Hard-delete an account. The actor must pass the re-authentication
    /// gate with their own current password; a failed check leaves the
    /// target untouched.
    pub async fn delete_user(&self, actor: &Actor, id: Uuid, actor_password: &str) -> Result<()> {
        let target = self
            .users
            .get_user(id)
            .await?
            .ok_or(AdminError::NotFound("User"))?;

        if !can_delete_user(actor, &target) {
            self.deny(actor, "DELETE", Some(id)).await?;
            return Err(AdminError::Forbidden);
        }
        if !self.reauth.verify(actor.id, actor_password).await? {
            warn!(actor_id = %actor.id, "re-authentication failed for user deletion");
            self.audit
                .record(
                    Some(actor.id),
                    "DELETE",
                    "User",
                    Some(id),
                    Some(serde_json::json!({ "reason": "reauthentication_failed" })),
                    AuditOutcome::Failed,
                )
                .await?;
            return Err(AdminError::Authentication);
        }

        self.users.delete_user(id).await?;
        self.audit
            .record(
                Some(actor.id),
                "DELETE",
                "User",
                Some(id),
                Some(serde_json::json!({ "username": target.username })),
                AuditOutcome::Success,
            )
            .await?;
        info!(user_id = %id, "user deleted");
        Ok(())
    }

    /// Reset someone else's password on their behalf.
    ///
    /// Re-authentication gated like deletion: handing out a new credential
    /// is a takeover primitive.
    pub async fn reset_user_password(
        &self,
        actor: &Actor,
        id: Uuid,
        actor_password: &str,
        new_password: &str,
    ) -> Result<()> {
        let mut target = self
            .users
            .get_user(id)
            .await?
            .ok_or(AdminError::NotFound("User"))?;

        if !can_reset_user_password(actor, &target) {
            self.deny(actor, "RESET_PASSWORD", Some(id)).await?;
            return Err(AdminError::Forbidden);
        }
        validate_password(new_password)?;
        if !self.reauth.verify(actor.id, actor_password).await? {
            self.audit
                .record(
                    Some(actor.id),
                    "RESET_PASSWORD",
                    "User",
                    Some(id),
                    Some(serde_json::json!({ "reason": "reauthentication_failed" })),
                    AuditOutcome::Failed,
                )
                .await?;
            return Err(AdminError::Authentication);
        }

        target.password_hash = hash_password(new_password)?;
        target.password_changed_at = chrono::Utc::now();
        target.updated_at = target.password_changed_at;
        self.users.update_user(target).await?;

        self.audit
            .record(
                Some(actor.id),
                "RESET_PASSWORD",
                "User",
                Some(id),
                None,
                AuditOutcome::Success,
            )
            .await?;
        Ok(())
    }

    /// Change your own password, proving knowledge of the current one.
    pub async fn change_own_password(
        &self,
        actor: &Actor,
        current_password: &str,
        new_password: &str,
    ) -> Result<()> {
        if !actor.is_active {
            return Err(AdminError::Forbidden);
        }
        let mut me = self
            .users
            .get_user(actor.id)
            .await?
            .ok_or(AdminError::NotFound("User"))?;
        validate_password(new_password)?;
        if !verify_password(current_password, &me.password_hash)? {
            self.audit
                .record(
                    Some(actor.id),
                    "CHANGE_PASSWORD",
                    "User",
                    Some(actor.id),
                    None,
                    AuditOutcome::Failed,
                )
                .await?;
            return Err(AdminError::Authentication);
        }

        me.password_hash = hash_password(new_password)?;
        me.password_changed_at = chrono::Utc::now();
        me.updated_at = me.password_changed_at;
        self.users.update_user(me).await?;

        self.audit
            .record(
                Some(actor.id),
                "CHANGE_PASSWORD",
                "User",
                Some(actor.id),
                None,
                AuditOutcome::Success,
            )
            .await?;
        Ok(())
    }

    async fn deny(&self, actor: &Actor, action: &str, target: Option<Uuid>) -> Result<()> {
        self.audit
            .record(
                Some(actor.id),
                action,
                "User",
                target,
                None,
                AuditOutcome::Denied,
            )
            .await?;
        Ok(())
    }
}

fn validate_password(password: &str) -> Result<()> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AdminError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}
