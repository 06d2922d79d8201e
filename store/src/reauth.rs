//! Re-authentication collaborator for destructive admin operations.
//!
//! Deleting a user or resetting someone's password requires the acting
//! admin to re-submit their own current password. Verification is a distinct
//! first step before the mutation; a mismatch answers `false` without
//! revealing anything about the intended target.

use std::sync::Arc;

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use async_trait::async_trait;
use rand::rngs::OsRng;
use tracing::warn;
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::traits::UserStore;

/// Hash a plaintext password into an Argon2id PHC string.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| StoreError::PasswordHash(e.to_string()))
}

/// Verify a plaintext password against a stored PHC hash.
///
/// `Ok(false)` on mismatch; an error only for a malformed stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| StoreError::PasswordHash(format!("invalid hash format: {e}")))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(StoreError::PasswordHash(e.to_string())),
    }
}

/// External verification service interface: `(actor_id, password) -> bool`.
#[async_trait]
pub trait Reauthenticator: Send + Sync {
    async fn verify(&self, actor_id: Uuid, password: &str) -> Result<bool>;
}

/// Reauthenticator backed by the user store's password hashes.
pub struct PasswordGate {
    users: Arc<dyn UserStore>,
}

impl PasswordGate {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl Reauthenticator for PasswordGate {
    async fn verify(&self, actor_id: Uuid, password: &str) -> Result<bool> {
        let Some(user) = self.users.get_user(actor_id).await? else {
            // An unknown actor id verifies as a plain mismatch.
            warn!(%actor_id, "re-authentication attempted for unknown actor");
            return Ok(false);
        };
        verify_password(password, &user.password_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use entities::{Role, User};

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("battery staple", &hash).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error_not_a_mismatch() {
        assert!(verify_password("pw", "not-a-hash").is_err());
    }

    #[tokio::test]
    async fn gate_verifies_against_the_stored_hash() {
        let store = Arc::new(MemoryStore::new());
        let user = User::new(
            "admin",
            "admin@example.com",
            "Admin",
            hash_password("s3cret").unwrap(),
            Role::SuperAdmin,
            None,
        );
        let actor_id = user.id;
        store.insert_user(user).await.unwrap();

        let gate = PasswordGate::new(store);
        assert!(gate.verify(actor_id, "s3cret").await.unwrap());
        assert!(!gate.verify(actor_id, "wrong").await.unwrap());
        assert!(!gate.verify(Uuid::new_v4(), "s3cret").await.unwrap());
    }
}
