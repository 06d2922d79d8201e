//! Error taxonomy for casework mutations.
//!
//! Denials are a single generic variant: callers (and therefore clients)
//! cannot learn which rule fired. Validation and not-found messages concern
//! the caller's own input and are safe to spell out.

use thiserror::Error;

use authz::AuthzError;
use store::StoreError;

#[derive(Debug, Error)]
pub enum CaseworkError {
    /// Malformed or missing required input.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The actor may not perform this action. Deliberately detail-free.
    #[error("Not authorized to perform this action")]
    Forbidden,

    /// The targeted record was absent at decision time.
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Audit error: {0}")]
    Audit(#[from] audit::AuditError),
}

impl From<AuthzError> for CaseworkError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::Validation(msg) => CaseworkError::Validation(msg),
            AuthzError::Forbidden => CaseworkError::Forbidden,
        }
    }
}

pub type Result<T> = std::result::Result<T, CaseworkError>;
