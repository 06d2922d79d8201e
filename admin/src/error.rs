use thiserror::Error;

use authz::AuthzError;
use store::StoreError;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Authorization denial; deliberately detail-free.
    #[error("Not authorized to perform this action")]
    Forbidden,

    /// The re-authentication challenge on a destructive operation failed.
    /// Distinct from [`AdminError::Forbidden`]: the actor is allowed to do
    /// this, they just have not proven their identity freshly enough.
    #[error("Password verification failed")]
    Authentication,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Audit error: {0}")]
    Audit(#[from] audit::AuditError),
}

impl From<AuthzError> for AdminError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::Validation(msg) => AdminError::Validation(msg),
            AuthzError::Forbidden => AdminError::Forbidden,
        }
    }
}

pub type Result<T> = std::result::Result<T, AdminError>;
