//! Error types for the decision core.
//!
//! Predicates never return these; they are raised only by the fallible
//! request-shaping helpers (currently case-creation targeting). Denials keep
//! a single generic message so a caller cannot tell which rule fired.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthzError {
    /// A required field was missing or an impossible combination was
    /// requested (e.g. SUPER_ADMIN creating a case without naming a tenant).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The actor may not perform the action. Deliberately detail-free.
    #[error("Not authorized to perform this action")]
    Forbidden,
}

pub type Result<T> = std::result::Result<T, AuthzError>;
