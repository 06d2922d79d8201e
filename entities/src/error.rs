use thiserror::Error;

#[derive(Debug, Error)]
pub enum EntityError {
    /// A role string did not match any of the four known roles.
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Unknown case status: {0}")]
    UnknownStatus(String),

    #[error("Unknown evidence kind: {0}")]
    UnknownEvidenceKind(String),
}

pub type Result<T> = std::result::Result<T, EntityError>;
