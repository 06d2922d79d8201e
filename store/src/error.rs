use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The targeted record was absent at mutation time.
    #[error("Record not found")]
    NotFound,

    /// A uniqueness constraint was violated (duplicate username, email,
    /// organization name, or case/user assignment pair).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A stored password hash could not be parsed or applied.
    #[error("Password hash error: {0}")]
    PasswordHash(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
