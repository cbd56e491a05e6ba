use thiserror::Error;

#[derive(Clone, Error, Debug, PartialEq)]
pub enum UserError {
    /// Unknown email or wrong password. Deliberately one variant for both
    /// so callers cannot tell which check failed.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The email is already registered (unique index violation).
    #[error("Duplicate email")]
    DuplicateEmail,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Password hash error: {0}")]
    Hash(String),
}
