use thiserror::Error;

use crate::utils::UtilError;

#[derive(Debug, Error, Clone)]
pub enum SessionError {
    #[error("Storage error: {0}")]
    Storage(String),

    /// Error from utils operations (token generation, cookie assembly)
    #[error("Utils error: {0}")]
    Utils(#[from] UtilError),
}
