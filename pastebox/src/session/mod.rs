mod config;
mod errors;
mod manager;
mod types;

pub use config::{SESSION_COOKIE_MAX_AGE, SESSION_COOKIE_NAME};
pub use errors::SessionError;
pub use manager::SessionManager;
pub use types::{AUTH_USER_ID_KEY, FLASH_KEY, Session};
