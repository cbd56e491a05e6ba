//! pastebox - core services for the pastebox snippet-sharing application
//!
//! This crate provides the storage-backed building blocks the web layer is
//! assembled from: form validation rules, the credential store, the session
//! store and the snippet lifecycle. Nothing in here speaks HTTP beyond
//! cookie-header helpers; the axum integration lives in `pastebox-axum`.

mod session;
mod snippet;
mod storage;
mod userdb;
mod utils;
mod validator;

pub use session::{
    AUTH_USER_ID_KEY, FLASH_KEY, SESSION_COOKIE_MAX_AGE, SESSION_COOKIE_NAME, Session,
    SessionError, SessionManager,
};
pub use snippet::{PERMITTED_EXPIRY_DAYS, Snippet, SnippetError, SnippetStore};
pub use storage::{
    CacheStore, DataStore, StorageError, connect_cache_store, connect_data_store,
};
pub use userdb::{User, UserError, UserStore};
pub use utils::{UtilError, gen_random_string, header_set_cookie};
pub use validator::{Validation, is_email, max_chars, min_chars, not_blank, permitted_value};
