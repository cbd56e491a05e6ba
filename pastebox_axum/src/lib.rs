//! Axum integration for the pastebox core: the middleware chain, typed
//! extractors, form types, server-rendered pages and the site router.

mod error;
mod forms;
mod middleware;
mod pages;
mod router;
mod session;
mod state;

pub use error::WebError;
pub use forms::{LoginForm, SignupForm, SnippetCreateForm};
pub use middleware::{
    csrf_guard, derive_auth, handle_panic, log_request, require_auth, security_headers,
    session_layer,
};
pub use router::router;
pub use session::{AuthRedirect, AuthenticatedUser};
pub use state::AppState;

// Re-exports the server binary and integration tests build their state from.
pub use pastebox::{
    SESSION_COOKIE_NAME, Session, SessionManager, SnippetStore, UserStore, connect_cache_store,
    connect_data_store,
};
