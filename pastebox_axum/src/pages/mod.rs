//! Server-rendered pages, one file per area, with their askama template
//! structs beside the handlers.

mod auth;
mod home;
mod snippet;

pub(crate) use auth::{login_form, login_post, logout_post, signup_form, signup_post};
pub(crate) use home::home;
pub(crate) use snippet::{create_form, create_post, view};

use pastebox::Session;

/// Data every rendered page carries: the consumed flash message, whether the
/// visitor is signed in, and the CSRF token the page's forms must echo.
pub(crate) struct PageShell {
    pub flash: Option<String>,
    pub is_authenticated: bool,
    pub csrf_token: String,
}

impl PageShell {
    /// Build the shell for one render. Taking the flash message clears it,
    /// so construct the shell exactly once per response.
    pub(crate) fn new(session: &Session, is_authenticated: bool) -> Self {
        Self {
            flash: session.take_flash(),
            is_authenticated,
            csrf_token: session.csrf_token(),
        }
    }
}
