use askama::Template;
use axum::{
    Extension,
    extract::State,
    response::{Html, IntoResponse, Response},
};

use pastebox::{Session, Snippet};

use crate::error::WebError;
use crate::session::AuthenticatedUser;
use crate::state::AppState;

use super::PageShell;

#[derive(Template)]
#[template(path = "home.html")]
struct HomeTemplate {
    shell: PageShell,
    snippets: Vec<Snippet>,
}

pub(crate) async fn home(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    user: Option<AuthenticatedUser>,
) -> Result<Response, WebError> {
    let snippets = state.snippets.latest().await?;
    let template = HomeTemplate {
        shell: PageShell::new(&session, user.is_some()),
        snippets,
    };
    Ok(Html(template.render()?).into_response())
}
