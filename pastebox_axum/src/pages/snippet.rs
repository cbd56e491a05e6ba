use askama::Template;
use axum::{
    Extension, Form,
    extract::{Path, State, rejection::PathRejection},
    response::{Html, IntoResponse, Redirect, Response},
};
use http::StatusCode;

use pastebox::{Session, Snippet};

use crate::error::WebError;
use crate::forms::SnippetCreateForm;
use crate::session::AuthenticatedUser;
use crate::state::AppState;

use super::PageShell;

#[derive(Template)]
#[template(path = "view.html")]
struct ViewTemplate {
    shell: PageShell,
    snippet: Snippet,
}

#[derive(Template)]
#[template(path = "create.html")]
struct CreateTemplate {
    shell: PageShell,
    form: SnippetCreateForm,
}

pub(crate) async fn view(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    user: Option<AuthenticatedUser>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Response, WebError> {
    // Unparseable and non-positive ids look exactly like missing rows.
    let id = match id {
        Ok(Path(id)) if id >= 1 => id,
        _ => return Err(WebError::NotFound),
    };
    let snippet = state.snippets.get(id).await?;
    let template = ViewTemplate {
        shell: PageShell::new(&session, user.is_some()),
        snippet,
    };
    Ok(Html(template.render()?).into_response())
}

pub(crate) async fn create_form(
    Extension(session): Extension<Session>,
) -> Result<Response, WebError> {
    let form = SnippetCreateForm {
        expires: 365,
        ..SnippetCreateForm::default()
    };
    render_create(&session, form, StatusCode::OK)
}

pub(crate) async fn create_post(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Form(mut form): Form<SnippetCreateForm>,
) -> Result<Response, WebError> {
    form.validate();
    if !form.validation.is_valid() {
        return render_create(&session, form, StatusCode::BAD_REQUEST);
    }

    let id = state
        .snippets
        .insert(&form.title, &form.content, form.expires)
        .await?;
    session.set_flash("Snippet successfully created");
    Ok(Redirect::to(&format!("/snippet/view/{id}")).into_response())
}

// These pages sit behind the auth gate, so the shell is always signed-in.
fn render_create(
    session: &Session,
    form: SnippetCreateForm,
    status: StatusCode,
) -> Result<Response, WebError> {
    let template = CreateTemplate {
        shell: PageShell::new(session, true),
        form,
    };
    Ok((status, Html(template.render()?)).into_response())
}
