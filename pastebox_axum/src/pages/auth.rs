use askama::Template;
use axum::{
    Extension, Form,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use http::StatusCode;

use pastebox::{Session, UserError};

use crate::error::WebError;
use crate::forms::{LoginForm, SignupForm};
use crate::session::AuthenticatedUser;
use crate::state::AppState;

use super::PageShell;

#[derive(Template)]
#[template(path = "signup.html")]
struct SignupTemplate {
    shell: PageShell,
    form: SignupForm,
}

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate {
    shell: PageShell,
    form: LoginForm,
}

pub(crate) async fn signup_form(
    Extension(session): Extension<Session>,
    user: Option<AuthenticatedUser>,
) -> Result<Response, WebError> {
    render_signup(
        &session,
        user.is_some(),
        SignupForm::default(),
        StatusCode::OK,
    )
}

pub(crate) async fn signup_post(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    user: Option<AuthenticatedUser>,
    Form(mut form): Form<SignupForm>,
) -> Result<Response, WebError> {
    form.validate();
    if !form.validation.is_valid() {
        return render_signup(&session, user.is_some(), form, StatusCode::BAD_REQUEST);
    }

    match state
        .users
        .insert(&form.name, &form.email, &form.password)
        .await
    {
        Ok(_) => {
            session.set_flash("user successfully created, please sign in");
            Ok(Redirect::to("/user/login").into_response())
        }
        Err(UserError::DuplicateEmail) => {
            form.validation
                .add_field_error("email", "email already in use");
            render_signup(&session, user.is_some(), form, StatusCode::BAD_REQUEST)
        }
        Err(err) => Err(err.into()),
    }
}

pub(crate) async fn login_form(
    Extension(session): Extension<Session>,
    user: Option<AuthenticatedUser>,
) -> Result<Response, WebError> {
    render_login(&session, user.is_some(), LoginForm::default(), StatusCode::OK)
}

pub(crate) async fn login_post(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    user: Option<AuthenticatedUser>,
    Form(mut form): Form<LoginForm>,
) -> Result<Response, WebError> {
    form.validate();
    if !form.validation.is_valid() {
        return render_login(&session, user.is_some(), form, StatusCode::BAD_REQUEST);
    }

    match state.users.authenticate(&form.email, &form.password).await {
        Ok(user_id) => {
            // Privilege changes ride on a fresh token.
            session.log_in(user_id)?;
            Ok(Redirect::to("/snippet/create").into_response())
        }
        Err(UserError::InvalidCredentials) => {
            form.validation
                .add_non_field_error("Email or password is incorrect");
            render_login(&session, user.is_some(), form, StatusCode::BAD_REQUEST)
        }
        Err(err) => Err(err.into()),
    }
}

pub(crate) async fn logout_post(
    Extension(session): Extension<Session>,
    user: AuthenticatedUser,
) -> Result<Response, WebError> {
    session.log_out()?;
    session.set_flash("You've been logged out successfully!");
    tracing::info!(user_id = user.id, "user logged out");
    Ok(Redirect::to("/").into_response())
}

fn render_signup(
    session: &Session,
    is_authenticated: bool,
    form: SignupForm,
    status: StatusCode,
) -> Result<Response, WebError> {
    let template = SignupTemplate {
        shell: PageShell::new(session, is_authenticated),
        form,
    };
    Ok((status, Html(template.render()?)).into_response())
}

fn render_login(
    session: &Session,
    is_authenticated: bool,
    form: LoginForm,
    status: StatusCode,
) -> Result<Response, WebError> {
    let template = LoginTemplate {
        shell: PageShell::new(session, is_authenticated),
        form,
    };
    Ok((status, Html(template.render()?)).into_response())
}
