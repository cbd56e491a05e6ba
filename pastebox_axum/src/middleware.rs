use std::any::Any;
use std::net::SocketAddr;
use std::panic::AssertUnwindSafe;

use axum::{
    body::Body,
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use futures_util::FutureExt;
use headers::{Cookie, HeaderMapExt};
use http::{HeaderMap, HeaderValue, Method, StatusCode, header};
use subtle::ConstantTimeEq;
use url::form_urlencoded;

use pastebox::{SESSION_COOKIE_NAME, Session, SessionError, header_set_cookie};

use crate::error::WebError;
use crate::session::AuthenticatedUser;
use crate::state::AppState;

/// Where anonymous visitors are sent when they hit a protected route.
pub(crate) const LOGIN_PATH: &str = "/user/login";

/// Upper bound on a buffered form body during the CSRF check. Forms on this
/// site are small text fields; anything larger is a client fault.
const FORM_BODY_LIMIT: usize = 1 << 20;

/// Resolves the session cookie to a [`Session`] handle, runs the rest of the
/// chain with the handle in request extensions, then persists the session and
/// sets the cookie when the token is new or was rotated.
///
/// The inner chain runs under `catch_unwind` so a panicking handler still gets
/// its session mutations persisted before the panic is resumed for the
/// recovery layer above.
pub async fn session_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, WebError> {
    let session = match existing_session(&state, req.headers()).await {
        Some(session) => session,
        None => state.sessions.start()?,
    };
    req.extensions_mut().insert(session.clone());

    let outcome = AssertUnwindSafe(next.run(req)).catch_unwind().await;

    if let Err(err) = state.sessions.save(&session).await {
        match outcome {
            Ok(_) => return Err(err.into()),
            Err(panic) => {
                tracing::error!("failed to persist session while unwinding: {err}");
                std::panic::resume_unwind(panic);
            }
        }
    }

    let mut response = match outcome {
        Ok(response) => response,
        Err(panic) => std::panic::resume_unwind(panic),
    };

    if session.needs_cookie() {
        header_set_cookie(
            response.headers_mut(),
            SESSION_COOKIE_NAME.as_str(),
            &session.token(),
            state.sessions.cookie_max_age(),
        )
        .map_err(SessionError::from)?;
    }
    Ok(response)
}

async fn existing_session(state: &AppState, headers: &HeaderMap) -> Option<Session> {
    let cookies = headers.typed_get::<Cookie>()?;
    let token = cookies.get(SESSION_COOKIE_NAME.as_str())?;
    match state.sessions.load(token).await {
        Ok(found) => found,
        Err(err) => {
            // A broken cache read degrades to a fresh anonymous session.
            tracing::warn!("session lookup failed: {err}");
            None
        }
    }
}

/// Rejects state-changing requests that do not carry the session's CSRF
/// token, either in an `X-CSRF-Token` header or in a `csrf_token` form field.
///
/// The form path buffers the body, checks the field, then reassembles the
/// request so the handler's own form extraction still sees the full body.
/// Comparison is constant-time. Must run inside [`session_layer`].
pub async fn csrf_guard(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    if method == Method::GET
        || method == Method::HEAD
        || method == Method::OPTIONS
        || method == Method::TRACE
    {
        return next.run(req).await;
    }

    let Some(session) = req.extensions().get::<Session>().cloned() else {
        return missing_session_layer();
    };
    let expected = session.csrf_token();

    if let Some(submitted) = req
        .headers()
        .get("X-CSRF-Token")
        .and_then(|value| value.to_str().ok())
    {
        if tokens_match(submitted, &expected) {
            return next.run(req).await;
        }
        tracing::warn!(%method, uri = %req.uri(), "rejecting mismatched X-CSRF-Token header");
        return (StatusCode::FORBIDDEN, "Forbidden").into_response();
    }

    let (parts, body) = req.into_parts();
    let bytes = match axum::body::to_bytes(body, FORM_BODY_LIMIT).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::debug!("failed to buffer form body for CSRF check: {err}");
            return (StatusCode::BAD_REQUEST, "Bad Request").into_response();
        }
    };

    let submitted = form_value(&bytes, "csrf_token");
    let verified = submitted
        .as_deref()
        .is_some_and(|token| tokens_match(token, &expected));
    if !verified {
        tracing::warn!(%method, uri = %parts.uri, "rejecting request without a valid CSRF token");
        return (StatusCode::FORBIDDEN, "Forbidden").into_response();
    }

    let req = Request::from_parts(parts, Body::from(bytes));
    next.run(req).await
}

fn tokens_match(submitted: &str, expected: &str) -> bool {
    submitted.as_bytes().ct_eq(expected.as_bytes()).into()
}

fn form_value(body: &[u8], name: &str) -> Option<String> {
    form_urlencoded::parse(body)
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// Turns the session's stored user id into a typed [`AuthenticatedUser`]
/// request extension, re-checking that the account still exists. A session
/// referencing a deleted account is demoted to anonymous with the usual
/// token rotation.
///
/// Also mirrors the session's CSRF token as an `X-CSRF-Token` response
/// header so non-form clients can replay it. Must run inside
/// [`session_layer`].
pub async fn derive_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, WebError> {
    let Some(session) = req.extensions().get::<Session>().cloned() else {
        return Ok(missing_session_layer());
    };

    if let Some(user_id) = session.user_id() {
        if state.users.exists(user_id).await? {
            req.extensions_mut().insert(AuthenticatedUser { id: user_id });
        } else {
            tracing::warn!(user_id, "session referenced a deleted user");
            session.log_out()?;
        }
    }

    let csrf_token = session.csrf_token();
    let mut response = next.run(req).await;
    match HeaderValue::from_str(&csrf_token) {
        Ok(value) => {
            response.headers_mut().insert("X-CSRF-Token", value);
        }
        Err(_) => tracing::error!("failed to create CSRF header value from token"),
    }
    Ok(response)
}

/// Route-level gate for pages that require a signed-in user. Anonymous
/// requests are redirected to the login page; served pages are stamped
/// `Cache-Control: no-store` because they are user-specific.
pub async fn require_auth(req: Request, next: Next) -> Response {
    if req.extensions().get::<AuthenticatedUser>().is_none() {
        return Redirect::to(LOGIN_PATH).into_response();
    }
    let mut response = next.run(req).await;
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

/// Logs method, URI, protocol version and peer address for every request.
pub async fn log_request(req: Request, next: Next) -> Response {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string());
    tracing::info!(
        ip = peer.as_deref().unwrap_or("unknown"),
        proto = ?req.version(),
        method = %req.method(),
        uri = %req.uri(),
        "received request"
    );
    next.run(req).await
}

/// Sets the fixed security headers on every response.
pub async fn security_headers(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(
            "default-src 'self'; style-src 'self' fonts.googleapis.com; font-src fonts.gstatic.com",
        ),
    );
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("origin-when-cross-origin"),
    );
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("deny"));
    headers.insert(header::X_XSS_PROTECTION, HeaderValue::from_static("0"));
    headers.insert(header::SERVER, HeaderValue::from_static("pastebox"));
    response
}

/// Response builder for the panic-recovery layer. The keep-alive connection
/// is closed because its state is unknown after an unwind mid-response.
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else {
        "non-string panic payload".to_string()
    };
    tracing::error!("handler panicked: {detail}");

    let mut response =
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response();
    response
        .headers_mut()
        .insert(header::CONNECTION, HeaderValue::from_static("close"));
    response
}

fn missing_session_layer() -> Response {
    tracing::error!("session middleware did not run before this layer");
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}
