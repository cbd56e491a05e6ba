use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};
use tower_http::catch_panic::CatchPanicLayer;

use crate::middleware::{
    csrf_guard, derive_auth, handle_panic, log_request, require_auth, security_headers,
    session_layer,
};
use crate::pages;
use crate::state::AppState;

/// Health probe. Deliberately outside the session chain.
async fn ping() -> &'static str {
    "OK"
}

/// Assemble the site router. Outermost to innermost: panic recovery,
/// request logging, security headers, then for the dynamic pages the
/// session layer, CSRF guard and auth derivation, with the auth gate on
/// protected routes only.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route(
            "/snippet/create",
            get(pages::create_form).post(pages::create_post),
        )
        .route("/user/logout", post(pages::logout_post))
        .route_layer(from_fn(require_auth));

    let dynamic = Router::new()
        .route("/", get(pages::home))
        .route("/snippet/view/{id}", get(pages::view))
        .route(
            "/user/signup",
            get(pages::signup_form).post(pages::signup_post),
        )
        .route(
            "/user/login",
            get(pages::login_form).post(pages::login_post),
        )
        .merge(protected)
        .layer(from_fn_with_state(state.clone(), derive_auth))
        .layer(from_fn(csrf_guard))
        .layer(from_fn_with_state(state.clone(), session_layer));

    Router::new()
        .merge(dynamic)
        .route("/ping", get(ping))
        .layer(from_fn(security_headers))
        .layer(from_fn(log_request))
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}
