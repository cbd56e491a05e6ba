use axum::response::{IntoResponse, Response};
use http::StatusCode;
use thiserror::Error;

use pastebox::{SessionError, SnippetError, StorageError, UserError};

/// Error type returned by handlers and middleware.
///
/// Domain errors convert in via `?`; the `IntoResponse` impl is the single
/// place that decides what the client sees. Anything that is not a client
/// fault is logged with full detail and answered with a generic 500 body.
#[derive(Debug, Error)]
pub enum WebError {
    #[error("not found")]
    NotFound,

    #[error("bad request")]
    BadRequest,

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    User(#[from] UserError),

    #[error(transparent)]
    Snippet(#[from] SnippetError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("template rendering failed: {0}")]
    Template(#[from] askama::Error),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            WebError::NotFound | WebError::Snippet(SnippetError::NotFound) => {
                (StatusCode::NOT_FOUND, "Not Found").into_response()
            }
            WebError::BadRequest => (StatusCode::BAD_REQUEST, "Bad Request").into_response(),
            err => {
                tracing::error!("internal server error: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}
