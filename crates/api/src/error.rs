//! HTTP error mapping
//!
//! Validation problems carry their message; authorization and not-found
//! failures are deliberately generic so callers cannot tell which
//! condition failed; storage failures are logged and opaque.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// API result type
pub type Result<T> = std::result::Result<T, Error>;

/// API errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Authentication failed")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Not found")]
    NotFound,

    #[error("Conflict")]
    Conflict,

    #[error("Internal error")]
    Internal,
}

impl From<innkeep_core::Error> for Error {
    fn from(err: innkeep_core::Error) -> Self {
        use innkeep_core::Error as Core;
        match err {
            Core::Validation(msg) | Core::InvalidOperation(msg) => Error::BadRequest(msg),
            Core::Authentication(_) => Error::Unauthorized,
            Core::PermissionDenied(_) => Error::Forbidden,
            Core::NotFound(_) => Error::NotFound,
            Core::Conflict(_) => Error::Conflict,
            Core::Database(_) | Core::Io(_) | Core::Serialization(_) => {
                tracing::error!(error = %err, "Storage failure");
                Error::Internal
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Error::Unauthorized => (StatusCode::UNAUTHORIZED, "authentication failed".into()),
            Error::Forbidden => (StatusCode::FORBIDDEN, "forbidden".into()),
            Error::NotFound => (StatusCode::NOT_FOUND, "not found".into()),
            Error::Conflict => (StatusCode::CONFLICT, "conflict, retry".into()),
            Error::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "internal error".into()),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
