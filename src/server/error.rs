//! Request-boundary error type mapping the two failure kinds to HTTP.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

/// The two error kinds the endpoint distinguishes.
///
/// `InvalidRequest` is client-caused and answers 400 with a specific,
/// actionable message. Everything else becomes `Internal`: 500 with a
/// deliberately opaque body, full detail logged server-side only.
#[derive(Debug)]
pub enum ApiError {
    InvalidRequest(String),
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::InvalidRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": message })),
            )
                .into_response(),
            Self::Internal(err) => {
                error!("Error during analysis: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}

// Lets `?` lift any library error into the opaque 500 path.
impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Internal(err.into())
    }
}
