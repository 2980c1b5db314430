//! Error taxonomy of the HTTP layer and its mapping onto status codes.
//!
//! Every variant renders as an envelope with `success: false` and a
//! human-readable `error`. Store failures carry an operation-specific generic
//! message; the underlying cause is only attached (as `message`) when the
//! server runs in development mode, and is never a backtrace.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::envelope::Envelope;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or unacceptable input.
    #[error("{0}")]
    Validation(String),

    /// The path id is not a well-formed identifier.
    #[error("Invalid todo ID")]
    InvalidId,

    #[error("Todo not found")]
    NotFound,

    #[error("Route not found")]
    RouteNotFound,

    /// The store failed. `detail` is populated in development mode only.
    #[error("{context}")]
    Server {
        context: &'static str,
        detail: Option<String>,
    },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidId => StatusCode::BAD_REQUEST,
            ApiError::NotFound | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::Server { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            ApiError::Server { detail, .. } => detail.clone(),
            _ => None,
        };
        (status, Json(Envelope::failure(self.to_string(), detail))).into_response()
    }
}
