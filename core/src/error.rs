//! Error types for the todo API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers distinguish "the todo
//! is gone" from other failures. Every other non-success status lands in
//! `HttpError` carrying the server's `error` string, or an operation-specific
//! fallback when the body has none, so it can be shown to the user as is.

use crate::http::TransportError;

/// Errors returned by `TodoClient` parse methods.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The server returned 404 for the requested todo.
    #[error("Todo not found")]
    NotFound,

    /// The server returned an unexpected status.
    #[error("{message}")]
    HttpError { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

/// Why a controller action failed. Local state is untouched when this is
/// returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Reading or writing persisted client state failed.
#[derive(Debug, thiserror::Error)]
pub enum FilterStoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed state: {0}")]
    Malformed(#[from] serde_json::Error),
}
