//! Error types for the MERMAID API client.
//!
//! # Design
//! Every failure surfaces as one `ApiError` variant; no operation returns a
//! partial result or an absent value. Local validation produces
//! `InvalidResource` / `InvalidProject` before any request is sent. Response
//! statuses map 1:1: 401 to `Unauthorized`, 404 to `InvalidResource`, every
//! other non-200 status to `TransportError` with the raw status and body.

use thiserror::Error;

/// Errors returned by `ApiClient` operations and the resolver.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The resource needs a token the client does not hold, or the service
    /// answered 401. Token refresh is left to the caller.
    #[error("unauthorized client: {0}")]
    Unauthorized(String),

    /// Unknown resource kind or filter, or the service answered 404.
    #[error("invalid resource: {0}")]
    InvalidResource(String),

    /// No project matched the given name, or no project reference was given.
    #[error("invalid project: {0}")]
    InvalidProject(String),

    /// The service returned a status other than 200, 401 or 404.
    #[error("HTTP {status}: {body}")]
    TransportError { status: u16, body: String },

    /// The transport could not complete the round trip.
    #[error("connection failed: {0}")]
    ConnectionError(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),
}

impl ApiError {
    pub(crate) fn unauthorized_default() -> Self {
        ApiError::Unauthorized("attempt token refresh".to_string())
    }
}
