//! Error types for the webhook surface
//!
//! Every failure ends the current request: the status code carries the
//! error class and the body carries the error text as plain text.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors returned by webhook handlers
#[derive(Error, Debug)]
pub enum WebhookError {
    /// The route exists but not for this method
    #[error("method not allowed")]
    MethodNotAllowed,

    /// Request body is not valid JSON for the expected type
    #[error("{0}")]
    Decode(String),

    /// The hosts file could not be read or written
    #[error("{0}")]
    Store(String),

    /// Anything else that is the provider's fault
    #[error("{0}")]
    Internal(String),
}

impl WebhookError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Decode(_) => StatusCode::BAD_REQUEST,
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<hostsdns_core::Error> for WebhookError {
    fn from(err: hostsdns_core::Error) -> Self {
        let message = err.to_string();
        match err {
            hostsdns_core::Error::Decode(_) => Self::Decode(message),
            hostsdns_core::Error::Store(_) => Self::Store(message),
            hostsdns_core::Error::Config(_) => Self::Internal(message),
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            Self::MethodNotAllowed => tracing::debug!("Rejected request: {}", self),
            Self::Decode(msg) => tracing::warn!("Rejected malformed payload: {}", msg),
            Self::Store(msg) | Self::Internal(msg) => {
                tracing::error!("Request failed: {}", msg)
            }
        }
        (status, self.to_string()).into_response()
    }
}
