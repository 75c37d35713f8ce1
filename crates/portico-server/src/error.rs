//! Error types for the server.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use portico_session::SessionError;
use portico_sso::SsoError;

/// Server error type.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Malformed client input.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The identity provider rejected the credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Missing/invalid/expired token, or no session for the requested site.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The identity provider or a downstream site was unreachable.
    #[error("Bad gateway: {0}")]
    BadGateway(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<SsoError> for ServerError {
    fn from(e: SsoError) -> Self {
        match e {
            SsoError::Network(msg) => ServerError::BadGateway(msg),
            SsoError::TokenMalformed | SsoError::TokenSignature | SsoError::TokenExpired => {
                ServerError::Forbidden(e.to_string())
            }
            SsoError::Serialization(msg) => ServerError::Internal(msg),
        }
    }
}

impl From<SessionError> for ServerError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::InvalidUrl(_) => ServerError::BadRequest(e.to_string()),
            SessionError::UnknownSite(_) | SessionError::NoSession { .. } => {
                ServerError::Forbidden(e.to_string())
            }
        }
    }
}

/// Result type for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ServerError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ServerError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            ServerError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
            ServerError::BadGateway(_) => (StatusCode::BAD_GATEWAY, "bad_gateway"),
            ServerError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
            ServerError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
        };

        let message = self.to_string();

        match &self {
            ServerError::Internal(_) | ServerError::Config(_) => {
                tracing::error!(status = %status, code, error = %message, "Server error");
            }
            _ => {
                tracing::warn!(status = %status, code, error = %message, "Client error");
            }
        }

        let body = ErrorResponse {
            code: code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}
