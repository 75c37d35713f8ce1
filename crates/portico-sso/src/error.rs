//! Error types for login, token, and relay operations.

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, SsoError>;

/// Errors that can occur during login simulation, token handling, or relay.
#[derive(Debug, thiserror::Error)]
pub enum SsoError {
    /// Network/HTTP error reaching the identity provider or a downstream
    /// site. Fatal for the request; never retried.
    #[error("Network error: {0}")]
    Network(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Token is not in the expected `payload.signature` shape or the
    /// payload does not decode.
    #[error("Malformed token")]
    TokenMalformed,

    /// Token signature does not verify against the configured secret.
    #[error("Invalid token signature")]
    TokenSignature,

    /// Token expiry is in the past.
    #[error("Token expired")]
    TokenExpired,
}

impl From<reqwest::Error> for SsoError {
    fn from(e: reqwest::Error) -> Self {
        SsoError::Network(e.to_string())
    }
}
