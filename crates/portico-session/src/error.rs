//! Error types for session storage operations.

/// Error type for session storage operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The URL could not be parsed or has no host component.
    #[error("Invalid URL '{0}'")]
    InvalidUrl(String),

    /// The URL's origin has never been registered.
    #[error("Unknown site for '{0}'")]
    UnknownSite(String),

    /// No cookie jar has been stored for this (user, site) pair.
    #[error("No session for user '{user}' at site {site}")]
    NoSession {
        /// The user identifier that was looked up.
        user: String,
        /// The site identifier that was looked up.
        site: crate::SiteId,
    },
}

/// Result type for session storage operations.
pub type Result<T> = std::result::Result<T, SessionError>;
