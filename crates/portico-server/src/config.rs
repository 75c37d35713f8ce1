//! Server configuration.
//!
//! The process environment is read exactly once, at startup, by
//! [`ServerConfig::from_env`]; the resulting config is passed explicitly
//! into the token signer and login simulator. Nothing re-reads the
//! environment per request.

use std::net::SocketAddr;
use std::time::Duration;

use portico_sso::IdpConfig;
use portico_sso::login::DEFAULT_FAILURE_MARKER;

use crate::error::{Result, ServerError};

/// Environment variable holding the token signing secret (required).
pub const ENV_TOKEN_SECRET: &str = "PORTICO_TOKEN_SECRET";

/// Environment variable holding the identity provider login URL (required).
pub const ENV_IDP_LOGIN_URL: &str = "PORTICO_IDP_LOGIN_URL";

/// Environment variable overriding the bind address.
pub const ENV_BIND_ADDR: &str = "PORTICO_BIND_ADDR";

/// Environment variable overriding the login-failure marker.
pub const ENV_IDP_FAILURE_MARKER: &str = "PORTICO_IDP_FAILURE_MARKER";

/// Environment variable overriding the token lifetime, in seconds.
pub const ENV_TOKEN_TTL_SECS: &str = "PORTICO_TOKEN_TTL_SECS";

/// Default bind address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the server to.
    pub bind_address: SocketAddr,

    /// Secret used to sign and verify session tokens.
    pub token_secret: String,

    /// Session token lifetime.
    pub token_ttl: Duration,

    /// The identity provider's credential-post endpoint.
    pub idp_login_url: String,

    /// Body marker that signals a rejected login (the form is still there).
    pub idp_failure_marker: String,

    /// Extra form fields posted alongside the credentials.
    pub idp_extra_fields: Vec<(String, String)>,

    /// Enable a permissive CORS layer.
    pub enable_cors: bool,
}

impl ServerConfig {
    /// Create a config with the given signing secret and identity provider
    /// login URL; everything else takes defaults.
    pub fn new(token_secret: impl Into<String>, idp_login_url: impl Into<String>) -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDR.parse().unwrap(),
            token_secret: token_secret.into(),
            token_ttl: portico_sso::DEFAULT_TOKEN_TTL,
            idp_login_url: idp_login_url.into(),
            idp_failure_marker: DEFAULT_FAILURE_MARKER.to_string(),
            idp_extra_fields: Vec::new(),
            enable_cors: false,
        }
    }

    /// Load configuration from the process environment.
    ///
    /// `PORTICO_TOKEN_SECRET` and `PORTICO_IDP_LOGIN_URL` are required;
    /// the rest are optional overrides.
    pub fn from_env() -> Result<Self> {
        let secret = require_env(ENV_TOKEN_SECRET)?;
        let idp_login_url = require_env(ENV_IDP_LOGIN_URL)?;
        let mut config = Self::new(secret, idp_login_url);

        if let Ok(addr) = std::env::var(ENV_BIND_ADDR) {
            config.bind_address = addr.parse().map_err(|_| {
                ServerError::Config(format!("{} is not a socket address: '{}'", ENV_BIND_ADDR, addr))
            })?;
        }
        if let Ok(marker) = std::env::var(ENV_IDP_FAILURE_MARKER) {
            config.idp_failure_marker = marker;
        }
        if let Ok(secs) = std::env::var(ENV_TOKEN_TTL_SECS) {
            let secs: u64 = secs.parse().map_err(|_| {
                ServerError::Config(format!("{} is not a number: '{}'", ENV_TOKEN_TTL_SECS, secs))
            })?;
            config.token_ttl = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Set the bind address.
    pub fn with_bind_address(mut self, addr: SocketAddr) -> Self {
        self.bind_address = addr;
        self
    }

    /// Set the token lifetime.
    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Set the login-failure marker.
    pub fn with_idp_failure_marker(mut self, marker: impl Into<String>) -> Self {
        self.idp_failure_marker = marker.into();
        self
    }

    /// Add an extra form field to the credential post.
    pub fn with_idp_extra_field(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.idp_extra_fields.push((name.into(), value.into()));
        self
    }

    /// Enable or disable the CORS layer.
    pub fn with_cors(mut self, enabled: bool) -> Self {
        self.enable_cors = enabled;
        self
    }

    /// Build the identity provider config for the login simulator.
    pub fn idp(&self) -> IdpConfig {
        let mut idp = IdpConfig::new(&self.idp_login_url)
            .with_failure_marker(&self.idp_failure_marker);
        for (name, value) in &self.idp_extra_fields {
            idp = idp.with_extra_field(name, value);
        }
        idp
    }
}

fn require_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ServerError::Config(format!("{} is not set", name))),
    }
}
