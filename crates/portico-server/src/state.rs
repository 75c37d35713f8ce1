//! Application state shared across handlers.

use std::sync::Arc;

use portico_session::SessionStore;
use portico_sso::{IdpConfig, TokenSigner};

use crate::config::ServerConfig;

/// Application state shared across all handlers.
///
/// Constructed once at startup and cloned into each handler; the session
/// store is the only shared mutable piece.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,

    /// Session store: site registry and cookie jar table.
    pub store: Arc<SessionStore>,

    /// Token issuer/verifier, holding the signing secret.
    pub signer: Arc<TokenSigner>,

    /// Identity provider settings for the login simulator.
    pub idp: Arc<IdpConfig>,
}

impl AppState {
    /// Create application state from a config.
    pub fn new(config: ServerConfig) -> Self {
        let signer = TokenSigner::new(&config.token_secret, config.token_ttl);
        let idp = config.idp();
        Self {
            config: Arc::new(config),
            store: Arc::new(SessionStore::new()),
            signer: Arc::new(signer),
            idp: Arc::new(idp),
        }
    }
}
