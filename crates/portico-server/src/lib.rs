//! HTTP API for the Portico session-forwarding proxy.
//!
//! Exposes four endpoints over JSON bodies:
//!
//! - `POST /login` — run the scripted SSO flow, store the captured jar,
//!   return a signed session token (plain text).
//! - `POST /get`, `POST /post/json`, `POST /post/form` — bearer-token
//!   authenticated relays that replay the caller's stored cookies against
//!   a downstream URL and echo the raw body back.
//! - `GET /health` — unauthenticated liveness probe.
//!
//! # Example
//!
//! ```ignore
//! use portico_server::{Server, ServerConfig};
//!
//! let config = ServerConfig::from_env()?;
//! Server::new(config).run().await?;
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use auth::{Identity, auth_middleware};
pub use config::ServerConfig;
pub use error::{ErrorResponse, Result, ServerError};
pub use state::AppState;

use std::net::SocketAddr;

use axum::{Router, middleware, routing::post};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// The Portico HTTP server.
pub struct Server {
    /// Application state.
    state: AppState,
}

impl Server {
    /// Create a new server from a configuration.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }

    /// Create a server from a pre-built application state.
    pub fn from_state(state: AppState) -> Self {
        Self { state }
    }

    /// Build the router with all routes and middleware.
    pub fn router(&self) -> Router {
        // Relay routes sit behind the bearer-token middleware; login and
        // health do not.
        let relay = Router::new()
            .route("/get", post(routes::relay_get_handler))
            .route("/post/json", post(routes::relay_post_json_handler))
            .route("/post/form", post(routes::relay_post_form_handler))
            .layer(middleware::from_fn_with_state(
                self.state.clone(),
                auth::auth_middleware,
            ));

        let mut router = Router::new()
            .merge(routes::health_routes())
            .route("/login", post(routes::login_handler))
            .merge(relay)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone());

        if self.state.config.enable_cors {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }

        router
    }

    /// Run the server on the configured bind address.
    pub async fn run(self) -> Result<()> {
        let addr = self.state.config.bind_address;
        let router = self.router();

        info!(addr = %addr, "Starting Portico server");

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Internal(format!("Failed to bind {}: {}", addr, e)))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| ServerError::Internal(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Run with graceful shutdown, returning the bound address.
    ///
    /// The server is spawned onto the runtime; useful for tests that need
    /// the ephemeral port.
    pub async fn run_with_shutdown(
        self,
        shutdown: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> std::io::Result<SocketAddr> {
        let listener = TcpListener::bind(self.state.config.bind_address).await?;
        let local_addr = listener.local_addr()?;
        let router = self.router();

        info!(addr = %local_addr, "Starting Portico server");
        tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown)
                .await
                .ok();
        });

        Ok(local_addr)
    }

    /// Get the configured bind address.
    pub fn bind_address(&self) -> SocketAddr {
        self.state.config.bind_address
    }
}
