//! The login endpoint: simulate the SSO flow and mint a session token.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tracing::info;

use portico_session::origin_key;
use portico_sso::simulate_login;

use crate::error::{Result, ServerError};
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Target URL whose SSO-protected site the caller wants a session for.
    pub from_url: String,
    /// Institution user identifier.
    pub username: String,
    /// Plaintext password, used transiently and never stored.
    pub password: String,
}

/// Handle `POST /login`.
///
/// Runs the scripted login flow; on success registers the target origin,
/// stores the captured jar for this (user, site) pair, and returns a signed
/// session token as the plain-text response body.
///
/// Statuses: 400 malformed body or unusable URL, 401 credentials rejected,
/// 502 identity provider or target site unreachable.
pub async fn login_handler(State(state): State<AppState>, body: String) -> Result<Response> {
    let input: LoginRequest = serde_json::from_str(&body)
        .map_err(|e| ServerError::BadRequest(format!("Invalid JSON: {}", e)))?;

    // Reject unusable target URLs before going out on the network.
    origin_key(&input.from_url)?;

    let jar = simulate_login(&state.idp, &input.from_url, &input.username, &input.password)
        .await?;
    let Some(jar) = jar else {
        return Err(ServerError::Unauthorized(
            "Identity provider rejected the credentials".to_string(),
        ));
    };

    let site = state.store.get_or_create_site_id(&input.from_url).await?;
    state.store.set_cookie_jar(&input.username, site, jar).await;

    let token = state.signer.issue(&input.username)?;
    info!(user = %input.username, site = %site, "Login complete, token issued");

    Ok(token.into_response())
}
