//! Bearer-token authentication middleware for the relay routes.
//!
//! Verifies the `Authorization: Bearer <token>` header against the shared
//! [`TokenSigner`](portico_sso::TokenSigner) and injects the recovered
//! [`Identity`] into request extensions. Every failure (missing header,
//! wrong scheme, bad signature, expiry) maps to 403: the relay routes
//! treat token absence and token invalidity alike as "forbidden".

use axum::{
    body::Body,
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::error::ServerError;
use crate::state::AppState;

/// Authenticated caller identity, recovered from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// The user identifier the token was issued for.
    pub user_id: String,
}

/// Authentication middleware.
///
/// Validates the bearer token and inserts the [`Identity`] into request
/// extensions for handlers to read.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ServerError> {
    let identity = authenticate(&request, &state)?;
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

fn authenticate(request: &Request<Body>, state: &AppState) -> Result<Identity, ServerError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| ServerError::Forbidden("Missing authorization token".to_string()))?;

    let value = header
        .to_str()
        .map_err(|_| ServerError::Forbidden("Invalid authorization header".to_string()))?;

    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| ServerError::Forbidden("Expected a bearer token".to_string()))?;

    let user_id = state.signer.verify(token).map_err(ServerError::from)?;
    Ok(Identity { user_id })
}
