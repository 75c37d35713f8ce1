//! Relay endpoints: replay a stored cookie jar against a downstream URL.
//!
//! All three handlers share a skeleton: decode the JSON body, resolve the
//! caller's jar for the target URL's site, perform the outbound request,
//! and echo the raw downstream body back with the downstream content type.
//! The downstream HTTP status is deliberately not propagated; relay
//! responses are 200 with an opaque body.

use std::collections::HashMap;

use axum::Extension;
use axum::body::Body;
use axum::extract::State;
use axum::http::{StatusCode, header::CONTENT_TYPE};
use axum::response::Response;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use portico_session::SessionJar;
use portico_sso::relay::{self, RelayResponse};

use crate::auth::Identity;
use crate::error::{Result, ServerError};
use crate::state::AppState;

/// Body for the GET relay.
#[derive(Debug, Deserialize)]
pub struct RelayGetRequest {
    /// Downstream URL to fetch.
    pub url: String,
}

/// Body for the JSON POST relay.
#[derive(Debug, Deserialize)]
pub struct RelayPostJsonRequest {
    /// Downstream URL to post to.
    pub url: String,
    /// Arbitrary JSON payload, forwarded verbatim.
    pub content: serde_json::Value,
}

/// Body for the form POST relay.
#[derive(Debug, Deserialize)]
pub struct RelayPostFormRequest {
    /// Downstream URL to post to.
    pub url: String,
    /// String-keyed fields, forwarded URL-form-encoded.
    pub content: HashMap<String, String>,
}

/// Handle `POST /get`: relay a GET with the caller's stored cookies.
pub async fn relay_get_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    body: String,
) -> Result<Response> {
    let input: RelayGetRequest = parse_body(&body)?;
    let jar = jar_for(&state, &identity.user_id, &input.url).await?;
    let relayed = relay::get_with_jar(&input.url, jar).await?;
    passthrough(relayed)
}

/// Handle `POST /post/json`: relay a JSON POST with the caller's cookies.
pub async fn relay_post_json_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    body: String,
) -> Result<Response> {
    let input: RelayPostJsonRequest = parse_body(&body)?;
    let jar = jar_for(&state, &identity.user_id, &input.url).await?;
    let relayed = relay::post_json_with_jar(&input.url, &input.content, jar).await?;
    passthrough(relayed)
}

/// Handle `POST /post/form`: relay a form POST with the caller's cookies.
pub async fn relay_post_form_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    body: String,
) -> Result<Response> {
    let input: RelayPostFormRequest = parse_body(&body)?;
    let jar = jar_for(&state, &identity.user_id, &input.url).await?;
    let relayed = relay::post_form_with_jar(&input.url, &input.content, jar).await?;
    passthrough(relayed)
}

fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| ServerError::BadRequest(format!("Invalid JSON: {}", e)))
}

/// Resolve the caller's stored jar for a target URL.
///
/// An unregistered origin or a missing (user, site) jar both surface as
/// forbidden: the caller has no session for that site.
async fn jar_for(state: &AppState, user_id: &str, url: &str) -> Result<SessionJar> {
    let site = state.store.site_id_for_url(url).await?;
    let jar = state.store.get_cookie_jar(user_id, site).await?;
    debug!(user = %user_id, site = %site, url = %url, "Resolved session jar");
    Ok(jar)
}

/// Build the caller-facing response from a downstream response.
fn passthrough(relayed: RelayResponse) -> Result<Response> {
    let mut builder = Response::builder().status(StatusCode::OK);
    if let Some(content_type) = &relayed.content_type {
        builder = builder.header(CONTENT_TYPE, content_type);
    }
    builder
        .body(Body::from(relayed.body))
        .map_err(|e| ServerError::Internal(format!("Failed to build response: {}", e)))
}
