//! Downstream relay: replaying a stored cookie jar on outbound requests.
//!
//! Each call builds a fresh `reqwest::Client` with the caller's stored jar
//! attached as the cookie provider, performs the request, and hands back
//! the raw downstream body. The downstream HTTP status is captured but not
//! acted on; the proxy treats the body as an opaque passthrough.

use std::collections::HashMap;

use bytes::Bytes;
use portico_session::SessionJar;
use reqwest::{Client, Response, header};
use tracing::debug;

use crate::error::{Result, SsoError};

/// Raw downstream response.
#[derive(Debug, Clone)]
pub struct RelayResponse {
    /// Downstream HTTP status code.
    pub status: u16,

    /// Downstream `Content-Type` header, if any.
    pub content_type: Option<String>,

    /// Raw downstream body, returned to the caller unmodified.
    pub body: Bytes,
}

/// GET `url` with the jar's cookies attached.
pub async fn get_with_jar(url: &str, jar: SessionJar) -> Result<RelayResponse> {
    let client = client_with_jar(jar)?;
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| SsoError::Network(format!("GET {} failed: {}", url, e)))?;
    read_response(url, response).await
}

/// POST the caller's JSON payload to `url` verbatim, cookies attached.
pub async fn post_json_with_jar(
    url: &str,
    payload: &serde_json::Value,
    jar: SessionJar,
) -> Result<RelayResponse> {
    let client = client_with_jar(jar)?;
    let response = client
        .post(url)
        .json(payload)
        .send()
        .await
        .map_err(|e| SsoError::Network(format!("POST {} failed: {}", url, e)))?;
    read_response(url, response).await
}

/// POST string-keyed fields to `url` URL-form-encoded, cookies attached.
pub async fn post_form_with_jar(
    url: &str,
    fields: &HashMap<String, String>,
    jar: SessionJar,
) -> Result<RelayResponse> {
    let client = client_with_jar(jar)?;
    let response = client
        .post(url)
        .form(fields)
        .send()
        .await
        .map_err(|e| SsoError::Network(format!("POST {} failed: {}", url, e)))?;
    read_response(url, response).await
}

fn client_with_jar(jar: SessionJar) -> Result<Client> {
    Ok(Client::builder().cookie_provider(jar).build()?)
}

async fn read_response(url: &str, response: Response) -> Result<RelayResponse> {
    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = response
        .bytes()
        .await
        .map_err(|e| SsoError::Network(format!("Reading {} failed: {}", url, e)))?;

    debug!(url = %url, status, len = body.len(), "Relay complete");
    Ok(RelayResponse {
        status,
        content_type,
        body,
    })
}
