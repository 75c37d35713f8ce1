//! Browser-less login against the identity provider.
//!
//! The flow mirrors what a browser does: hit the target site to get
//! redirected into the SSO flow, post the credential form to the identity
//! provider, then revisit the target site. Success is decided by sniffing
//! the final body: if the login form is still being served, the credentials
//! were rejected.

use std::sync::Arc;

use portico_session::SessionJar;
use reqwest::Client;
use reqwest::cookie::Jar;
use tracing::{debug, info};

use crate::error::{Result, SsoError};

/// Marker that indicates the login form is still present in a response
/// body, i.e. authentication did not go through.
pub const DEFAULT_FAILURE_MARKER: &str = "id=\"login-submit\"";

/// Form field name for the user identifier.
const USERNAME_FIELD: &str = "username";

/// Form field name for the password.
const PASSWORD_FIELD: &str = "password";

/// Identity provider configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct IdpConfig {
    /// The identity provider's credential-post endpoint.
    pub login_url: String,

    /// Substring of the final response body that signals a still-present
    /// login form (credentials rejected).
    pub failure_marker: String,

    /// Extra form fields posted alongside the credentials, e.g. a submit
    /// button name some providers require.
    pub extra_fields: Vec<(String, String)>,
}

impl IdpConfig {
    /// Create a config for the given login endpoint with the default
    /// failure marker and no extra fields.
    pub fn new(login_url: impl Into<String>) -> Self {
        Self {
            login_url: login_url.into(),
            failure_marker: DEFAULT_FAILURE_MARKER.to_string(),
            extra_fields: Vec::new(),
        }
    }

    /// Override the failure marker.
    pub fn with_failure_marker(mut self, marker: impl Into<String>) -> Self {
        self.failure_marker = marker.into();
        self
    }

    /// Add an extra form field to the credential post.
    pub fn with_extra_field(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.extra_fields.push((name.into(), value.into()));
        self
    }
}

/// Simulate a browser login and capture the session cookies.
///
/// Performs three calls with one cookie-carrying client: GET `from_url`
/// (triggers redirection into the SSO flow), POST the credentials to the
/// identity provider, GET `from_url` again. Returns:
///
/// - `Ok(Some(jar))` — authenticated; the jar holds the accumulated
///   session cookies for `from_url`'s site.
/// - `Ok(None)` — the identity provider rejected the credentials (the
///   final body still contains the login form). A normal negative result,
///   not an error.
/// - `Err(SsoError::Network)` — some step was unreachable. Fatal for this
///   request; never retried.
pub async fn simulate_login(
    idp: &IdpConfig,
    from_url: &str,
    username: &str,
    password: &str,
) -> Result<Option<SessionJar>> {
    let jar: SessionJar = Arc::new(Jar::default());
    let client = Client::builder().cookie_provider(jar.clone()).build()?;

    debug!(url = %from_url, "Priming SSO redirect");
    client
        .get(from_url)
        .send()
        .await
        .map_err(|e| SsoError::Network(format!("Cannot reach {}: {}", from_url, e)))?;

    let mut form: Vec<(&str, &str)> = vec![(USERNAME_FIELD, username), (PASSWORD_FIELD, password)];
    for (name, value) in &idp.extra_fields {
        form.push((name.as_str(), value.as_str()));
    }

    let response = client
        .post(&idp.login_url)
        .form(&form)
        .send()
        .await
        .map_err(|e| SsoError::Network(format!("Cannot reach identity provider: {}", e)))?;
    debug!(status = %response.status(), "Credential post complete");

    let response = client
        .get(from_url)
        .send()
        .await
        .map_err(|e| SsoError::Network(format!("Cannot revisit {}: {}", from_url, e)))?;
    let body = response
        .text()
        .await
        .map_err(|e| SsoError::Network(format!("Cannot read {}: {}", from_url, e)))?;

    if body.contains(&idp.failure_marker) {
        info!(user = %username, "Credentials rejected by identity provider");
        return Ok(None);
    }

    info!(user = %username, "Login succeeded, session cookies captured");
    Ok(Some(jar))
}
