//! Common test utilities: a mock campus (identity provider + protected
//! portal) and a running Portico server on ephemeral ports.

use std::collections::HashMap;
use std::net::SocketAddr;

use anyhow::Result;
use axum::Form;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use reqwest::Client;

use portico_server::{Server, ServerConfig};

/// Student identifier accepted by the mock identity provider.
pub const USERNAME: &str = "2021123456";

/// Password accepted by the mock identity provider.
pub const PASSWORD: &str = "hunter2";

/// Signing secret shared by the server under test and the tests.
pub const SECRET: &str = "integration-test-secret";

const CAMPUS_COOKIE: &str = "campus_session=granted";

const LOGIN_FORM_PAGE: &str =
    r#"<form action="/idp/login"><button id="login-submit">Sign in</button></form>"#;

fn authenticated(headers: &HeaderMap) -> bool {
    headers
        .get(COOKIE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|c| c.contains(CAMPUS_COOKIE))
}

async fn idp_login(Form(fields): Form<HashMap<String, String>>) -> Response {
    let granted = fields.get("username").map(String::as_str) == Some(USERNAME)
        && fields.get("password").map(String::as_str) == Some(PASSWORD);
    if granted {
        (
            [(SET_COOKIE, format!("{}; Path=/", CAMPUS_COOKIE))],
            "ok",
        )
            .into_response()
    } else {
        "denied".into_response()
    }
}

async fn portal(headers: HeaderMap) -> Html<String> {
    if authenticated(&headers) {
        Html("<h1>Welcome back</h1>".to_string())
    } else {
        Html(LOGIN_FORM_PAGE.to_string())
    }
}

async fn portal_data(headers: HeaderMap) -> impl IntoResponse {
    if authenticated(&headers) {
        (StatusCode::OK, "grade-report-2026")
    } else {
        (StatusCode::FORBIDDEN, "login required")
    }
}

async fn portal_echo(headers: HeaderMap, body: String) -> Response {
    if authenticated(&headers) {
        ([(CONTENT_TYPE, "application/json")], body).into_response()
    } else {
        (StatusCode::FORBIDDEN, "login required").into_response()
    }
}

async fn portal_submit(
    headers: HeaderMap,
    Form(fields): Form<HashMap<String, String>>,
) -> Response {
    if !authenticated(&headers) {
        return (StatusCode::FORBIDDEN, "login required").into_response();
    }
    format!(
        "term={};course={}",
        fields.get("term").cloned().unwrap_or_default(),
        fields.get("course").cloned().unwrap_or_default()
    )
    .into_response()
}

async fn portal_missing() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "no such page")
}

/// Mock campus: identity provider plus cookie-protected portal pages.
pub struct MockCampus {
    /// Bound address of the campus server.
    pub addr: SocketAddr,
}

impl MockCampus {
    /// Start the mock campus on an ephemeral port.
    pub async fn start() -> Result<Self> {
        let app = axum::Router::new()
            .route("/idp/login", post(idp_login))
            .route("/portal", get(portal))
            .route("/portal/data", get(portal_data))
            .route("/portal/echo", post(portal_echo))
            .route("/portal/submit", post(portal_submit))
            .route("/portal/missing", get(portal_missing));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });
        Ok(Self { addr })
    }

    /// The identity provider's credential-post endpoint.
    pub fn login_url(&self) -> String {
        format!("http://{}/idp/login", self.addr)
    }

    /// The SSO-protected portal page.
    pub fn portal_url(&self) -> String {
        format!("http://{}/portal", self.addr)
    }

    /// A cookie-protected data page.
    pub fn data_url(&self) -> String {
        format!("http://{}/portal/data", self.addr)
    }

    /// A cookie-protected JSON echo endpoint.
    pub fn echo_url(&self) -> String {
        format!("http://{}/portal/echo", self.addr)
    }

    /// A cookie-protected form endpoint.
    pub fn submit_url(&self) -> String {
        format!("http://{}/portal/submit", self.addr)
    }

    /// An unprotected page that always returns 404.
    pub fn missing_url(&self) -> String {
        format!("http://{}/portal/missing", self.addr)
    }
}

/// A Portico server running in the background.
pub struct TestServer {
    /// Bound address of the server.
    pub addr: SocketAddr,
    /// HTTP client for driving the server.
    pub client: Client,
}

impl TestServer {
    /// Start a server wired to the given campus's identity provider.
    pub async fn start(campus: &MockCampus) -> Result<Self> {
        Self::start_with_idp(campus.login_url()).await
    }

    /// Start a server with an explicit identity provider login URL.
    pub async fn start_with_idp(idp_login_url: String) -> Result<Self> {
        let config = ServerConfig::new(SECRET, idp_login_url)
            .with_bind_address("127.0.0.1:0".parse()?);
        let addr = Server::new(config)
            .run_with_shutdown(std::future::pending())
            .await?;
        Ok(Self {
            addr,
            client: Client::new(),
        })
    }

    /// Full URL for a server path.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// POST /login with the standard test credentials for a target URL.
    pub async fn login(&self, from_url: &str) -> Result<reqwest::Response> {
        let body = serde_json::json!({
            "from_url": from_url,
            "username": USERNAME,
            "password": PASSWORD,
        });
        Ok(self
            .client
            .post(self.url("/login"))
            .json(&body)
            .send()
            .await?)
    }

    /// Login and return the issued token, asserting success.
    pub async fn login_token(&self, from_url: &str) -> Result<String> {
        let response = self.login(from_url).await?;
        anyhow::ensure!(
            response.status().is_success(),
            "login failed with {}",
            response.status()
        );
        Ok(response.text().await?)
    }
}
