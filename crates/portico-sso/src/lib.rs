//! SSO login simulation, session tokens, and the downstream relay client.
//!
//! Three pieces live here, covering the proxy's outward-facing logic:
//!
//! - [`login`]: drives the browser-less login flow against the identity
//!   provider and captures the resulting cookie jar.
//! - [`token`]: issues and verifies the signed session tokens handed back
//!   to callers after a successful login.
//! - [`relay`]: replays a stored cookie jar on outbound GET / POST-JSON /
//!   POST-form requests and returns the raw downstream body.
//!
//! Nothing in this crate persists state; the session store owns the jars.

mod error;
pub mod login;
pub mod relay;
pub mod token;

pub use error::{Result, SsoError};
pub use login::{IdpConfig, simulate_login};
pub use relay::{RelayResponse, get_with_jar, post_form_with_jar, post_json_with_jar};
pub use token::{DEFAULT_TOKEN_TTL, TokenSigner};
