//! Per-user, per-site session storage for Portico.
//!
//! This crate owns the two mapping tables at the heart of the proxy:
//! - a registry from downstream origins (scheme + host) to stable [`SiteId`]s
//! - a table from `(user, site)` pairs to captured cookie jars
//!
//! Handlers never touch the maps directly; everything goes through
//! [`SessionStore`], which serializes access behind a single lock so a
//! racing first-time registration of the same origin allocates exactly one
//! `SiteId`.
//!
//! # Example
//!
//! ```rust,ignore
//! use portico_session::SessionStore;
//!
//! let store = SessionStore::new();
//! let site = store.get_or_create_site_id("https://portal.example.edu/grades").await?;
//! store.set_cookie_jar("2021123456", site, jar).await;
//! ```

mod error;
mod site;
mod store;

pub use error::{Result, SessionError};
pub use site::{SiteId, origin_key};
pub use store::{SessionJar, SessionStore};
