//! Site identity: stable ids for downstream origins.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, SessionError};

/// Stable identifier for a distinct downstream origin (scheme + host).
///
/// Allocated by the [`SessionStore`](crate::SessionStore) registry on first
/// sight of an origin and never reused. Every URL with the same scheme and
/// host resolves to the same `SiteId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SiteId(pub(crate) u64);

impl SiteId {
    /// The raw numeric value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SiteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "site-{}", self.0)
    }
}

/// Derive the registry key for a URL: `scheme://host`, lowercased.
///
/// Path, query, fragment, credentials, and port are all ignored, so any two
/// URLs on the same host and scheme share a key.
pub fn origin_key(raw: &str) -> Result<String> {
    let url = Url::parse(raw).map_err(|_| SessionError::InvalidUrl(raw.to_string()))?;
    let host = url
        .host_str()
        .ok_or_else(|| SessionError::InvalidUrl(raw.to_string()))?;
    Ok(format!("{}://{}", url.scheme(), host.to_ascii_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_key_ignores_path_and_query() {
        let a = origin_key("https://portal.example.edu/grades?term=fall").unwrap();
        let b = origin_key("https://portal.example.edu/").unwrap();
        let c = origin_key("https://portal.example.edu/courses/123#top").unwrap();
        assert_eq!(a, "https://portal.example.edu");
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn test_origin_key_distinguishes_hosts_and_schemes() {
        let https = origin_key("https://portal.example.edu/").unwrap();
        let http = origin_key("http://portal.example.edu/").unwrap();
        let other = origin_key("https://library.example.edu/").unwrap();
        assert_ne!(https, http);
        assert_ne!(https, other);
    }

    #[test]
    fn test_origin_key_lowercases_host() {
        let upper = origin_key("https://Portal.Example.EDU/x").unwrap();
        let lower = origin_key("https://portal.example.edu/y").unwrap();
        assert_eq!(upper, lower);
    }

    #[test]
    fn test_origin_key_rejects_garbage() {
        assert!(origin_key("not a url").is_err());
        assert!(origin_key("").is_err());
        // Parseable, but no host component.
        assert!(origin_key("mailto:user@example.edu").is_err());
    }

    #[test]
    fn test_site_id_display() {
        assert_eq!(SiteId(7).to_string(), "site-7");
    }
}
