//! The session store: origin registry and cookie jar table.

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::cookie::Jar;
use tokio::sync::RwLock;
use tracing::{debug, trace};

use crate::error::{Result, SessionError};
use crate::site::{SiteId, origin_key};

/// A captured cookie jar, shared between the store and outbound clients.
///
/// The jar is the one accumulated by the login client; on relay it is
/// attached to a fresh `reqwest::Client` via `cookie_provider`.
pub type SessionJar = Arc<Jar>;

/// Inner state protected by the lock.
#[derive(Default)]
struct StoreInner {
    /// Next SiteId to allocate.
    next_site: u64,

    /// Origin key (`scheme://host`) to allocated site id.
    sites: HashMap<String, SiteId>,

    /// `(user, site)` to captured cookie jar.
    jars: HashMap<(String, SiteId), SessionJar>,
}

/// Thread-safe store mapping origins to [`SiteId`]s and `(user, site)`
/// pairs to cookie jars.
///
/// A single `RwLock` guards both maps: site allocation and jar writes take
/// the write lock, lookups take the read lock. Keeping registration under
/// one write-lock upsert guarantees at most one `SiteId` per origin even
/// when two logins race on a brand-new site.
#[derive(Default)]
pub struct SessionStore {
    inner: RwLock<StoreInner>,
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the `SiteId` for a URL's origin.
    ///
    /// Fails with [`SessionError::UnknownSite`] if no login has ever
    /// registered this origin.
    pub async fn site_id_for_url(&self, url: &str) -> Result<SiteId> {
        let key = origin_key(url)?;
        let inner = self.inner.read().await;
        inner
            .sites
            .get(&key)
            .copied()
            .ok_or_else(|| SessionError::UnknownSite(key))
    }

    /// Look up the `SiteId` for a URL's origin, allocating one on first
    /// sight.
    ///
    /// Idempotent: repeated calls with any URL on the same origin return
    /// the same id.
    pub async fn get_or_create_site_id(&self, url: &str) -> Result<SiteId> {
        let key = origin_key(url)?;
        let mut inner = self.inner.write().await;
        if let Some(id) = inner.sites.get(&key) {
            trace!(origin = %key, site = %id, "Origin already registered");
            return Ok(*id);
        }
        let id = SiteId(inner.next_site);
        inner.next_site += 1;
        inner.sites.insert(key.clone(), id);
        debug!(origin = %key, site = %id, "Registered new site");
        Ok(id)
    }

    /// Store the cookie jar for a `(user, site)` pair, replacing any
    /// previous jar wholesale.
    pub async fn set_cookie_jar(&self, user_id: &str, site: SiteId, jar: SessionJar) {
        let mut inner = self.inner.write().await;
        inner.jars.insert((user_id.to_string(), site), jar);
        debug!(user = %user_id, site = %site, "Stored cookie jar");
    }

    /// Fetch the cookie jar for a `(user, site)` pair.
    ///
    /// Fails with [`SessionError::NoSession`] if no prior login exists for
    /// the pair.
    pub async fn get_cookie_jar(&self, user_id: &str, site: SiteId) -> Result<SessionJar> {
        let inner = self.inner.read().await;
        inner
            .jars
            .get(&(user_id.to_string(), site))
            .cloned()
            .ok_or_else(|| SessionError::NoSession {
                user: user_id.to_string(),
                site,
            })
    }

    /// Number of registered origins.
    pub async fn site_count(&self) -> usize {
        self.inner.read().await.sites.len()
    }

    /// Number of stored cookie jars.
    pub async fn jar_count(&self) -> usize {
        self.inner.read().await.jars.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_site_id_stable_across_urls_on_same_origin() {
        let store = SessionStore::new();
        let a = store
            .get_or_create_site_id("https://portal.example.edu/grades")
            .await
            .unwrap();
        let b = store
            .get_or_create_site_id("https://portal.example.edu/courses?id=1")
            .await
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(store.site_count().await, 1);
    }

    #[tokio::test]
    async fn test_site_id_differs_across_hosts() {
        let store = SessionStore::new();
        let a = store
            .get_or_create_site_id("https://portal.example.edu/")
            .await
            .unwrap();
        let b = store
            .get_or_create_site_id("https://library.example.edu/")
            .await
            .unwrap();
        assert_ne!(a, b);
        assert_eq!(store.site_count().await, 2);
    }

    #[tokio::test]
    async fn test_lookup_without_registration_fails() {
        let store = SessionStore::new();
        let err = store
            .site_id_for_url("https://never-seen.example.edu/")
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::UnknownSite(_)));
    }

    #[tokio::test]
    async fn test_lookup_after_registration_matches() {
        let store = SessionStore::new();
        let created = store
            .get_or_create_site_id("https://portal.example.edu/login")
            .await
            .unwrap();
        let looked_up = store
            .site_id_for_url("https://portal.example.edu/anything/else")
            .await
            .unwrap();
        assert_eq!(created, looked_up);
    }

    #[tokio::test]
    async fn test_invalid_url_rejected() {
        let store = SessionStore::new();
        assert!(store.get_or_create_site_id("not a url").await.is_err());
        assert!(store.site_id_for_url("mailto:x@y").await.is_err());
    }

    #[tokio::test]
    async fn test_jar_roundtrip_returns_same_jar() {
        let store = SessionStore::new();
        let site = store
            .get_or_create_site_id("https://portal.example.edu/")
            .await
            .unwrap();

        let jar: SessionJar = Arc::new(Jar::default());
        store.set_cookie_jar("2021123456", site, jar.clone()).await;

        let fetched = store.get_cookie_jar("2021123456", site).await.unwrap();
        assert!(Arc::ptr_eq(&jar, &fetched));
    }

    #[tokio::test]
    async fn test_jar_replaced_wholesale() {
        let store = SessionStore::new();
        let site = store
            .get_or_create_site_id("https://portal.example.edu/")
            .await
            .unwrap();

        let first: SessionJar = Arc::new(Jar::default());
        let second: SessionJar = Arc::new(Jar::default());
        store.set_cookie_jar("u1", site, first.clone()).await;
        store.set_cookie_jar("u1", site, second.clone()).await;

        let fetched = store.get_cookie_jar("u1", site).await.unwrap();
        assert!(Arc::ptr_eq(&second, &fetched));
        assert!(!Arc::ptr_eq(&first, &fetched));
        assert_eq!(store.jar_count().await, 1);
    }

    #[tokio::test]
    async fn test_jar_missing_pair_fails() {
        let store = SessionStore::new();
        let site = store
            .get_or_create_site_id("https://portal.example.edu/")
            .await
            .unwrap();
        store
            .set_cookie_jar("u1", site, Arc::new(Jar::default()))
            .await;

        // Same site, different user.
        let err = store.get_cookie_jar("u2", site).await.unwrap_err();
        assert!(matches!(err, SessionError::NoSession { .. }));
    }

    #[tokio::test]
    async fn test_concurrent_first_registration_allocates_one_id() {
        let store = Arc::new(SessionStore::new());

        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .get_or_create_site_id("https://portal.example.edu/race")
                    .await
                    .unwrap()
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }

        ids.dedup();
        assert_eq!(ids.len(), 1);
        assert_eq!(store.site_count().await, 1);
    }
}
