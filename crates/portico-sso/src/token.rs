//! Signed session tokens.
//!
//! Tokens are `base64url(claims JSON).base64url(HMAC-SHA256 signature)`,
//! signed with the process-wide secret. They bind a user identifier and an
//! expiry and are verified statelessly; nothing is stored server-side.

use std::time::Duration;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::error::{Result, SsoError};

type HmacSha256 = Hmac<Sha256>;

/// Default token lifetime (24 hours).
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Claims embedded in a session token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User identifier the token was issued for.
    sub: String,
    /// Issued-at, Unix seconds.
    iat: i64,
    /// Expiry, Unix seconds.
    exp: i64,
}

/// Issues and verifies signed session tokens.
///
/// Construct one at startup from the configured secret and hand it to the
/// HTTP layer; the secret is never re-read from the environment.
#[derive(Clone)]
pub struct TokenSigner {
    secret: Vec<u8>,
    ttl_secs: i64,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never expose the secret, even in debug output.
        f.debug_struct("TokenSigner")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

impl TokenSigner {
    /// Create a signer with the given secret and token lifetime.
    pub fn new(secret: impl AsRef<[u8]>, ttl: Duration) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
            ttl_secs: ttl.as_secs() as i64,
        }
    }

    /// Create a signer with the default 24 hour lifetime.
    pub fn with_default_ttl(secret: impl AsRef<[u8]>) -> Self {
        Self::new(secret, DEFAULT_TOKEN_TTL)
    }

    /// Issue a token for a user identifier.
    pub fn issue(&self, user_id: &str) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now,
            exp: now + self.ttl_secs,
        };
        let json = serde_json::to_vec(&claims)
            .map_err(|e| SsoError::Serialization(format!("Failed to encode claims: {}", e)))?;
        let payload = URL_SAFE_NO_PAD.encode(json);
        let signature = self.sign(payload.as_bytes())?;
        Ok(format!("{}.{}", payload, signature))
    }

    /// Verify a token and return the user identifier it was issued for.
    ///
    /// The signature is checked (in constant time) before the payload is
    /// decoded, so tampered or foreign tokens never reach the JSON parser.
    pub fn verify(&self, token: &str) -> Result<String> {
        let (payload, signature) = token.split_once('.').ok_or(SsoError::TokenMalformed)?;
        let sig_bytes = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| SsoError::TokenMalformed)?;

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&sig_bytes)
            .map_err(|_| SsoError::TokenSignature)?;

        let json = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| SsoError::TokenMalformed)?;
        let claims: Claims =
            serde_json::from_slice(&json).map_err(|_| SsoError::TokenMalformed)?;

        if claims.exp < Utc::now().timestamp() {
            return Err(SsoError::TokenExpired);
        }

        Ok(claims.sub)
    }

    /// Sign raw payload bytes, returning the base64url signature.
    pub(crate) fn sign(&self, payload: &[u8]) -> Result<String> {
        let mut mac = self.mac()?;
        mac.update(payload);
        Ok(URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes()))
    }

    fn mac(&self) -> Result<HmacSha256> {
        HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| SsoError::Serialization(format!("HMAC init failed: {}", e)))
    }
}
