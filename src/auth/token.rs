//! Access token values.
//!
//! An [`AccessToken`] pairs a bearer credential with the absolute instant
//! (seconds since the Unix epoch) at which it stops being valid. Tokens are
//! immutable; the [`Client`](crate::Client) replaces its token wholesale when
//! it re-authenticates.
//!
//! # Example
//!
//! ```rust
//! use bol_retailer::AccessToken;
//!
//! let token = AccessToken::from_expires_in("abc", 300);
//! assert!(!token.is_expired());
//!
//! let json = token.to_json_string();
//! let restored = AccessToken::from_json_str(Some(&json)).unwrap();
//! assert_eq!(restored, token);
//! ```

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A bearer credential with an absolute expiry.
///
/// # Thread Safety
///
/// `AccessToken` is `Send + Sync`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    token: String,
    #[serde(rename = "expiresAt")]
    expires_at: i64,
}

// Verify AccessToken is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AccessToken>();
};

impl AccessToken {
    /// Creates a token that expires at `expires_at` (seconds since the epoch).
    #[must_use]
    pub fn new(token: impl Into<String>, expires_at: i64) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    /// Creates a token that expires `expires_in` seconds from now.
    #[must_use]
    pub fn from_expires_in(token: impl Into<String>, expires_in: i64) -> Self {
        Self::new(token, Utc::now().timestamp().saturating_add(expires_in))
    }

    /// Creates a token from an encoded JWT, taking the expiry from its `exp` claim.
    ///
    /// The claim set is decoded without verifying the signature. A token whose
    /// claim set cannot be decoded, or that carries no numeric `exp` claim,
    /// gets an expiry of `0` and therefore always reports itself as expired.
    #[must_use]
    pub fn from_jwt(encoded: impl Into<String>) -> Self {
        let token = encoded.into();
        let expires_at = decode_claims(&token)
            .and_then(|claims| claims.get("exp").and_then(claim_as_seconds))
            .unwrap_or(0);

        Self { token, expires_at }
    }

    /// Returns the claim set of a JWT token, or `None` if it cannot be decoded.
    #[must_use]
    pub fn claims(&self) -> Option<Map<String, Value>> {
        decode_claims(&self.token)
    }

    /// Returns the raw credential.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the expiry in seconds since the epoch.
    #[must_use]
    pub const fn expires_at(&self) -> i64 {
        self.expires_at
    }

    /// Returns the expiry as a UTC timestamp, if representable.
    #[must_use]
    pub fn expires_at_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.expires_at, 0)
    }

    /// Returns `true` once the current time has reached the expiry.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.expires_at
    }

    /// Serializes the token as `{"token": ..., "expiresAt": ...}` for storage.
    #[must_use]
    pub fn to_json_string(&self) -> String {
        serde_json::json!({
            "token": self.token,
            "expiresAt": self.expires_at,
        })
        .to_string()
    }

    /// Restores a token stored with [`to_json_string`](Self::to_json_string).
    ///
    /// Returns `None` for absent, malformed or incomplete input.
    #[must_use]
    pub fn from_json_str(json: Option<&str>) -> Option<Self> {
        serde_json::from_str(json?).ok()
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"*****")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

fn decode_claims(token: &str) -> Option<Map<String, Value>> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;

    match serde_json::from_slice(&bytes).ok()? {
        Value::Object(claims) => Some(claims),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn claim_as_seconds(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|secs| secs as i64))
}
