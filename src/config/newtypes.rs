//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A validated client ID of a set of Retailer API credentials.
///
/// # Example
///
/// ```rust
/// use bol_retailer::ClientId;
///
/// let id = ClientId::new("my-client-id").unwrap();
/// assert_eq!(id.as_ref(), "my-client-id");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientId(String);

impl ClientId {
    /// Creates a new validated client ID.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyClientId`] if the ID is empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ConfigError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ConfigError::EmptyClientId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for ClientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated client secret.
///
/// The `Debug` implementation masks the secret value, displaying only
/// `ClientSecret(*****)` instead of the actual secret.
///
/// # Example
///
/// ```rust
/// use bol_retailer::ClientSecret;
///
/// let secret = ClientSecret::new("my-secret").unwrap();
/// assert_eq!(format!("{:?}", secret), "ClientSecret(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ClientSecret(String);

impl ClientSecret {
    /// Creates a new validated client secret.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyClientSecret`] if the secret is empty.
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(ConfigError::EmptyClientSecret);
        }
        Ok(Self(secret))
    }
}

impl AsRef<str> for ClientSecret {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClientSecret(*****)")
    }
}

/// A validated absolute `http`/`https` URL.
///
/// Used for both the resource endpoint and the token endpoint.
///
/// # Example
///
/// ```rust
/// use bol_retailer::BaseUrl;
///
/// let url = BaseUrl::new("https://api.bol.com/").unwrap();
/// assert_eq!(url.as_ref(), "https://api.bol.com/");
/// assert_eq!(url.join("retailer/orders"), "https://api.bol.com/retailer/orders");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl {
    url: String,
}

impl BaseUrl {
    /// Creates a new validated URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the URL has no `http` or
    /// `https` scheme or no host.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into().trim().to_string();

        let scheme_end = url
            .find("://")
            .ok_or_else(|| ConfigError::InvalidBaseUrl { url: url.clone() })?;

        let scheme = url[..scheme_end].to_ascii_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(ConfigError::InvalidBaseUrl { url });
        }

        let host_start = scheme_end + 3;
        let remainder = &url[host_start..];
        let host_end = remainder
            .find([':', '/', '?', '#'])
            .map_or(url.len(), |i| host_start + i);

        if host_end == host_start {
            return Err(ConfigError::InvalidBaseUrl { url });
        }

        Ok(Self { url })
    }

    /// Appends a relative path, inserting exactly one `/` between the two.
    #[must_use]
    pub fn join(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

impl Serialize for BaseUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.url)
    }
}

impl<'de> Deserialize<'de> for BaseUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}
