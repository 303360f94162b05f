//! Configuration types for the Retailer API client.
//!
//! This module provides the configuration used to construct a
//! [`Client`](crate::Client).
//!
//! # Overview
//!
//! - [`ClientConfig`]: The configuration struct holding all client settings
//! - [`ClientConfigBuilder`]: A builder for constructing [`ClientConfig`] instances
//! - [`ClientId`]: A validated client ID newtype
//! - [`ClientSecret`]: A validated client secret newtype with masked debug output
//! - [`BaseUrl`]: A validated absolute URL for the resource and token endpoints
//! - [`ApiVersion`]: The Retailer API version to use
//!
//! # Example
//!
//! ```rust
//! use bol_retailer::{ApiVersion, ClientConfig, ClientId, ClientSecret};
//!
//! let config = ClientConfig::builder()
//!     .client_id(ClientId::new("my-client-id").unwrap())
//!     .client_secret(ClientSecret::new("my-secret").unwrap())
//!     .api_version(ApiVersion::V10)
//!     .demo_mode(true)
//!     .build()
//!     .unwrap();
//!
//! assert!(config.demo_mode());
//! ```

mod newtypes;
mod version;

pub use newtypes::{BaseUrl, ClientId, ClientSecret};
pub use version::ApiVersion;

use crate::error::ConfigError;

/// Default resource endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.bol.com/";

/// Default token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://login.bol.com/token";

/// Configuration for the Retailer API client.
///
/// # Thread Safety
///
/// `ClientConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    client_id: ClientId,
    client_secret: ClientSecret,
    api_version: ApiVersion,
    endpoint: BaseUrl,
    token_url: BaseUrl,
    demo_mode: bool,
    user_agent_prefix: Option<String>,
}

impl ClientConfig {
    /// Creates a new builder for constructing a `ClientConfig`.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Returns the client ID.
    #[must_use]
    pub const fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    /// Returns the client secret.
    #[must_use]
    pub const fn client_secret(&self) -> &ClientSecret {
        &self.client_secret
    }

    /// Returns the API version.
    #[must_use]
    pub const fn api_version(&self) -> ApiVersion {
        self.api_version
    }

    /// Returns the resource endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &BaseUrl {
        &self.endpoint
    }

    /// Returns the token endpoint.
    #[must_use]
    pub const fn token_url(&self) -> &BaseUrl {
        &self.token_url
    }

    /// Returns whether requests are routed to the demo endpoints.
    #[must_use]
    pub const fn demo_mode(&self) -> bool {
        self.demo_mode
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    pub(crate) fn set_demo_mode(&mut self, enabled: bool) {
        self.demo_mode = enabled;
    }
}

// Verify ClientConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientConfig>();
};

/// Builder for constructing [`ClientConfig`] instances.
///
/// Required fields are `client_id` and `client_secret`.
///
/// # Defaults
///
/// - `api_version`: [`ApiVersion::latest()`]
/// - `endpoint`: [`DEFAULT_ENDPOINT`]
/// - `token_url`: [`DEFAULT_TOKEN_URL`]
/// - `demo_mode`: `false`
/// - `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    client_id: Option<ClientId>,
    client_secret: Option<ClientSecret>,
    api_version: Option<ApiVersion>,
    endpoint: Option<BaseUrl>,
    token_url: Option<BaseUrl>,
    demo_mode: Option<bool>,
    user_agent_prefix: Option<String>,
}

impl ClientConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the client ID (required).
    #[must_use]
    pub fn client_id(mut self, id: ClientId) -> Self {
        self.client_id = Some(id);
        self
    }

    /// Sets the client secret (required).
    #[must_use]
    pub fn client_secret(mut self, secret: ClientSecret) -> Self {
        self.client_secret = Some(secret);
        self
    }

    /// Sets the API version.
    #[must_use]
    pub const fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Overrides the resource endpoint.
    #[must_use]
    pub fn endpoint(mut self, endpoint: BaseUrl) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Overrides the token endpoint.
    #[must_use]
    pub fn token_url(mut self, token_url: BaseUrl) -> Self {
        self.token_url = Some(token_url);
        self
    }

    /// Routes requests to the demo variant of each endpoint.
    #[must_use]
    pub const fn demo_mode(mut self, enabled: bool) -> Self {
        self.demo_mode = Some(enabled);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`ClientConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `client_id` or
    /// `client_secret` are not set.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let client_id = self
            .client_id
            .ok_or(ConfigError::MissingRequiredField { field: "client_id" })?;
        let client_secret = self
            .client_secret
            .ok_or(ConfigError::MissingRequiredField {
                field: "client_secret",
            })?;

        let endpoint = match self.endpoint {
            Some(endpoint) => endpoint,
            None => BaseUrl::new(DEFAULT_ENDPOINT)?,
        };
        let token_url = match self.token_url {
            Some(token_url) => token_url,
            None => BaseUrl::new(DEFAULT_TOKEN_URL)?,
        };

        let api_version = self.api_version.unwrap_or_default();
        if !api_version.is_supported() {
            tracing::warn!(
                version = %api_version,
                supported = ?ApiVersion::supported_versions(),
                "Configured Retailer API version is no longer supported"
            );
        }

        Ok(ClientConfig {
            client_id,
            client_secret,
            api_version,
            endpoint,
            token_url,
            demo_mode: self.demo_mode.unwrap_or(false),
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}
