//! Configuration error types for the Retailer API client.
//!
//! This module contains the error type used when building a
//! [`ClientConfig`](crate::ClientConfig) or one of its validated newtypes.
//! Errors raised while talking to the API live in
//! [`clients`](crate::clients) instead.
//!
//! # Example
//!
//! ```rust
//! use bol_retailer::{ClientId, ConfigError};
//!
//! let result = ClientId::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyClientId)));
//! ```

use thiserror::Error;

/// Errors that can occur while configuring the client.
///
/// Each variant provides a clear, actionable error message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Client ID cannot be empty.
    #[error("Client ID cannot be empty. Please provide the client ID of your API credentials.")]
    EmptyClientId,

    /// Client secret cannot be empty.
    #[error("Client secret cannot be empty. Please provide the client secret of your API credentials.")]
    EmptyClientSecret,

    /// A configured URL is invalid.
    #[error("Invalid URL '{url}'. Please provide an absolute http(s) URL (e.g., 'https://api.bol.com/').")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// API version is invalid.
    #[error("Invalid API version '{version}'. Expected format: 'v10' or '10'.")]
    InvalidApiVersion {
        /// The invalid version string that was provided.
        version: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}
