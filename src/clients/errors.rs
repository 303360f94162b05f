//! Error types raised while talking to the Retailer API.
//!
//! Every failed call yields exactly one [`Error`]:
//!
//! - [`ConnectError`]: the request never produced a response
//! - [`UnauthorizedError`]: HTTP 401, or no usable access token
//! - [`RateLimitError`]: HTTP 429, with the `Retry-After` delay when supplied
//! - [`ServerError`]: HTTP 500, 502, 503, 504 or 507
//! - [`ResponseError`]: any other non-2xx status except 404
//! - [`ResponseDecodingError`]: the body or status code cannot be decoded as declared
//! - [`MalformedTokenError`]: the token endpoint answered with an unusable payload
//! - [`InvalidRequestError`]: the request could not be built locally
//!
//! # Example
//!
//! ```rust,ignore
//! use bol_retailer::Error;
//!
//! match client.request(request, &response_types).await {
//!     Ok(value) => println!("{value:?}"),
//!     Err(Error::RateLimit(e)) => {
//!         println!("Slow down, retry after {:?} seconds", e.retry_after);
//!     }
//!     Err(Error::Unauthorized(e)) if e.access_token_expired() => {
//!         println!("Please re-authenticate");
//!     }
//!     Err(e) => println!("Request failed: {e}"),
//! }
//! ```

use serde::Deserialize;
use thiserror::Error;


/// Result type for Retailer API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error returned when the HTTP request fails before a response is received.
#[derive(Debug, Error)]
#[error("Connection error: {source}")]
pub struct ConnectError {
    /// The underlying transport error.
    #[source]
    pub source: reqwest::Error,
}

/// Error returned for HTTP 401 responses or when no valid token is available.
///
/// # Example
///
/// ```rust
/// use bol_retailer::clients::UnauthorizedError;
///
/// let error = UnauthorizedError::new(401, "JWT expired at 2024-01-01T00:00:00Z");
/// assert!(error.access_token_expired());
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct UnauthorizedError {
    /// The HTTP status code; `None` when raised before any request was sent.
    pub status: Option<u16>,
    /// Human-readable message.
    pub message: String,
}

/// Marker the API puts in 401 messages when the bearer token has expired.
const EXPIRED_TOKEN_MARKER: &str = "jwt expired";

impl UnauthorizedError {
    /// Creates an error for an HTTP response with the given status.
    #[must_use]
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Creates an error raised locally, without an HTTP response.
    #[must_use]
    pub fn local(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    /// Returns `true` if the server rejected the token because it has expired.
    #[must_use]
    pub fn access_token_expired(&self) -> bool {
        self.message.to_lowercase().contains(EXPIRED_TOKEN_MARKER)
    }

    /// Returns the HTTP status code, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        self.status
    }
}

/// Error returned for HTTP 429 responses.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RateLimitError {
    /// The HTTP status code (always 429).
    pub status: u16,
    /// Human-readable message.
    pub message: String,
    /// Seconds to wait before retrying, from the `Retry-After` header.
    pub retry_after: Option<u64>,
}

impl RateLimitError {
    /// Returns the HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }
}

/// Error returned for HTTP 500, 502, 503, 504 and 507 responses.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ServerError {
    /// The HTTP status code.
    pub status: u16,
    /// Human-readable message.
    pub message: String,
}

impl ServerError {
    /// Returns the HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }
}

/// A problem description as returned in API error bodies.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Problem {
    /// Problem type URI.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Short summary.
    pub title: Option<String>,
    /// HTTP status code as reported in the body.
    pub status: Option<u16>,
    /// Detailed explanation.
    pub detail: Option<String>,
}

/// Detail phrases mapped to machine-readable keys.
const DETAIL_KEYS: &[(&str, &str)] = &[("account is not active", ResponseError::ACCOUNT_INACTIVE)];

/// Error returned for any other non-2xx response except 404.
///
/// # Example
///
/// ```rust
/// use bol_retailer::clients::ResponseError;
///
/// let error = ResponseError::new(403, "Account is not active, access denied.");
/// assert_eq!(error.detail_key(), Some(ResponseError::ACCOUNT_INACTIVE));
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ResponseError {
    /// The HTTP status code.
    pub status: u16,
    /// Human-readable message.
    pub message: String,
    /// The decoded problem body, if the server supplied one.
    pub problem: Option<Problem>,
}

impl ResponseError {
    /// Key returned by [`detail_key`](Self::detail_key) for inactive accounts.
    pub const ACCOUNT_INACTIVE: &'static str = "account_inactive";

    /// Creates an error without a problem body.
    #[must_use]
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            problem: None,
        }
    }

    /// Returns the HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Maps known detail messages to a machine-readable key.
    #[must_use]
    pub fn detail_key(&self) -> Option<&'static str> {
        let message = self.message.to_lowercase();
        DETAIL_KEYS
            .iter()
            .find(|(needle, _)| message.contains(needle))
            .map(|(_, key)| *key)
    }
}

/// Error returned when a response cannot be decoded as declared.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ResponseDecodingError {
    /// Description of the decoding failure.
    pub message: String,
    /// The beginning of the offending body, if any.
    pub body_excerpt: Option<String>,
}

/// Maximum number of characters kept in [`ResponseDecodingError::body_excerpt`].
const BODY_EXCERPT_LEN: usize = 256;

impl ResponseDecodingError {
    /// Creates an error without a body excerpt.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            body_excerpt: None,
        }
    }

    /// Creates an error that keeps the start of the offending body.
    #[must_use]
    pub fn with_body(message: impl Into<String>, body: &str) -> Self {
        Self {
            message: message.into(),
            body_excerpt: Some(body.chars().take(BODY_EXCERPT_LEN).collect()),
        }
    }
}

/// Error returned when the token endpoint answers with an unusable payload.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MalformedTokenError {
    /// The payload is not a JSON object.
    #[error("Token response is not a JSON object")]
    NotAnObject,

    /// `access_token` is missing or empty.
    #[error("Missing access_token")]
    MissingAccessToken,

    /// `expires_in` is missing.
    #[error("Missing expires_in")]
    MissingExpiresIn,

    /// `expires_in` is not a non-negative integer.
    #[error("Invalid expires_in '{value}', expected a non-negative number of seconds")]
    InvalidExpiresIn {
        /// The value as received.
        value: String,
    },

    /// `token_type` is not `Bearer`.
    #[error("Unexpected token_type '{token_type}', expected 'Bearer'")]
    UnexpectedTokenType {
        /// The token type as received.
        token_type: String,
    },

    /// The granted scope differs from the expected scope.
    #[error("Unexpected scope '{scope}', expected '{expected}'")]
    UnexpectedScope {
        /// The scope as received.
        scope: String,
        /// The scope that was expected.
        expected: String,
    },

    /// A refresh token was expected but not supplied.
    #[error("Missing refresh_token")]
    MissingRefreshToken,
}

/// Error returned when a request cannot be built.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidRequestError {
    /// A header name or value contains invalid characters.
    #[error("Invalid header '{name}'")]
    InvalidHeader {
        /// The offending header name.
        name: String,
    },

    /// The request path resolves to an invalid URL.
    #[error("Invalid request URL '{url}'")]
    InvalidUrl {
        /// The resolved URL.
        url: String,
    },
}

/// Unified error type for all Retailer API operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport failure before a response was received.
    #[error(transparent)]
    Connect(#[from] ConnectError),

    /// HTTP 401, or no valid token.
    #[error(transparent)]
    Unauthorized(#[from] UnauthorizedError),

    /// HTTP 429.
    #[error(transparent)]
    RateLimit(#[from] RateLimitError),

    /// HTTP 5xx.
    #[error(transparent)]
    Server(#[from] ServerError),

    /// Other non-2xx response.
    #[error(transparent)]
    Response(#[from] ResponseError),

    /// The response could not be decoded as declared.
    #[error(transparent)]
    ResponseDecoding(#[from] ResponseDecodingError),

    /// The token endpoint returned an unusable payload.
    #[error(transparent)]
    MalformedToken(#[from] MalformedTokenError),

    /// The request could not be built.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidRequestError),
}

impl Error {
    /// Returns the HTTP status code for errors derived from a response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized(e) => e.status,
            Self::RateLimit(e) => Some(e.status),
            Self::Server(e) => Some(e.status),
            Self::Response(e) => Some(e.status),
            _ => None,
        }
    }
}

// Verify error types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Error>();
    assert_send_sync::<MalformedTokenError>();
};
