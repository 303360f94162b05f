//! Retailer API version definitions.
//!
//! This module provides the [`ApiVersion`] enum for specifying which version
//! of the Retailer API to talk to. The version selects the vendor media type
//! sent in `Accept` and `Content-Type` headers when a request does not
//! override them.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Retailer API version.
///
/// # Example
///
/// ```rust
/// use bol_retailer::ApiVersion;
///
/// let version: ApiVersion = "v10".parse().unwrap();
/// assert_eq!(version, ApiVersion::V10);
/// assert_eq!(version.media_type(), "application/vnd.retailer.v10+json");
/// assert_eq!(format!("{}", ApiVersion::V9), "v9");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    /// API version 7
    V7,
    /// API version 8
    V8,
    /// API version 9
    V9,
    /// API version 10
    V10,
    /// Any other version number, e.g. a version released after this crate.
    Custom(u32),
}

impl ApiVersion {
    /// Returns the latest version this crate was written against.
    #[must_use]
    pub const fn latest() -> Self {
        Self::V10
    }

    /// Returns the oldest version that is still served.
    #[must_use]
    pub const fn minimum_supported() -> Self {
        Self::V9
    }

    /// Returns all known supported versions, oldest first.
    #[must_use]
    pub fn supported_versions() -> Vec<Self> {
        vec![Self::V9, Self::V10]
    }

    /// Returns the numeric version.
    #[must_use]
    pub const fn number(&self) -> u32 {
        match self {
            Self::V7 => 7,
            Self::V8 => 8,
            Self::V9 => 9,
            Self::V10 => 10,
            Self::Custom(n) => *n,
        }
    }

    /// Returns `true` if this version is not older than [`minimum_supported()`](Self::minimum_supported).
    #[must_use]
    pub fn is_supported(&self) -> bool {
        *self >= Self::minimum_supported()
    }

    /// Returns the vendor media type for JSON payloads of this version.
    #[must_use]
    pub fn media_type(&self) -> String {
        format!("application/vnd.retailer.v{}+json", self.number())
    }

    const fn from_number(n: u32) -> Self {
        match n {
            7 => Self::V7,
            8 => Self::V8,
            9 => Self::V9,
            10 => Self::V10,
            other => Self::Custom(other),
        }
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self::latest()
    }
}

impl PartialOrd for ApiVersion {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ApiVersion {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.number().cmp(&other.number())
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.number())
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().to_lowercase();
        let digits = trimmed.strip_prefix('v').unwrap_or(&trimmed);

        match digits.parse::<u32>() {
            Ok(n) if n > 0 && digits.chars().all(|c| c.is_ascii_digit()) => {
                Ok(Self::from_number(n))
            }
            _ => Err(ConfigError::InvalidApiVersion { version: trimmed }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_version_parses_known_versions() {
        assert_eq!("v10".parse::<ApiVersion>().unwrap(), ApiVersion::V10);
        assert_eq!("10".parse::<ApiVersion>().unwrap(), ApiVersion::V10);
        assert_eq!("V9".parse::<ApiVersion>().unwrap(), ApiVersion::V9);
        assert_eq!("v11".parse::<ApiVersion>().unwrap(), ApiVersion::Custom(11));
    }

    #[test]
    fn test_api_version_rejects_invalid() {
        assert!("".parse::<ApiVersion>().is_err());
        assert!("v".parse::<ApiVersion>().is_err());
        assert!("v0".parse::<ApiVersion>().is_err());
        assert!("v10.1".parse::<ApiVersion>().is_err());
        assert!("ten".parse::<ApiVersion>().is_err());
        assert!("+10".parse::<ApiVersion>().is_err());
    }

    #[test]
    fn test_media_type_embeds_version_number() {
        assert_eq!(
            ApiVersion::V10.media_type(),
            "application/vnd.retailer.v10+json"
        );
        assert_eq!(
            ApiVersion::V8.media_type(),
            "application/vnd.retailer.v8+json"
        );
        assert_eq!(
            ApiVersion::Custom(12).media_type(),
            "application/vnd.retailer.v12+json"
        );
    }

    #[test]
    fn test_latest_is_supported() {
        assert_eq!(ApiVersion::default(), ApiVersion::latest());
        assert!(ApiVersion::latest().is_supported());
        assert!(ApiVersion::supported_versions().contains(&ApiVersion::latest()));
    }

    #[test]
    fn test_version_ordering_and_support_window() {
        assert!(ApiVersion::V7 < ApiVersion::V8);
        assert!(ApiVersion::V9 < ApiVersion::V10);
        assert!(ApiVersion::V10 < ApiVersion::Custom(11));

        assert!(!ApiVersion::V8.is_supported());
        assert!(ApiVersion::V9.is_supported());
        assert!(ApiVersion::Custom(11).is_supported());
    }
}
