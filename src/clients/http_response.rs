//! Raw HTTP responses.
//!
//! [`HttpResponse`] captures what came back over the wire before any
//! classification or decoding takes place.

use std::collections::HashMap;

use serde_json::Value;

use crate::clients::errors::ResponseDecodingError;

/// A raw response from the Retailer API or the token endpoint.
///
/// Header names are stored lowercased; lookups are case-insensitive.
///
/// # Example
///
/// ```rust
/// use bol_retailer::clients::HttpResponse;
/// use std::collections::HashMap;
///
/// let mut headers = HashMap::new();
/// headers.insert("retry-after".to_string(), vec!["4".to_string()]);
///
/// let response = HttpResponse::new(429, headers, String::new());
/// assert_eq!(response.header("Retry-After"), Some("4"));
/// assert_eq!(response.retry_after(), Some(4));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, keyed by lowercased name.
    pub headers: HashMap<String, Vec<String>>,
    /// The raw body text.
    pub body: String,
}

impl HttpResponse {
    /// Creates a new response.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: String) -> Self {
        let headers = headers
            .into_iter()
            .map(|(name, values)| (name.to_lowercase(), values))
            .collect();

        Self {
            code,
            headers,
            body,
        }
    }

    /// Returns the first value of a header.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the `Retry-After` delay in whole seconds.
    ///
    /// Only the leading digits are read, so `"4.5"` yields 4. Returns `None`
    /// when the header is missing or does not start with a number.
    #[must_use]
    pub fn retry_after(&self) -> Option<u64> {
        let value = self.header("retry-after")?.trim_start();
        let digits = value
            .find(|c: char| !c.is_ascii_digit())
            .map_or(value, |end| &value[..end]);
        digits.parse().ok()
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ResponseDecodingError`] if the body is empty or not valid JSON.
    pub fn json(&self) -> Result<Value, ResponseDecodingError> {
        if self.body.trim().is_empty() {
            return Err(ResponseDecodingError::new("No body received"));
        }

        serde_json::from_str(&self.body)
            .map_err(|_| ResponseDecodingError::with_body("Body contains invalid JSON", &self.body))
    }

    /// Returns the canonical reason phrase for the status code.
    #[must_use]
    pub fn reason_phrase(&self) -> &'static str {
        reqwest::StatusCode::from_u16(self.code)
            .ok()
            .and_then(|status| status.canonical_reason())
            .unwrap_or("")
    }
}

/// Collects reqwest headers into a lowercased multimap.
pub(crate) fn collect_headers(
    headers: &reqwest::header::HeaderMap,
) -> HashMap<String, Vec<String>> {
    let mut result: HashMap<String, Vec<String>> = HashMap::new();
    for (name, value) in headers {
        let key = name.as_str().to_lowercase();
        let value = value.to_str().unwrap_or_default().to_string();
        result.entry(key).or_default().push(value);
    }
    result
}
