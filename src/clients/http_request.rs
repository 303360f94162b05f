//! Request descriptions for the Retailer API.
//!
//! This module provides the [`ApiRequest`] type and its builder. A request
//! names a path relative to the configured endpoint; the executor resolves the
//! final URL, adds authentication and encodes the body.

use std::fmt;

use crate::model::Model;

/// HTTP methods used by the Retailer API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources.
    Post,
    /// HTTP PUT method for replacing resources.
    Put,
    /// HTTP PATCH method for partial updates.
    Patch,
    /// HTTP DELETE method for removing resources.
    Delete,
    /// HTTP HEAD method, used for header-only lookups.
    Head,
}

impl HttpMethod {
    pub(crate) fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
            Self::Head => reqwest::Method::HEAD,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Patch => write!(f, "PATCH"),
            Self::Delete => write!(f, "DELETE"),
            Self::Head => write!(f, "HEAD"),
        }
    }
}

/// The body of a request.
#[derive(Clone, Debug, PartialEq)]
pub enum RequestBody {
    /// A model, flattened without empty fields and sent as JSON.
    Model(Model),
    /// Bytes sent unchanged.
    Raw(Vec<u8>),
}

/// One part of a multipart body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MultipartValue {
    /// A text field.
    Text(String),
    /// A file upload.
    File {
        /// File contents.
        bytes: Vec<u8>,
        /// File name reported to the server.
        file_name: String,
        /// MIME type, if known.
        mime: Option<String>,
    },
}

impl From<&str> for MultipartValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for MultipartValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Parameter list that keeps absent values until the request is sent.
pub type Params<T> = Vec<(String, Option<T>)>;

/// A request against a Retailer API endpoint.
///
/// Use [`ApiRequest::builder`] to construct requests.
///
/// # Example
///
/// ```rust
/// use bol_retailer::clients::{ApiRequest, HttpMethod};
///
/// let request = ApiRequest::builder(HttpMethod::Get, "retailer/orders")
///     .query("page", Some(1))
///     .query("fulfilment-method", None::<String>)
///     .produces("application/vnd.retailer.v10+json")
///     .build();
///
/// assert_eq!(request.path, "retailer/orders");
/// assert_eq!(request.query_pairs(), vec![("page", "1")]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    /// The HTTP method.
    pub method: HttpMethod,
    /// Path relative to the configured endpoint, without a leading slash.
    pub path: String,
    /// Media type for the `Accept` header; defaults to the API version media type.
    pub produces: Option<String>,
    /// Media type for the `Content-Type` of a model body; defaults to the API version media type.
    pub consumes: Option<String>,
    /// The request body.
    pub body: Option<RequestBody>,
    /// Query parameters; absent values are dropped.
    pub query: Params<String>,
    /// Form parameters; absent values are dropped.
    pub form_params: Params<String>,
    /// Multipart parts; absent values are dropped.
    pub multipart: Params<MultipartValue>,
    /// Response headers copied into fields of the decoded model.
    pub response_headers: Vec<(String, String)>,
}

impl ApiRequest {
    /// Creates a new builder for the given method and path.
    #[must_use]
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> ApiRequestBuilder {
        ApiRequestBuilder::new(method, path)
    }

    /// Returns the query parameters that carry a value.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&str, &str)> {
        present(&self.query)
            .map(|(name, value)| (name, value.as_str()))
            .collect()
    }

    /// Returns the form parameters that carry a value.
    #[must_use]
    pub fn form_pairs(&self) -> Vec<(&str, &str)> {
        present(&self.form_params)
            .map(|(name, value)| (name, value.as_str()))
            .collect()
    }

    /// Returns the multipart parts that carry a value.
    #[must_use]
    pub fn multipart_parts(&self) -> Vec<(&str, &MultipartValue)> {
        present(&self.multipart).collect()
    }
}

fn present<T>(params: &Params<T>) -> impl Iterator<Item = (&str, &T)> {
    params
        .iter()
        .filter_map(|(name, value)| value.as_ref().map(|value| (name.as_str(), value)))
}

/// Builder for [`ApiRequest`].
#[derive(Debug)]
pub struct ApiRequestBuilder {
    request: ApiRequest,
}

impl ApiRequestBuilder {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            request: ApiRequest {
                method,
                path: path.into().trim_start_matches('/').to_string(),
                produces: None,
                consumes: None,
                body: None,
                query: Vec::new(),
                form_params: Vec::new(),
                multipart: Vec::new(),
                response_headers: Vec::new(),
            },
        }
    }

    /// Sets the `Accept` media type.
    #[must_use]
    pub fn produces(mut self, media_type: impl Into<String>) -> Self {
        self.request.produces = Some(media_type.into());
        self
    }

    /// Sets the `Content-Type` media type for model bodies.
    #[must_use]
    pub fn consumes(mut self, media_type: impl Into<String>) -> Self {
        self.request.consumes = Some(media_type.into());
        self
    }

    /// Sets a model body.
    #[must_use]
    pub fn model_body(mut self, model: Model) -> Self {
        self.request.body = Some(RequestBody::Model(model));
        self
    }

    /// Sets a raw body, sent unchanged.
    #[must_use]
    pub fn raw_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.request.body = Some(RequestBody::Raw(body.into()));
        self
    }

    /// Adds a query parameter; `None` values are not sent.
    #[must_use]
    pub fn query<V: ToString>(mut self, name: impl Into<String>, value: Option<V>) -> Self {
        self.request
            .query
            .push((name.into(), value.map(|value| value.to_string())));
        self
    }

    /// Adds a form parameter; `None` values are not sent.
    #[must_use]
    pub fn form_param<V: ToString>(mut self, name: impl Into<String>, value: Option<V>) -> Self {
        self.request
            .form_params
            .push((name.into(), value.map(|value| value.to_string())));
        self
    }

    /// Adds a multipart part; `None` values are not sent.
    #[must_use]
    pub fn multipart(
        mut self,
        name: impl Into<String>,
        value: Option<impl Into<MultipartValue>>,
    ) -> Self {
        self.request
            .multipart
            .push((name.into(), value.map(Into::into)));
        self
    }

    /// Copies the value of a response header into a field of the decoded model.
    #[must_use]
    pub fn response_header(mut self, header: impl Into<String>, field: impl Into<String>) -> Self {
        self.request
            .response_headers
            .push((header.into(), field.into()));
        self
    }

    /// Builds the [`ApiRequest`].
    #[must_use]
    pub fn build(self) -> ApiRequest {
        self.request
    }
}
