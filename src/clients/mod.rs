//! HTTP layer for Retailer API communication.
//!
//! This module turns request descriptions into HTTP calls and responses into
//! decoded values or typed errors. Token ownership and the refresh policy live
//! one level up, in [`Client`](crate::Client).
//!
//! # Overview
//!
//! - [`HttpClient`]: Builds, sends and decodes requests
//! - [`ApiRequest`]: A request to be sent to the API
//! - [`ResponseTypes`]: Expected response shape per status code
//! - [`ResponseValue`]: A decoded response
//! - [`HttpResponse`]: A raw response
//! - [`classify`]: Maps error responses to [`Error`] kinds
//!
//! # Error classification
//!
//! | Status | Error |
//! |---|---|
//! | no response | [`Error::Connect`] |
//! | 401 | [`Error::Unauthorized`] |
//! | 429 | [`Error::RateLimit`] with `Retry-After` |
//! | 500, 502, 503, 504, 507 | [`Error::Server`] |
//! | 404 | decoded, if declared in [`ResponseTypes`] |
//! | other non-2xx | [`Error::Response`] |
//!
//! The library never retries on its own except once after a token refresh;
//! a `Retry-After` delay is reported to the caller.

mod classify;
mod errors;
mod http_client;
mod http_request;
mod http_response;
mod response_types;

pub use classify::{classify, SERVER_ERROR_CODES};
pub use errors::{
    ConnectError, Error, InvalidRequestError, MalformedTokenError, Problem, RateLimitError,
    ResponseDecodingError, ResponseError, Result, ServerError, UnauthorizedError,
};
pub use http_client::{HttpClient, DEMO_SUFFIX, SDK_VERSION};
pub use http_request::{
    ApiRequest, ApiRequestBuilder, HttpMethod, MultipartValue, Params, RequestBody,
};
pub use http_response::HttpResponse;
pub use response_types::{ResponseType, ResponseTypes, ResponseValue};
