//! HTTP executor for Retailer API communication.
//!
//! This module provides the [`HttpClient`] type, which turns an
//! [`ApiRequest`] into an HTTP call, classifies failures and decodes
//! successful responses according to a [`ResponseTypes`] directory.

use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::multipart::{Form, Part};
use serde_json::Value;

use crate::auth::{AccessToken, Grant, TokenResponse, TOKEN_RESPONSE};
use crate::clients::classify::classify;
use crate::clients::errors::{ConnectError, InvalidRequestError, ResponseDecodingError, Result};
use crate::clients::http_request::{ApiRequest, MultipartValue, RequestBody};
use crate::clients::http_response::{collect_headers, HttpResponse};
use crate::clients::response_types::{ResponseType, ResponseTypes, ResponseValue};
use crate::config::ClientConfig;
use crate::model::Model;

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Marker appended to the first path segment in demo mode.
pub const DEMO_SUFFIX: &str = "-demo";

/// Executes requests against the Retailer API and its token endpoint.
///
/// The executor holds no token; the [`Client`](crate::Client) passes one in
/// for every call.
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust
/// use bol_retailer::clients::HttpClient;
/// use bol_retailer::{ClientConfig, ClientId, ClientSecret};
///
/// let config = ClientConfig::builder()
///     .client_id(ClientId::new("id").unwrap())
///     .client_secret(ClientSecret::new("secret").unwrap())
///     .demo_mode(true)
///     .build()
///     .unwrap();
///
/// let client = HttpClient::new(config);
/// assert_eq!(
///     client.resolve_url("retailer/orders"),
///     "https://api.bol.com/retailer-demo/orders"
/// );
/// ```
#[derive(Clone, Debug)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Client configuration.
    config: ClientConfig,
    /// Value of the `User-Agent` header.
    user_agent: String,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new executor for the given configuration.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This should
    /// only happen in extremely unusual circumstances (e.g., TLS initialization failure).
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .expect("Failed to create HTTP client");

        Self::with_http_client(config, client)
    }

    /// Creates a new executor that sends requests through `client`.
    #[must_use]
    pub fn with_http_client(config: ClientConfig, client: reqwest::Client) -> Self {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}bol-retailer-api v{SDK_VERSION} | Rust {rust_version}");

        Self {
            client,
            config,
            user_agent,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the `User-Agent` header sent with every request.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub(crate) fn set_demo_mode(&mut self, enabled: bool) {
        self.config.set_demo_mode(enabled);
    }

    /// Resolves a request path against the endpoint, applying demo routing.
    #[must_use]
    pub fn resolve_url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if !self.config.demo_mode() {
            return self.config.endpoint().join(path);
        }

        let demo_path = match path.split_once('/') {
            Some((first, rest)) => format!("{first}{DEMO_SUFFIX}/{rest}"),
            None if path.is_empty() => String::new(),
            None => format!("{path}{DEMO_SUFFIX}"),
        };
        self.config.endpoint().join(&demo_path)
    }

    /// Sends a request authenticated with `token`.
    ///
    /// Absent query, form and multipart values are dropped. A model body is
    /// flattened without its empty fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connect`](crate::Error::Connect) on transport
    /// failures, [`Error::InvalidRequest`](crate::Error::InvalidRequest) if the
    /// request cannot be built, and the classified error for error statuses.
    pub async fn execute(&self, request: &ApiRequest, token: &AccessToken) -> Result<HttpResponse> {
        let url = self.resolve_url(&request.path);
        let parsed = reqwest::Url::parse(&url)
            .map_err(|_| InvalidRequestError::InvalidUrl { url: url.clone() })?;
        let fallback = self.config.api_version().media_type();

        let accept = request.produces.as_deref().unwrap_or(&fallback);
        let mut builder = self
            .client
            .request(request.method.as_reqwest(), parsed)
            .header(USER_AGENT, header_value("User-Agent", &self.user_agent)?)
            .header(ACCEPT, header_value("Accept", accept)?)
            .header(
                AUTHORIZATION,
                header_value("Authorization", &format!("Bearer {}", token.token()))?,
            );

        match &request.body {
            Some(RequestBody::Model(model)) => {
                let content_type = request.consumes.as_deref().unwrap_or(&fallback);
                builder = builder
                    .header(CONTENT_TYPE, header_value("Content-Type", content_type)?)
                    .body(model.to_tree(true).to_string());
            }
            Some(RequestBody::Raw(bytes)) => {
                builder = builder.body(bytes.clone());
            }
            None => {}
        }

        let query = request.query_pairs();
        if !query.is_empty() {
            builder = builder.query(&query);
        }

        let form = request.form_pairs();
        if !form.is_empty() {
            builder = builder.form(&form);
        }

        let parts = request.multipart_parts();
        if !parts.is_empty() {
            builder = builder.multipart(multipart_form(&parts)?);
        }

        tracing::debug!(method = %request.method, url = %url, "Sending Retailer API request");
        self.send(builder, &url).await
    }

    /// Decodes a successful response according to `types`.
    ///
    /// # Errors
    ///
    /// Returns [`ResponseDecodingError`] if the status is not declared in
    /// `types` or the body does not decode into the declared model.
    pub fn decode(
        &self,
        request: &ApiRequest,
        response: &HttpResponse,
        types: &ResponseTypes,
    ) -> Result<ResponseValue> {
        decode_response(request, response, types)
    }

    /// Requests a token from the token endpoint.
    ///
    /// The client credentials are sent as Basic authentication and the grant
    /// parameters in the query string.
    ///
    /// # Errors
    ///
    /// Returns the classified error for error statuses,
    /// [`ResponseDecodingError`] for any status other than 200 that gets
    /// through classification, and
    /// [`MalformedTokenError`](crate::clients::MalformedTokenError) if the
    /// payload fails validation.
    pub async fn request_token(
        &self,
        grant: &Grant,
        expected_scope: Option<&str>,
    ) -> Result<TokenResponse> {
        let url = self.config.token_url().as_ref().to_string();
        let builder = self
            .client
            .post(&url)
            .basic_auth(
                self.config.client_id().as_ref(),
                Some(self.config.client_secret().as_ref()),
            )
            .header(USER_AGENT, header_value("User-Agent", &self.user_agent)?)
            .header(ACCEPT, "application/json")
            .query(&grant.params());

        tracing::debug!(grant_type = grant.grant_type(), url = %url, "Requesting access token");
        let response = self.send(builder, &url).await?;

        let types = ResponseTypes::new().model(200, &TOKEN_RESPONSE);
        if types.get(response.code).is_none() {
            return Err(undeclared_status(&url, response.code));
        }

        Ok(TokenResponse::from_json(&response.json()?, expected_scope)?)
    }

    async fn send(&self, builder: reqwest::RequestBuilder, url: &str) -> Result<HttpResponse> {
        let res = builder
            .send()
            .await
            .map_err(|source| ConnectError { source })?;

        let code = res.status().as_u16();
        let headers = collect_headers(res.headers());
        let body = res.text().await.map_err(|source| ConnectError { source })?;
        let response = HttpResponse::new(code, headers, body);

        tracing::debug!(url = %url, status = code, "Received response");

        match classify(&response) {
            Some(error) => Err(error),
            None => Ok(response),
        }
    }
}

fn invalid_header(name: &str) -> InvalidRequestError {
    InvalidRequestError::InvalidHeader {
        name: name.to_string(),
    }
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| invalid_header(name).into())
}

fn undeclared_status(path: &str, code: u16) -> crate::Error {
    let message = format!("No model specified for '{path}' with status '{code}'");
    ResponseDecodingError::new(message).into()
}

fn multipart_form(parts: &[(&str, &MultipartValue)]) -> Result<Form> {
    let mut form = Form::new();
    for (name, value) in parts {
        form = match value {
            MultipartValue::Text(text) => form.text(name.to_string(), text.clone()),
            MultipartValue::File {
                bytes,
                file_name,
                mime,
            } => {
                let mut part = Part::bytes(bytes.clone()).file_name(file_name.clone());
                if let Some(mime) = mime {
                    part = part.mime_str(mime).map_err(|_| invalid_header("Content-Type"))?;
                }
                form.part(name.to_string(), part)
            }
        };
    }
    Ok(form)
}

fn decode_response(
    request: &ApiRequest,
    response: &HttpResponse,
    types: &ResponseTypes,
) -> Result<ResponseValue> {
    let Some(response_type) = types.get(response.code) else {
        return Err(undeclared_status(&request.path, response.code));
    };

    let schema = match response_type {
        ResponseType::NoContent => return Ok(ResponseValue::Empty),
        ResponseType::Text => return Ok(ResponseValue::Text(response.body.clone())),
        ResponseType::Model(schema) => schema,
    };

    let mut data = if response.body.trim().is_empty() && !request.response_headers.is_empty() {
        Value::Object(serde_json::Map::new())
    } else {
        response.json()?
    };

    if let Value::Object(map) = &mut data {
        for (header, field) in &request.response_headers {
            if let Some(value) = response.header(header) {
                map.insert(field.clone(), Value::String(value.to_string()));
            }
        }
    }

    Model::try_from_tree(schema, data)
        .map(ResponseValue::Model)
        .map_err(|err| {
            ResponseDecodingError::with_body(
                format!("Response does not match {}: {err}", schema.name()),
                &response.body,
            )
            .into()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::HttpMethod;
    use crate::config::{ApiVersion, BaseUrl, ClientId, ClientSecret};
    use crate::model::{FieldDef, ModelSchema};
    use crate::Error;
    use serde_json::json;
    use std::collections::HashMap;

    static STATUS: ModelSchema = ModelSchema::new(
        "ProcessStatus",
        &[
            FieldDef::scalar("processStatusId"),
            FieldDef::scalar("status"),
        ],
    );

    fn config(demo_mode: bool) -> ClientConfig {
        ClientConfig::builder()
            .client_id(ClientId::new("id").unwrap())
            .client_secret(ClientSecret::new("secret").unwrap())
            .api_version(ApiVersion::V10)
            .endpoint(BaseUrl::new("https://api.bol.com/").unwrap())
            .demo_mode(demo_mode)
            .build()
            .unwrap()
    }

    fn response(code: u16, headers: &[(&str, &str)], body: &str) -> HttpResponse {
        let headers: HashMap<_, _> = headers
            .iter()
            .map(|(name, value)| ((*name).to_string(), vec![(*value).to_string()]))
            .collect();
        HttpResponse::new(code, headers, body.to_string())
    }

    fn get(path: &str) -> ApiRequest {
        ApiRequest::builder(HttpMethod::Get, path).build()
    }

    #[test]
    fn test_resolve_url_without_demo_mode() {
        let client = HttpClient::new(config(false));
        assert_eq!(
            client.resolve_url("retailer/orders"),
            "https://api.bol.com/retailer/orders"
        );
    }

    #[test]
    fn test_demo_mode_rewrites_first_segment() {
        let client = HttpClient::new(config(true));
        assert_eq!(
            client.resolve_url("retailer/orders/123"),
            "https://api.bol.com/retailer-demo/orders/123"
        );
        assert_eq!(
            client.resolve_url("/shared/process-status/1"),
            "https://api.bol.com/shared-demo/process-status/1"
        );
        assert_eq!(
            client.resolve_url("retailer"),
            "https://api.bol.com/retailer-demo"
        );
    }

    #[test]
    fn test_demo_mode_can_be_toggled() {
        let mut client = HttpClient::new(config(false));
        client.set_demo_mode(true);
        assert!(client.config().demo_mode());
        assert!(client.resolve_url("retailer/offers").contains("retailer-demo"));
    }

    #[test]
    fn test_user_agent_format() {
        let client = HttpClient::new(config(false));
        assert!(client.user_agent().starts_with("bol-retailer-api v"));
        assert!(client.user_agent().contains("| Rust"));

        let config = ClientConfig::builder()
            .client_id(ClientId::new("id").unwrap())
            .client_secret(ClientSecret::new("secret").unwrap())
            .user_agent_prefix("MyShop/1.0")
            .build()
            .unwrap();
        let client = HttpClient::new(config);
        assert!(client.user_agent().starts_with("MyShop/1.0 | bol-retailer-api v"));
    }

    #[test]
    fn test_undeclared_status_is_a_decoding_error() {
        let types = ResponseTypes::new().model(200, &STATUS);
        let request = get("retailer/orders");
        let err = decode_response(&request, &response(202, &[], "{}"), &types).unwrap_err();

        match err {
            Error::ResponseDecoding(e) => assert_eq!(
                e.message,
                "No model specified for 'retailer/orders' with status '202'"
            ),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_decode_text_and_no_content() {
        let types = ResponseTypes::new().text(200).no_content(404);

        let value = decode_response(&get("x"), &response(200, &[], "a;b;c"), &types).unwrap();
        assert_eq!(value, ResponseValue::Text("a;b;c".to_string()));

        let value = decode_response(&get("x"), &response(404, &[], "{}"), &types).unwrap();
        assert!(value.is_empty());
    }

    #[test]
    fn test_decode_model() {
        let types = ResponseTypes::new().model(202, &STATUS);
        let body = r#"{"processStatusId":"1","status":"PENDING","extra":1}"#;
        let value = decode_response(&get("x"), &response(202, &[], body), &types).unwrap();

        let model = value.into_model().unwrap();
        assert_eq!(model.str("status"), Some("PENDING"));
        assert_eq!(
            model.to_tree(true),
            json!({"processStatusId": "1", "status": "PENDING"})
        );
    }

    #[test]
    fn test_invalid_json_is_a_decoding_error() {
        let types = ResponseTypes::new().model(200, &STATUS);
        let invalid = response(200, &[], "not json");
        match decode_response(&get("x"), &invalid, &types) {
            Err(Error::ResponseDecoding(e)) => assert_eq!(e.message, "Body contains invalid JSON"),
            other => panic!("unexpected: {other:?}"),
        }

        let empty = response(200, &[], "");
        let err = decode_response(&get("x"), &empty, &types).unwrap_err();
        assert!(matches!(err, Error::ResponseDecoding(_)));
    }

    #[test]
    fn test_response_headers_fill_model_fields() {
        let request = ApiRequest::builder(HttpMethod::Head, "shared/process-status/1")
            .response_header("X-Process-Id", "processStatusId")
            .build();
        let types = ResponseTypes::new().model(200, &STATUS);

        let head = response(200, &[("x-process-id", "77")], "");
        let model = decode_response(&request, &head, &types)
            .unwrap()
            .into_model()
            .unwrap();

        assert_eq!(model.str("processStatusId"), Some("77"));
        assert!(model.is_empty_field("status"));
    }

    #[test]
    fn test_header_value_rejects_control_characters() {
        let err = header_value("Accept", "bad\nvalue").unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidRequest(InvalidRequestError::InvalidHeader { name }) if name == "Accept"
        ));
    }

    #[tokio::test]
    async fn test_unparseable_url_is_rejected_before_sending() {
        let config = ClientConfig::builder()
            .client_id(ClientId::new("id").unwrap())
            .client_secret(ClientSecret::new("secret").unwrap())
            .endpoint(BaseUrl::new("https://bad host/").unwrap())
            .build()
            .unwrap();
        let client = HttpClient::new(config);
        let request = get("retailer/orders");
        let token = AccessToken::from_expires_in("T1", 60);

        let err = client.execute(&request, &token).await;
        assert!(matches!(
            err,
            Err(Error::InvalidRequest(InvalidRequestError::InvalidUrl { .. }))
        ));
    }

    #[test]
    fn test_multipart_form_rejects_invalid_mime() {
        let value = MultipartValue::File {
            bytes: b"data".to_vec(),
            file_name: "label.pdf".to_string(),
            mime: Some("not a mime\n".to_string()),
        };
        assert!(multipart_form(&[("file", &value)]).is_err());
    }
}
