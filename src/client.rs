//! The authenticated Retailer API client.
//!
//! [`Client`] owns the current [`AccessToken`] and wraps every request in the
//! token policy:
//!
//! 1. Before a request, a missing or expired token triggers the registered
//!    [`TokenRefresher`]. Without a usable token afterwards the request fails
//!    with [`UnauthorizedError`].
//! 2. When the server rejects the token as expired, the refresher runs once
//!    more. The request is retried exactly once, and only if a refresher is
//!    registered, it installed a different token and that token is valid.
//!    Otherwise the original error is returned.
//!
//! # Example
//!
//! ```rust,ignore
//! use bol_retailer::clients::{ApiRequest, HttpMethod, ResponseTypes};
//! use bol_retailer::{Client, ClientConfig, ClientId, ClientSecret};
//!
//! let config = ClientConfig::builder()
//!     .client_id(ClientId::new("client-id")?)
//!     .client_secret(ClientSecret::new("client-secret")?)
//!     .build()?;
//!
//! let mut client = Client::new(config);
//! client.authenticate_by_client_credentials().await?;
//!
//! let request = ApiRequest::builder(HttpMethod::Get, "retailer/orders")
//!     .query("page", Some(1))
//!     .build();
//! let types = ResponseTypes::new().model(200, &REDUCED_ORDERS);
//! let orders = client.request(&request, &types).await?.into_model();
//! ```

use std::fmt;
use std::sync::Arc;

use crate::auth::{AccessToken, Grant, TokenRefresher, TokenResponse, RETAILER_SCOPE};
use crate::clients::{
    ApiRequest, Error, HttpClient, HttpResponse, ResponseTypes, ResponseValue, Result,
    UnauthorizedError,
};
use crate::config::ClientConfig;

const NO_TOKEN_MESSAGE: &str = "No or expired token, please authenticate first";
const EXPIRED_REFRESH_TOKEN_MESSAGE: &str = "The refresh token is expired.";

/// Client for the Retailer API.
///
/// Token-replacing operations take `&mut self`. To share one client between
/// tasks, wrap it in a lock such as `tokio::sync::Mutex`; that lock also
/// serializes token refreshes.
pub struct Client {
    http: HttpClient,
    access_token: Option<Arc<AccessToken>>,
    refresher: Option<Arc<dyn TokenRefresher>>,
}

// Verify Client is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Client>();
};

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("http", &self.http)
            .field("access_token", &self.access_token)
            .field("has_refresher", &self.refresher.is_some())
            .finish()
    }
}

impl Client {
    /// Creates an unauthenticated client.
    ///
    /// # Panics
    ///
    /// Panics if the underlying HTTP client cannot be created; see
    /// [`HttpClient::new`].
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self::from_executor(HttpClient::new(config))
    }

    /// Creates an unauthenticated client that sends requests through `http`.
    #[must_use]
    pub fn with_http_client(config: ClientConfig, http: reqwest::Client) -> Self {
        Self::from_executor(HttpClient::with_http_client(config, http))
    }

    const fn from_executor(http: HttpClient) -> Self {
        Self {
            http,
            access_token: None,
            refresher: None,
        }
    }

    /// Returns the request executor.
    #[must_use]
    pub const fn http_client(&self) -> &HttpClient {
        &self.http
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        self.http.config()
    }

    /// Routes subsequent requests to the demo endpoints, or back.
    pub fn set_demo_mode(&mut self, enabled: bool) {
        self.http.set_demo_mode(enabled);
    }

    /// Registers the strategy invoked when the access token is missing or expired.
    pub fn set_token_refresher(&mut self, refresher: impl TokenRefresher + 'static) {
        self.refresher = Some(Arc::new(refresher));
    }

    /// Removes the registered refresh strategy.
    pub fn clear_token_refresher(&mut self) {
        self.refresher = None;
    }

    /// Returns the current access token.
    #[must_use]
    pub fn access_token(&self) -> Option<&AccessToken> {
        self.access_token.as_deref()
    }

    /// Installs an access token, or clears it with `None`.
    ///
    /// Installing always counts as a token replacement, even when the new
    /// token equals the old one.
    pub fn set_access_token(&mut self, token: Option<AccessToken>) {
        if let Some(token) = &token {
            tracing::debug!(expires_at = token.expires_at(), "Installing access token");
        }
        self.access_token = token.map(Arc::new);
    }

    /// Discards the current access token.
    pub fn clear_access_token(&mut self) {
        self.set_access_token(None);
    }

    /// Returns `true` if a token is held and has not expired.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.access_token
            .as_ref()
            .is_some_and(|token| !token.is_expired())
    }

    /// Makes sure a valid token is held, invoking the refresher if needed.
    ///
    /// # Errors
    ///
    /// Returns [`UnauthorizedError`] if no valid token is available after the
    /// refresher ran, or any error returned by the refresher.
    pub async fn ensure_authenticated(&mut self) -> Result<()> {
        if self.is_authenticated() {
            return Ok(());
        }

        if self.invoke_refresher().await? && self.is_authenticated() {
            return Ok(());
        }

        Err(UnauthorizedError::local(NO_TOKEN_MESSAGE).into())
    }

    /// Executes a request and decodes the response according to `types`.
    ///
    /// # Errors
    ///
    /// Returns the classified error of the request, an [`UnauthorizedError`]
    /// if no valid token is available, or a
    /// [`ResponseDecodingError`](crate::clients::ResponseDecodingError) if the
    /// response does not match `types`.
    pub async fn request(
        &mut self,
        request: &ApiRequest,
        types: &ResponseTypes,
    ) -> Result<ResponseValue> {
        self.ensure_authenticated().await?;

        let response = match self.execute(request).await {
            Ok(response) => response,
            Err(Error::Unauthorized(err)) if err.access_token_expired() => {
                tracing::warn!(path = %request.path, "Access token rejected as expired");
                self.retry_after_refresh(request, err).await?
            }
            Err(err) => return Err(err),
        };

        self.http.decode(request, &response, types)
    }

    async fn retry_after_refresh(
        &mut self,
        request: &ApiRequest,
        err: UnauthorizedError,
    ) -> Result<HttpResponse> {
        let previous = self.access_token.clone();
        let refreshed = self.invoke_refresher().await?;
        let replaced = !same_token(previous.as_ref(), self.access_token.as_ref());

        if refreshed && replaced && self.is_authenticated() {
            return self.execute(request).await;
        }

        tracing::warn!(
            path = %request.path,
            refreshed,
            replaced,
            "Access token was not replaced, not retrying"
        );
        Err(err.into())
    }

    async fn execute(&self, request: &ApiRequest) -> Result<HttpResponse> {
        let token = self
            .access_token
            .as_deref()
            .ok_or_else(|| UnauthorizedError::local(NO_TOKEN_MESSAGE))?;
        self.http.execute(request, token).await
    }

    /// Runs the refresher, if any; returns whether one was registered.
    async fn invoke_refresher(&mut self) -> Result<bool> {
        let Some(refresher) = self.refresher.clone() else {
            return Ok(false);
        };

        tracing::debug!("Invoking token refresher");
        refresher.on_token_expired(self).await?;
        Ok(true)
    }

    /// Requests a token for `grant` and installs its access token.
    ///
    /// # Errors
    ///
    /// Returns the classified error of the token endpoint, or
    /// [`MalformedTokenError`](crate::clients::MalformedTokenError) if the
    /// payload fails validation (including a scope other than
    /// `expected_scope`).
    pub async fn authenticate(
        &mut self,
        grant: &Grant,
        expected_scope: Option<&str>,
    ) -> Result<TokenResponse> {
        let response = self.http.request_token(grant, expected_scope).await?;
        self.set_access_token(Some(response.access_token()));
        Ok(response)
    }

    /// Authenticates with the client credentials from the configuration.
    ///
    /// # Errors
    ///
    /// See [`authenticate`](Self::authenticate). The granted scope must be
    /// `RETAILER`.
    pub async fn authenticate_by_client_credentials(&mut self) -> Result<()> {
        self.authenticate(&Grant::ClientCredentials, Some(RETAILER_SCOPE))
            .await
            .map(|_| ())
    }

    /// Authenticates with an authorization code and returns the refresh token.
    ///
    /// # Errors
    ///
    /// See [`authenticate`](Self::authenticate). Fails with
    /// [`MalformedTokenError::MissingRefreshToken`](crate::clients::MalformedTokenError::MissingRefreshToken)
    /// if the endpoint issued no refresh token; the access token is installed
    /// regardless.
    pub async fn authenticate_by_authorization_code(
        &mut self,
        code: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Result<AccessToken> {
        let grant = Grant::AuthorizationCode {
            code: code.into(),
            redirect_uri: redirect_uri.into(),
        };
        let response = self.authenticate(&grant, None).await?;
        Ok(response.refresh_token()?)
    }

    /// Authenticates with a refresh token and returns the refresh token to use next.
    ///
    /// Depending on the account settings, the returned token is either the
    /// same credential or a newly issued one that invalidates the old one.
    ///
    /// # Errors
    ///
    /// Fails with [`UnauthorizedError`] without contacting the token endpoint
    /// if `refresh_token` has already expired. Otherwise see
    /// [`authenticate_by_authorization_code`](Self::authenticate_by_authorization_code).
    pub async fn authenticate_by_refresh_token(
        &mut self,
        refresh_token: &AccessToken,
    ) -> Result<AccessToken> {
        if refresh_token.is_expired() {
            return Err(UnauthorizedError::local(EXPIRED_REFRESH_TOKEN_MESSAGE).into());
        }

        let grant = Grant::RefreshToken {
            refresh_token: refresh_token.token().to_string(),
        };
        let response = self.authenticate(&grant, None).await?;
        Ok(response.refresh_token()?)
    }
}

fn same_token(a: Option<&Arc<AccessToken>>, b: Option<&Arc<AccessToken>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}
