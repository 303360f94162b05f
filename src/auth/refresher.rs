//! Caller-supplied token refresh strategy.

use async_trait::async_trait;

use crate::clients::Result;
use crate::Client;

/// Strategy invoked when the client has no usable access token.
///
/// The client calls [`on_token_expired`](Self::on_token_expired) before a
/// request when its token is missing or expired, and once more when the
/// server rejects a token as expired. The implementation is expected to
/// install a new token, typically via
/// [`Client::authenticate_by_refresh_token`] or
/// [`Client::set_access_token`].
///
/// When refresh tokens rotate on every use, concurrent refreshes overwrite
/// each other's result. Applications sharing credentials between processes
/// must serialize refreshes themselves.
///
/// # Example
///
/// ```rust,ignore
/// use async_trait::async_trait;
/// use bol_retailer::{AccessToken, Client, TokenRefresher};
/// use tokio::sync::Mutex;
///
/// struct StoredRefreshToken(Mutex<AccessToken>);
///
/// #[async_trait]
/// impl TokenRefresher for StoredRefreshToken {
///     async fn on_token_expired(&self, client: &mut Client) -> bol_retailer::Result<()> {
///         let mut refresh_token = self.0.lock().await;
///         *refresh_token = client.authenticate_by_refresh_token(&refresh_token).await?;
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    /// Installs a fresh access token on `client`.
    ///
    /// # Errors
    ///
    /// Errors are returned to the caller of the request that triggered the
    /// refresh.
    async fn on_token_expired(&self, client: &mut Client) -> Result<()>;
}
