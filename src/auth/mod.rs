//! Authentication types for the Retailer API.
//!
//! # Overview
//!
//! - [`AccessToken`]: A bearer credential with an absolute expiry
//! - [`Grant`]: The OAuth2 grants supported by the token endpoint
//! - [`TokenResponse`]: A validated token endpoint payload
//! - [`TokenRefresher`]: Strategy the [`Client`](crate::Client) invokes when its token expires
//!
//! # Grants
//!
//! - **Client credentials**: the client's own id and secret yield an access
//!   token with scope `RETAILER`.
//! - **Authorization code**: a code received on the redirect URI yields an
//!   access token and a refresh token.
//! - **Refresh token**: a refresh token yields a new access token and,
//!   depending on the account settings, a new refresh token.

mod grant;
mod refresher;
mod token;

pub use grant::{
    Grant, TokenResponse, REFRESH_TOKEN_LIFETIME_SECS, RETAILER_SCOPE, TOKEN_RESPONSE,
};
pub use refresher::TokenRefresher;
pub use token::AccessToken;
