//! # Bol.com Retailer API client
//!
//! A Rust client for the Bol.com Retailer API: a versioned, token-authenticated
//! JSON REST API.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`ClientConfig`] and [`ClientConfigBuilder`]
//! - Access token acquisition through the client credentials, authorization
//!   code and refresh token grants
//! - Automatic token refresh through a caller-supplied [`TokenRefresher`],
//!   with at most one retry per request
//! - Schema-driven models ([`model`]) that build typed object graphs from
//!   JSON and flatten them back
//! - Per-status response decoding and a structured error taxonomy
//!   ([`clients`])
//!
//! ## Quick Start
//!
//! ```rust
//! use bol_retailer::{ApiVersion, ClientConfig, ClientId, ClientSecret};
//!
//! let config = ClientConfig::builder()
//!     .client_id(ClientId::new("your-client-id").unwrap())
//!     .client_secret(ClientSecret::new("your-client-secret").unwrap())
//!     .api_version(ApiVersion::latest())
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Making API Requests
//!
//! ```rust,ignore
//! use bol_retailer::clients::{ApiRequest, HttpMethod, ResponseTypes};
//! use bol_retailer::model::{FieldDef, ModelSchema};
//! use bol_retailer::Client;
//!
//! fn order() -> &'static ModelSchema {
//!     &ORDER
//! }
//!
//! static ORDER: ModelSchema = ModelSchema::new(
//!     "Order",
//!     &[FieldDef::scalar("orderId"), FieldDef::scalar("orderPlacedDateTime")],
//! );
//!
//! static ORDERS: ModelSchema = ModelSchema::new("ReducedOrders", &[FieldDef::array("orders", order)]);
//!
//! let mut client = Client::new(config);
//! client.authenticate_by_client_credentials().await?;
//!
//! let request = ApiRequest::builder(HttpMethod::Get, "retailer/orders")
//!     .query("page", Some(1))
//!     .query("fulfilment-method", None::<&str>)
//!     .build();
//! let types = ResponseTypes::new().model(200, &ORDERS);
//!
//! let orders = client.request(&request, &types).await?.into_model();
//! ```
//!
//! ## Refreshing Tokens
//!
//! ```rust,ignore
//! use async_trait::async_trait;
//! use bol_retailer::{Client, TokenRefresher};
//!
//! struct ClientCredentials;
//!
//! #[async_trait]
//! impl TokenRefresher for ClientCredentials {
//!     async fn on_token_expired(&self, client: &mut Client) -> bol_retailer::Result<()> {
//!         client.authenticate_by_client_credentials().await
//!     }
//! }
//!
//! client.set_token_refresher(ClientCredentials);
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: All newtypes validate on construction
//! - **Thread-safe**: All types are `Send + Sync`
//! - **Async-first**: Designed for use with Tokio async runtime
//! - **No hidden retries**: Rate limits are reported, never slept on

pub mod auth;
pub mod client;
pub mod clients;
pub mod config;
pub mod error;
pub mod model;

// Re-export public types at crate root for convenience
pub use auth::{AccessToken, Grant, TokenRefresher, TokenResponse};
pub use client::Client;
pub use config::{
    ApiVersion, BaseUrl, ClientConfig, ClientConfigBuilder, ClientId, ClientSecret,
};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    ApiRequest, ApiRequestBuilder, Error, HttpClient, HttpMethod, ResponseTypes, ResponseValue,
    Result,
};

// Re-export model types
pub use model::{FieldDef, Model, ModelSchema, Tree};
