//! # Shopify OAuth App
//!
//! An app installation service for the Shopify platform: it authenticates a
//! shop through the OAuth authorization code flow, keeps the resulting
//! access token per shop, and uses it to query the shop's product catalog
//! through the Admin GraphQL API.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`AppConfig`] and [`AppConfigBuilder`]
//! - Validated newtypes for API credentials and domain values
//! - HMAC verification of platform-signed redirects, with secret rotation
//! - CSRF-resistant state nonces bound to a short-lived cookie
//! - The install flow as an explicit state machine via [`auth::oauth`]
//! - Swappable per-shop token storage via [`store`]
//! - An Admin API GraphQL client via [`clients`]
//! - The axum router that serves it all via [`server`]
//!
//! ## Quick Start
//!
//! ```rust
//! use shopify_oauth_app::{AppConfig, ApiKey, ApiSecretKey, ApiVersion, HostUrl};
//!
//! let config = AppConfig::builder()
//!     .api_key(ApiKey::new("your-api-key").unwrap())
//!     .api_secret_key(ApiSecretKey::new("your-api-secret").unwrap())
//!     .redirect_uri(HostUrl::new("https://your-app.com/auth/callback").unwrap())
//!     .scopes("read_products".parse().unwrap())
//!     .api_version(ApiVersion::default())
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Serving
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use shopify_oauth_app::server::{make_router, AppState};
//! use shopify_oauth_app::store::InMemoryTokenStore;
//!
//! let state = AppState::new(config, Arc::new(InMemoryTokenStore::new()))?;
//! let app = make_router(state, "public");
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! axum::serve(listener, app).await?;
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: configuration is read once and passed explicitly
//! - **Fail-fast validation**: all newtypes validate on construction
//! - **Thread-safe**: all shared types are `Send + Sync`
//! - **Secrets stay put**: API secrets and access tokens are masked in
//!   `Debug` output and never sent to the browser

pub mod auth;
pub mod clients;
pub mod config;
pub mod error;
pub mod server;
pub mod store;

// Re-export public types at crate root for convenience
pub use auth::{AccessToken, AccessTokenResponse, AuthScopes};
pub use config::{
    ApiKey, ApiSecretKey, ApiVersion, AppConfig, AppConfigBuilder, HostUrl, ServerConfig,
    ShopDomain,
};
pub use error::ConfigError;

// Re-export OAuth types for convenience
pub use auth::oauth::{
    BeginOutcome, CallbackOutcome, HmacVerifier, HttpTokenExchanger, InboundQuery, OAuthError,
    OAuthFlow, StateTokenManager, TokenExchanger,
};
pub use store::{InMemoryTokenStore, TokenStore};
