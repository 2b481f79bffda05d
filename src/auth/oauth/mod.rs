//! OAuth 2.0 authorization code flow for app installation.
//!
//! Installing the app on a shop is a two-request handshake:
//!
//! 1. **Begin**: the platform sends the merchant to the app with a signed
//!    install link. The app verifies the signature, issues a state nonce in a
//!    cookie and redirects to the consent screen.
//! 2. **Callback**: after consent the platform redirects back with an
//!    authorization code. The app checks the nonce against the cookie,
//!    re-verifies the signature, exchanges the code for an offline access
//!    token and stores it.
//!
//! [`OAuthFlow`] composes the pieces:
//!
//! - [`HmacVerifier`]: platform signature checks
//! - [`StateTokenManager`]: nonce issue and validation
//! - [`TokenExchanger`]: code for token exchange
//! - [`TokenStore`](crate::store::TokenStore): per-shop token storage
//!
//! # Security Features
//!
//! - **HMAC Validation**: both requests are verified using HMAC-SHA256
//!   signatures
//! - **CSRF Protection**: the state nonce round-trips through a `HttpOnly`
//!   cookie and is single-use
//! - **Constant-Time Comparison**: signatures and nonces are compared in
//!   constant time
//! - **Key Rotation Support**: an old API secret key can be configured so
//!   installs in flight survive a rotation
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use shopify_oauth_app::auth::oauth::{BeginOutcome, HttpTokenExchanger, InboundQuery, OAuthFlow};
//! use shopify_oauth_app::store::InMemoryTokenStore;
//! use shopify_oauth_app::{AppConfig, ApiKey, ApiSecretKey, HostUrl};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let config = Arc::new(
//!     AppConfig::builder()
//!         .api_key(ApiKey::new("my-api-key").unwrap())
//!         .api_secret_key(ApiSecretKey::new("my-secret").unwrap())
//!         .redirect_uri(HostUrl::new("https://myapp.example.com/auth/callback").unwrap())
//!         .scopes("read_products".parse().unwrap())
//!         .build()
//!         .unwrap(),
//! );
//! let exchanger = Arc::new(HttpTokenExchanger::new(&config).unwrap());
//! let flow = OAuthFlow::new(config, Arc::new(InMemoryTokenStore::new()), exchanger);
//!
//! let mut query: InboundQuery = [("shop", "foo.example")].into_iter().collect();
//! query.sign("my-secret");
//!
//! match flow.begin(&query).await.unwrap() {
//!     BeginOutcome::Consent { location, .. } => {
//!         assert!(location.starts_with("https://foo.example/admin/oauth/authorize"));
//!     }
//!     BeginOutcome::AlreadyAuthorized { .. } => unreachable!(),
//! }
//! # }
//! ```

mod error;
mod flow;
pub mod hmac;
mod state;
mod token_exchange;

pub use error::OAuthError;
pub use flow::{BeginOutcome, CallbackOutcome, OAuthFlow};
pub use hmac::{compute_signature, constant_time_compare, HmacVerifier, InboundQuery};
pub use state::{StateNonce, StateTokenManager, STATE_COOKIE_NAME};
pub use token_exchange::{HttpTokenExchanger, TokenExchanger};
