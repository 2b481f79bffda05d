//! Per-shop access token storage.
//!
//! The callback writes a shop's token once the code exchange succeeds; any
//! handler acting on a shop's behalf reads it back. Storage sits behind the
//! [`TokenStore`] trait so the backend can be swapped without touching the
//! flow. [`InMemoryTokenStore`] keeps tokens for the life of the process.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use shopify_oauth_app::store::{InMemoryTokenStore, TokenStore};
//! use shopify_oauth_app::{AccessToken, ShopDomain};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let store: Arc<dyn TokenStore> = Arc::new(InMemoryTokenStore::new());
//! let shop = ShopDomain::new("foo.example").unwrap();
//!
//! assert!(store.get(&shop).await.is_none());
//! store.put(shop.clone(), AccessToken::new("tok_abc")).await;
//! assert_eq!(store.get(&shop).await.unwrap().expose(), "tok_abc");
//! # }
//! ```

mod memory;

pub use memory::InMemoryTokenStore;

use async_trait::async_trait;

use crate::auth::AccessToken;
use crate::config::ShopDomain;

/// Maps shops to their access tokens.
///
/// Implementations must be safe to share across request handlers.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Stores `token` for `shop`, replacing any previous token.
    async fn put(&self, shop: ShopDomain, token: AccessToken);

    /// Returns the token stored for `shop`, if any.
    async fn get(&self, shop: &ShopDomain) -> Option<AccessToken>;
}
