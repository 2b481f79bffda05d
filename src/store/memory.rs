use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::TokenStore;
use crate::auth::AccessToken;
use crate::config::ShopDomain;

/// Process-local [`TokenStore`].
///
/// Tokens live until the process exits. Entries are never evicted. Each
/// `put` replaces the whole entry under the write lock, so a concurrent
/// `get` sees either the old token or the new one.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    tokens: RwLock<HashMap<ShopDomain, AccessToken>>,
}

impl InMemoryTokenStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of shops with a stored token.
    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    /// Returns `true` if no token is stored.
    pub async fn is_empty(&self) -> bool {
        self.tokens.read().await.is_empty()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn put(&self, shop: ShopDomain, token: AccessToken) {
        self.tokens.write().await.insert(shop, token);
    }

    async fn get(&self, shop: &ShopDomain) -> Option<AccessToken> {
        self.tokens.read().await.get(shop).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn shop(name: &str) -> ShopDomain {
        ShopDomain::new(name).unwrap()
    }

    #[tokio::test]
    async fn test_unknown_shop_is_absent() {
        let store = InMemoryTokenStore::new();
        assert!(store.get(&shop("foo.example")).await.is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let store = InMemoryTokenStore::new();
        store.put(shop("foo.example"), AccessToken::new("tok_abc")).await;

        let token = store.get(&shop("foo.example")).await.unwrap();
        assert_eq!(token.expose(), "tok_abc");
        assert!(store.get(&shop("bar.example")).await.is_none());
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = InMemoryTokenStore::new();
        store.put(shop("foo.example"), AccessToken::new("tok_old")).await;
        store.put(shop("foo.example"), AccessToken::new("tok_new")).await;

        assert_eq!(store.get(&shop("foo.example")).await.unwrap().expose(), "tok_new");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_shop_keys_are_normalized() {
        let store = InMemoryTokenStore::new();
        store.put(shop("Foo.Example"), AccessToken::new("tok_abc")).await;
        assert!(store.get(&shop("foo.example")).await.is_some());
    }

    #[tokio::test]
    async fn test_concurrent_writers_leave_one_whole_token() {
        let store: Arc<dyn TokenStore> = Arc::new(InMemoryTokenStore::new());

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .put(shop("foo.example"), AccessToken::new(format!("tok_{i}")))
                        .await;
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        let token = store.get(&shop("foo.example")).await.unwrap();
        let n: usize = token.expose().trim_start_matches("tok_").parse().unwrap();
        assert!(n < 16);
    }
}
