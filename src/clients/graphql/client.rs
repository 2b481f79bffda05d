//! GraphQL client implementation for the Admin API.
//!
//! This module provides the [`GraphqlClient`] type for executing GraphQL
//! queries against a shop's Admin API on behalf of the app.

use serde::de::IgnoredAny;
use serde_json::{json, Value};

use crate::auth::AccessToken;
use crate::clients::build_http_client;
use crate::clients::graphql::GraphqlError;
use crate::config::{ApiVersion, AppConfig, ShopDomain};

/// Header carrying the shop's access token.
const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// The catalog query behind `POST /api/products`: the first ten products
/// with their price range, up to five images, up to ten variants and the
/// page info needed to fetch the next page.
pub const PRODUCTS_QUERY: &str = r"
query {
  products(first: 10) {
    edges {
      node {
        id
        title
        description
        handle
        priceRangeV2 {
          minVariantPrice {
            amount
            currencyCode
          }
          maxVariantPrice {
            amount
            currencyCode
          }
        }
        images(first: 5) {
          edges {
            node {
              id
              url
              altText
              width
              height
            }
          }
        }
        variants(first: 10) {
          edges {
            node {
              id
              title
              price
              sku
              availableForSale
            }
          }
        }
      }
    }
    pageInfo {
      hasNextPage
      endCursor
    }
  }
}
";

/// GraphQL API client for the Admin API.
///
/// One client serves every shop: the shop and its token are passed per
/// query. Requests go to `https://{shop}/admin/api/{version}/graphql.json`
/// unless the config carries an API host override.
///
/// # Thread Safety
///
/// `GraphqlClient` is `Send + Sync` and cheap to clone.
///
/// # Example
///
/// ```rust
/// use shopify_oauth_app::clients::GraphqlClient;
/// use shopify_oauth_app::{AppConfig, ApiKey, ApiSecretKey, HostUrl, ShopDomain};
///
/// let config = AppConfig::builder()
///     .api_key(ApiKey::new("my-api-key").unwrap())
///     .api_secret_key(ApiSecretKey::new("my-secret").unwrap())
///     .redirect_uri(HostUrl::new("https://myapp.example.com/auth/callback").unwrap())
///     .build()
///     .unwrap();
///
/// let client = GraphqlClient::new(&config).unwrap();
/// let shop = ShopDomain::new("foo.example").unwrap();
/// assert_eq!(
///     client.endpoint(&shop),
///     "https://foo.example/admin/api/2026-01/graphql.json"
/// );
/// ```
#[derive(Clone, Debug)]
pub struct GraphqlClient {
    client: reqwest::Client,
    config: AppConfig,
}

// Verify GraphqlClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GraphqlClient>();
};

impl GraphqlClient {
    /// Creates a client using the configured API version and outbound timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &AppConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config.http_timeout())?,
            config: config.clone(),
        })
    }

    /// Returns the API version being used by this client.
    #[must_use]
    pub const fn api_version(&self) -> &ApiVersion {
        self.config.api_version()
    }

    /// Returns the GraphQL endpoint for `shop`.
    #[must_use]
    pub fn endpoint(&self, shop: &ShopDomain) -> String {
        format!(
            "{}/admin/api/{}/graphql.json",
            self.config.admin_origin(shop),
            self.api_version()
        )
    }

    /// Executes a GraphQL query and returns the response body text as received.
    ///
    /// # Errors
    ///
    /// - [`GraphqlError::Network`] if no response was received
    /// - [`GraphqlError::Response`] for non-2xx responses
    /// - [`GraphqlError::InvalidBody`] if a 2xx body is not JSON
    ///
    /// GraphQL-level errors arrive with status 200 and are part of the
    /// returned body.
    pub async fn query(
        &self,
        shop: &ShopDomain,
        token: &AccessToken,
        query: &str,
        variables: Option<Value>,
    ) -> Result<String, GraphqlError> {
        let body = json!({
            "query": query,
            "variables": variables.unwrap_or_else(|| json!({})),
        });

        let response = self
            .client
            .post(self.endpoint(shop))
            .header(ACCESS_TOKEN_HEADER, token.expose())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| GraphqlError::Network {
                message: e.to_string(),
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| GraphqlError::Network {
            message: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(GraphqlError::Response {
                status: status.as_u16(),
                body: text,
            });
        }

        // Validated but not re-serialized, so key order and number
        // precision survive.
        serde_json::from_str::<IgnoredAny>(&text).map_err(|e| GraphqlError::InvalidBody {
            message: e.to_string(),
        })?;

        Ok(text)
    }

    /// Fetches the first page of `shop`'s catalog with [`PRODUCTS_QUERY`].
    ///
    /// # Errors
    ///
    /// See [`query`](Self::query).
    pub async fn fetch_products(
        &self,
        shop: &ShopDomain,
        token: &AccessToken,
    ) -> Result<String, GraphqlError> {
        tracing::debug!(shop = %shop, version = %self.api_version(), "Fetching products");
        self.query(shop, token, PRODUCTS_QUERY, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiKey, ApiSecretKey, HostUrl};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> AppConfig {
        AppConfig::builder()
            .api_key(ApiKey::new("test-api-key").unwrap())
            .api_secret_key(ApiSecretKey::new("test-secret").unwrap())
            .redirect_uri(HostUrl::new("https://app.example/auth/callback").unwrap())
            .api_host(HostUrl::new(server.uri()).unwrap())
            .build()
            .unwrap()
    }

    fn shop() -> ShopDomain {
        ShopDomain::new("foo.example").unwrap()
    }

    #[test]
    fn test_graphql_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GraphqlClient>();
    }

    #[test]
    fn test_products_query_shape() {
        assert!(PRODUCTS_QUERY.contains("products(first: 10)"));
        assert!(PRODUCTS_QUERY.contains("images(first: 5)"));
        assert!(PRODUCTS_QUERY.contains("variants(first: 10)"));
        assert!(PRODUCTS_QUERY.contains("pageInfo"));
    }

    #[tokio::test]
    async fn test_fetch_products_sends_token_and_returns_body() {
        let server = MockServer::start().await;
        let upstream = r#"{"data":{"products":{"pageInfo":{"hasNextPage":false},"edges":[]}},"extensions":{"cost":{"requestedQueryCost":12345678901234567890123}}}"#;
        Mock::given(method("POST"))
            .and(path("/admin/api/2026-01/graphql.json"))
            .and(header("X-Shopify-Access-Token", "tok_abc"))
            .and(body_partial_json(serde_json::json!({"variables": {}})))
            .respond_with(ResponseTemplate::new(200).set_body_raw(upstream, "application/json"))
            .expect(1)
            .mount(&server)
            .await;

        let client = GraphqlClient::new(&config_for(&server)).unwrap();
        let body = client
            .fetch_products(&shop(), &AccessToken::new("tok_abc"))
            .await
            .unwrap();

        assert_eq!(body, upstream);
    }

    #[tokio::test]
    async fn test_graphql_errors_with_200_are_returned_as_body() {
        let server = MockServer::start().await;
        let upstream = r#"{"errors":[{"message":"Throttled"}]}"#;
        Mock::given(method("POST"))
            .and(path("/admin/api/2026-01/graphql.json"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(upstream, "application/json"))
            .mount(&server)
            .await;

        let client = GraphqlClient::new(&config_for(&server)).unwrap();
        let body = client
            .fetch_products(&shop(), &AccessToken::new("tok_abc"))
            .await
            .unwrap();

        assert_eq!(body, upstream);
    }

    #[tokio::test]
    async fn test_non_success_status_is_response_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/admin/api/2026-01/graphql.json"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({"errors": "Invalid access token"})),
            )
            .mount(&server)
            .await;

        let client = GraphqlClient::new(&config_for(&server)).unwrap();
        let error = client
            .fetch_products(&shop(), &AccessToken::new("tok_bad"))
            .await
            .unwrap_err();

        assert!(matches!(error, GraphqlError::Response { status: 401, .. }));
        assert_eq!(
            error.upstream_errors(),
            Some(serde_json::json!("Invalid access token"))
        );
    }

    #[tokio::test]
    async fn test_non_json_success_body_is_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/admin/api/2026-01/graphql.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = GraphqlClient::new(&config_for(&server)).unwrap();
        let error = client
            .fetch_products(&shop(), &AccessToken::new("tok_abc"))
            .await
            .unwrap_err();

        assert!(matches!(error, GraphqlError::InvalidBody { .. }));
    }
}
