//! Authorization-code exchange.
//!
//! After the merchant approves the install, the platform redirects back with
//! a short-lived `code`. The app trades it for a long-lived offline access
//! token by POSTing its credentials to the shop:
//!
//! ```text
//! POST https://{shop}/admin/oauth/access_token
//! {"client_id": "...", "client_secret": "...", "code": "..."}
//! ```
//!
//! The exchange sits behind the [`TokenExchanger`] trait so the flow can be
//! driven against a fake platform. [`HttpTokenExchanger`] is the real thing.

use async_trait::async_trait;
use serde::Serialize;

use crate::auth::oauth::OAuthError;
use crate::auth::{AccessToken, AccessTokenResponse};
use crate::clients::build_http_client;
use crate::config::{AppConfig, ShopDomain};

/// Request body for the code exchange.
#[derive(Serialize)]
struct AccessTokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    code: &'a str,
}

/// Trades an authorization code for an access token.
#[async_trait]
pub trait TokenExchanger: Send + Sync {
    /// Exchanges `code` for `shop`'s access token.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::TokenExchangeFailed`] on transport errors,
    /// non-2xx responses and bodies without a usable `access_token`.
    async fn exchange(&self, shop: &ShopDomain, code: &str) -> Result<AccessToken, OAuthError>;
}

/// [`TokenExchanger`] that calls the platform over HTTPS.
///
/// Requests go to `https://{shop}` unless the config carries an API host
/// override, and are bounded by the configured exchange timeout.
#[derive(Clone, Debug)]
pub struct HttpTokenExchanger {
    client: reqwest::Client,
    config: AppConfig,
}

impl HttpTokenExchanger {
    /// Creates an exchanger for the app described by `config`.
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

    fn token_url(&self, shop: &ShopDomain) -> String {
        format!("{}/admin/oauth/access_token", self.config.admin_origin(shop))
    }
}

#[async_trait]
impl TokenExchanger for HttpTokenExchanger {
    async fn exchange(&self, shop: &ShopDomain, code: &str) -> Result<AccessToken, OAuthError> {
        let body = AccessTokenRequest {
            client_id: self.config.api_key().as_ref(),
            client_secret: self.config.api_secret_key().as_ref(),
            code,
        };

        let response = self
            .client
            .post(self.token_url(shop))
            .json(&body)
            .send()
            .await
            .map_err(|e| OAuthError::TokenExchangeFailed {
                status: None,
                message: format!("Network error: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(OAuthError::TokenExchangeFailed {
                status: Some(status.as_u16()),
                message: error_body,
            });
        }

        let token_response: AccessTokenResponse =
            response
                .json()
                .await
                .map_err(|e| OAuthError::TokenExchangeFailed {
                    status: Some(status.as_u16()),
                    message: format!("Failed to parse token response: {e}"),
                })?;

        let granted = token_response.granted_scopes();
        if !granted.covers(self.config.scopes()) {
            tracing::warn!(
                shop = %shop,
                requested = %self.config.scopes(),
                granted = %granted,
                "Platform granted fewer scopes than requested"
            );
        }

        token_response
            .token()
            .ok_or_else(|| OAuthError::TokenExchangeFailed {
                status: Some(status.as_u16()),
                message: "Token response contained an empty access_token".to_string(),
            })
    }
}

// Verify HttpTokenExchanger is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpTokenExchanger>();
};
