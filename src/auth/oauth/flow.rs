//! The install flow as an explicit state machine.
//!
//! An install takes two requests:
//!
//! 1. **Begin** (`GET /api?shop=…&hmac=…`): the platform's signed install
//!    link. If the shop already has a token the merchant goes straight to the
//!    app view. Otherwise a state nonce is issued and the merchant is sent to
//!    the consent screen.
//! 2. **Callback** (`GET /auth/callback?code=…&shop=…&state=…&hmac=…`): the
//!    platform's redirect after consent. The state is checked against the
//!    cookie, the signature is re-verified, the code is exchanged and the
//!    token stored.
//!
//! [`OAuthFlow`] runs both steps over the parsed query and the state cookie
//! value and returns outcome values. It never touches HTTP types beyond the
//! cookie it hands back, so it can be driven directly in tests.

use std::sync::Arc;
use tower_cookies::Cookie;
use tracing::{debug, error, warn};

use crate::auth::oauth::hmac::{HmacVerifier, InboundQuery, HMAC_PARAM};
use crate::auth::oauth::state::{StateNonce, StateTokenManager};
use crate::auth::oauth::token_exchange::TokenExchanger;
use crate::auth::oauth::OAuthError;
use crate::config::{AppConfig, ShopDomain};
use crate::store::TokenStore;

/// Result of the begin step.
#[derive(Debug)]
pub enum BeginOutcome {
    /// The shop already has a token; redirect to the app view. No state
    /// cookie is issued.
    AlreadyAuthorized {
        /// The app view URL.
        location: String,
    },
    /// Redirect to the consent screen and set the state cookie.
    Consent {
        /// The platform's authorization URL.
        location: String,
        /// Cookie binding the nonce to this browser.
        state_cookie: Cookie<'static>,
    },
}

/// Result of the callback step.
///
/// `clear_state_cookie` is set once the state has been checked, whether or
/// not the rest of the callback succeeds. A request rejected before that
/// point leaves the cookie alone.
#[derive(Debug)]
pub struct CallbackOutcome {
    /// Whether the response must remove the state cookie.
    pub clear_state_cookie: bool,
    /// The app view URL on success.
    pub result: Result<String, OAuthError>,
}

impl CallbackOutcome {
    const fn rejected(error: OAuthError) -> Self {
        Self {
            clear_state_cookie: false,
            result: Err(error),
        }
    }
}

/// Parameters the callback cannot do without.
struct CallbackParams<'a> {
    code: &'a str,
    shop: &'a str,
    state: &'a str,
}

impl<'a> CallbackParams<'a> {
    fn from_query(query: &'a InboundQuery) -> Result<Self, OAuthError> {
        let code = required(query, "code")?;
        let shop = required(query, "shop")?;
        required(query, HMAC_PARAM)?;
        let state = required(query, "state")?;
        Ok(Self { code, shop, state })
    }
}

fn required<'a>(query: &'a InboundQuery, param: &str) -> Result<&'a str, OAuthError> {
    query.non_empty(param).ok_or_else(|| OAuthError::missing(param))
}

fn parse_shop(shop: &str) -> Result<ShopDomain, OAuthError> {
    ShopDomain::new(shop).map_err(|e| OAuthError::BadRequest {
        reason: e.to_string(),
    })
}

/// Orchestrates the install flow.
///
/// Cloning is cheap; all collaborators are shared.
#[derive(Clone)]
pub struct OAuthFlow {
    config: Arc<AppConfig>,
    verifier: HmacVerifier,
    states: StateTokenManager,
    store: Arc<dyn TokenStore>,
    exchanger: Arc<dyn TokenExchanger>,
}

impl OAuthFlow {
    /// Creates a flow for the app described by `config`.
    #[must_use]
    pub fn new(
        config: Arc<AppConfig>,
        store: Arc<dyn TokenStore>,
        exchanger: Arc<dyn TokenExchanger>,
    ) -> Self {
        Self {
            verifier: HmacVerifier::from_config(&config),
            states: StateTokenManager::from_config(&config),
            config,
            store,
            exchanger,
        }
    }

    /// Returns the state token manager.
    #[must_use]
    pub const fn states(&self) -> &StateTokenManager {
        &self.states
    }

    /// Returns the token store.
    #[must_use]
    pub const fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    /// Builds the consent screen URL for `shop`.
    ///
    /// The user agent is always sent to the shop itself, never to the API
    /// host override.
    #[must_use]
    pub fn authorization_url(&self, shop: &ShopDomain, nonce: &StateNonce) -> String {
        format!(
            "https://{}/admin/oauth/authorize?client_id={}&scope={}&redirect_uri={}&state={}",
            shop.as_ref(),
            urlencoding::encode(self.config.api_key().as_ref()),
            urlencoding::encode(&self.config.scopes().to_string()),
            urlencoding::encode(self.config.redirect_uri().as_ref()),
            urlencoding::encode(nonce.as_ref()),
        )
    }

    /// Builds the app view URL for `shop`.
    #[must_use]
    pub fn app_url(&self, shop: &ShopDomain) -> String {
        format!(
            "{}?shop={}",
            self.config.app_view_path(),
            urlencoding::encode(shop.as_ref())
        )
    }

    /// Runs the begin step.
    ///
    /// # Errors
    ///
    /// - [`OAuthError::BadRequest`] if `shop` or `hmac` is missing, or the
    ///   shop is not a valid domain
    /// - [`OAuthError::HmacInvalid`] if the signature does not verify
    pub async fn begin(&self, query: &InboundQuery) -> Result<BeginOutcome, OAuthError> {
        let shop = required(query, "shop")?;
        required(query, HMAC_PARAM)?;

        if !self.verifier.verify(query) {
            warn!(shop, "Rejected install request with invalid HMAC");
            return Err(OAuthError::HmacInvalid);
        }

        let shop = parse_shop(shop)?;

        if self.store.get(&shop).await.is_some() {
            debug!(shop = %shop, "Shop already authorized, skipping consent");
            return Ok(BeginOutcome::AlreadyAuthorized {
                location: self.app_url(&shop),
            });
        }

        let (nonce, state_cookie) = self.states.issue();
        debug!(shop = %shop, "Redirecting to consent screen");

        Ok(BeginOutcome::Consent {
            location: self.authorization_url(&shop, &nonce),
            state_cookie,
        })
    }

    /// Runs the callback step.
    ///
    /// `state_cookie` is the value of the state cookie sent with the request,
    /// if any.
    pub async fn callback(
        &self,
        query: &InboundQuery,
        state_cookie: Option<&str>,
    ) -> CallbackOutcome {
        let params = match CallbackParams::from_query(query) {
            Ok(params) => params,
            Err(e) => return CallbackOutcome::rejected(e),
        };

        if !StateTokenManager::validate(Some(params.state), state_cookie) {
            warn!(
                shop = params.shop,
                cookie_present = state_cookie.is_some(),
                "Rejected callback with unverified state"
            );
            return CallbackOutcome::rejected(OAuthError::OriginUnverified);
        }

        // The nonce is spent from here on.
        CallbackOutcome {
            clear_state_cookie: true,
            result: self.complete(query, &params).await,
        }
    }

    async fn complete(
        &self,
        query: &InboundQuery,
        params: &CallbackParams<'_>,
    ) -> Result<String, OAuthError> {
        if !self.verifier.verify(query) {
            warn!(shop = params.shop, "Rejected callback with invalid HMAC");
            return Err(OAuthError::HmacInvalid);
        }

        let shop = parse_shop(params.shop)?;

        let token = self
            .exchanger
            .exchange(&shop, params.code)
            .await
            .map_err(|e| {
                if let OAuthError::TokenExchangeFailed { status, message } = &e {
                    error!(shop = %shop, ?status, body = %message, "Token exchange failed");
                }
                e
            })?;

        self.store.put(shop.clone(), token).await;
        debug!(shop = %shop, "Stored access token");

        Ok(self.app_url(&shop))
    }
}

impl std::fmt::Debug for OAuthFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthFlow")
            .field("config", &self.config)
            .field("states", &self.states)
            .finish_non_exhaustive()
    }
}
