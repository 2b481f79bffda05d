//! Access tokens granted by the platform.

use serde::Deserialize;
use std::fmt;

use crate::auth::AuthScopes;

/// An offline access token granted to the app for one shop.
///
/// The token authorizes Admin API calls on the shop's behalf, so it is kept
/// out of logs: `Debug` prints `AccessToken(*****)` and there is no
/// `Display` implementation. Use [`AccessToken::expose`] at the point where
/// the token is put on the wire.
///
/// # Example
///
/// ```rust
/// use shopify_oauth_app::AccessToken;
///
/// let token = AccessToken::new("shpat_123");
/// assert_eq!(token.expose(), "shpat_123");
/// assert_eq!(format!("{token:?}"), "AccessToken(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(*****)")
    }
}

/// Body returned by `POST /admin/oauth/access_token`.
#[derive(Clone, Deserialize)]
pub struct AccessTokenResponse {
    /// The granted token.
    pub access_token: String,
    /// Comma-separated scopes actually granted.
    #[serde(default)]
    pub scope: Option<String>,
}

impl AccessTokenResponse {
    /// Returns the token, or `None` if the platform sent an empty one.
    #[must_use]
    pub fn token(&self) -> Option<AccessToken> {
        let token = self.access_token.trim();
        (!token.is_empty()).then(|| AccessToken::new(token))
    }

    /// Parses the granted scopes. Unparseable scope strings yield an empty set.
    #[must_use]
    pub fn granted_scopes(&self) -> AuthScopes {
        self.scope
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }
}

impl fmt::Debug for AccessTokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessTokenResponse")
            .field("access_token", &"*****")
            .field("scope", &self.scope)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_debug_is_masked() {
        let token = AccessToken::new("tok_abc");
        let debug = format!("{token:?}");
        assert!(!debug.contains("tok_abc"));
    }

    #[test]
    fn test_response_parses_token_and_scope() {
        let response: AccessTokenResponse = serde_json::from_str(
            r#"{"access_token":"tok_abc","scope":"write_orders,read_products"}"#,
        )
        .unwrap();

        assert_eq!(response.token().unwrap().expose(), "tok_abc");
        assert_eq!(
            response.granted_scopes().to_string(),
            "read_products,write_orders"
        );
        assert!(!format!("{response:?}").contains("tok_abc"));
    }

    #[test]
    fn test_response_without_scope() {
        let response: AccessTokenResponse =
            serde_json::from_str(r#"{"access_token":"tok_abc"}"#).unwrap();
        assert_eq!(response.granted_scopes(), AuthScopes::default());
    }

    #[test]
    fn test_empty_token_is_rejected() {
        let response: AccessTokenResponse =
            serde_json::from_str(r#"{"access_token":"  "}"#).unwrap();
        assert!(response.token().is_none());
    }

    #[test]
    fn test_missing_token_fails_to_parse() {
        assert!(serde_json::from_str::<AccessTokenResponse>(r#"{"scope":"read_products"}"#).is_err());
    }
}
