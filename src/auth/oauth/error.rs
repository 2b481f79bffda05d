//! OAuth-specific error types.
//!
//! This module contains the failure taxonomy of the install flow. Every
//! variant is terminal for the request that produced it; nothing is retried.
//!
//! # Error Types
//!
//! - [`OAuthError::BadRequest`]: required parameters missing or malformed
//! - [`OAuthError::HmacInvalid`]: query signature did not verify
//! - [`OAuthError::OriginUnverified`]: `state` did not match the state cookie
//! - [`OAuthError::TokenExchangeFailed`]: the code could not be exchanged
//! - [`OAuthError::Unauthenticated`]: no stored token for the shop
//!
//! # Example
//!
//! ```rust
//! use shopify_oauth_app::auth::oauth::OAuthError;
//!
//! let error = OAuthError::HmacInvalid;
//! assert_eq!(error.to_string(), "HMAC signature validation failed");
//!
//! let error = OAuthError::BadRequest {
//!     reason: "Missing required parameter 'shop'".to_string(),
//! };
//! assert!(error.to_string().contains("shop"));
//! ```

use thiserror::Error;

/// Errors that can occur during the OAuth install flow.
///
/// Messages may be logged but are not meant for the client. In particular
/// the `message` of [`OAuthError::TokenExchangeFailed`] carries the upstream
/// response body, which stays on the server.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OAuthError {
    /// Required query parameters are missing, empty or malformed.
    #[error("Bad request: {reason}")]
    BadRequest {
        /// What was wrong with the request.
        reason: String,
    },

    /// HMAC signature validation failed.
    ///
    /// The query was not signed with the app's secret, or was altered after
    /// signing.
    #[error("HMAC signature validation failed")]
    HmacInvalid,

    /// The `state` parameter did not match the state cookie.
    ///
    /// Either the cookie is missing (expired, or the callback was opened in
    /// another browser) or the callback was forged.
    #[error("Request origin could not be verified")]
    OriginUnverified,

    /// Exchanging the authorization code for an access token failed.
    ///
    /// `status` is `None` when no response was received at all.
    #[error("Token exchange failed: {message}")]
    TokenExchangeFailed {
        /// The HTTP status returned by the platform, if any.
        status: Option<u16>,
        /// The upstream body or transport error.
        message: String,
    },

    /// No access token is stored for the shop.
    #[error("Shop has not authorized the app")]
    Unauthenticated,
}

impl OAuthError {
    pub(crate) fn missing(param: &str) -> Self {
        Self::BadRequest {
            reason: format!("Missing required parameter '{param}'"),
        }
    }
}

// Verify OAuthError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<OAuthError>();
};
