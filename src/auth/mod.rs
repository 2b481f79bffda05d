//! Authentication types.
//!
//! This module provides the OAuth scope set, the access token granted per
//! shop, and the install flow that obtains it.
//!
//! # Overview
//!
//! - [`AuthScopes`]: a set of OAuth scopes
//! - [`AccessToken`]: a shop's access token, masked in `Debug` output
//! - [`AccessTokenResponse`]: the platform's token exchange response
//! - [`oauth`]: OAuth 2.0 authorization code flow implementation

mod access_token;
pub mod oauth;
mod scopes;

pub use access_token::{AccessToken, AccessTokenResponse};
pub use scopes::AuthScopes;
