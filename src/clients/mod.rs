//! HTTP clients for calls from the app to the platform.
//!
//! All outbound traffic (the token exchange and Admin API queries) goes
//! through a `reqwest` client built by [`build_http_client`]: rustls, a fixed
//! user agent and a request timeout.
//!
//! # Overview
//!
//! - [`build_http_client`]: the shared client constructor
//! - [`graphql::GraphqlClient`]: Admin API GraphQL client
//! - [`graphql::GraphqlError`]: GraphQL-specific error types

pub mod graphql;

use std::time::Duration;

pub use graphql::{GraphqlClient, GraphqlError};

/// Crate version reported in the `User-Agent` header.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the `User-Agent` sent on every outbound request.
#[must_use]
pub fn user_agent() -> String {
    let rust_version = env!("CARGO_PKG_RUST_VERSION");
    format!("Shopify OAuth App v{SDK_VERSION} | Rust {rust_version}")
}

/// Builds the HTTP client used for platform calls.
///
/// Each request, including reading its body, must finish within `timeout`.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialized.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .use_rustls_tls()
        .user_agent(user_agent())
        .timeout(timeout)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_includes_version() {
        let agent = user_agent();
        assert!(agent.contains(SDK_VERSION));
        assert!(agent.contains("Rust"));
    }

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client(Duration::from_secs(1)).is_ok());
    }
}
