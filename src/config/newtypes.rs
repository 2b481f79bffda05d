//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use std::fmt;

/// A validated Shopify API key (the OAuth client id).
///
/// # Example
///
/// ```rust
/// use shopify_oauth_app::ApiKey;
///
/// let key = ApiKey::new("my-api-key").unwrap();
/// assert_eq!(key.as_ref(), "my-api-key");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Creates a new validated API key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiKey`] if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        Ok(Self(key))
    }
}

impl AsRef<str> for ApiKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated Shopify API secret key.
///
/// The secret is both the OAuth client secret and the HMAC key the platform
/// signs redirects with. Its `Debug` output is masked so it cannot leak
/// through logs.
///
/// # Example
///
/// ```rust
/// use shopify_oauth_app::ApiSecretKey;
///
/// let secret = ApiSecretKey::new("my-secret").unwrap();
/// assert_eq!(format!("{:?}", secret), "ApiSecretKey(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ApiSecretKey(String);

impl ApiSecretKey {
    /// Creates a new validated API secret key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiSecretKey`] if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ConfigError::EmptyApiSecretKey);
        }
        Ok(Self(key))
    }
}

impl AsRef<str> for ApiSecretKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiSecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiSecretKey(*****)")
    }
}

/// A validated shop identifier.
///
/// Shops are named by a host name (`my-store.myshopify.com`, or any other
/// domain-like value the platform hands out). The value is trimmed and
/// lowercased; it may only contain ASCII letters, digits, `-` and `.`, and
/// no label may be empty or start or end with a hyphen. This keeps the value
/// safe to splice into `https://{shop}/...` URLs.
///
/// Query parameters are untrusted, so parse a shop only after the request
/// carrying it has passed HMAC verification.
///
/// # Example
///
/// ```rust
/// use shopify_oauth_app::ShopDomain;
///
/// let shop = ShopDomain::new("Foo.Example").unwrap();
/// assert_eq!(shop.as_ref(), "foo.example");
///
/// assert!(ShopDomain::new("evil.example/path").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShopDomain(String);

impl ShopDomain {
    const MAX_LEN: usize = 255;

    /// Creates a new validated shop domain.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidShopDomain`] if the domain is invalid.
    pub fn new(domain: impl Into<String>) -> Result<Self, ConfigError> {
        let domain = domain.into().trim().to_lowercase();

        if domain.is_empty()
            || domain.len() > Self::MAX_LEN
            || !domain.split('.').all(Self::is_valid_label)
        {
            return Err(ConfigError::InvalidShopDomain { domain });
        }

        Ok(Self(domain))
    }

    fn is_valid_label(label: &str) -> bool {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    }
}

impl AsRef<str> for ShopDomain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShopDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated absolute URL.
///
/// Used for the OAuth redirect URI and for the optional API host override.
///
/// # Example
///
/// ```rust
/// use shopify_oauth_app::HostUrl;
///
/// let url = HostUrl::new("https://myapp.example.com/auth/callback").unwrap();
/// assert_eq!(url.scheme(), "https");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostUrl {
    url: String,
    scheme_end: usize,
}

impl HostUrl {
    /// Creates a new validated URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidHostUrl`] if the URL is invalid.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into().trim().to_string();

        let scheme_end = url
            .find("://")
            .ok_or_else(|| ConfigError::InvalidHostUrl { url: url.clone() })?;

        let scheme = &url[..scheme_end];
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::InvalidHostUrl { url });
        }

        let host_start = scheme_end + 3;
        if host_start >= url.len() {
            return Err(ConfigError::InvalidHostUrl { url });
        }

        // Host ends at port, path, query, or end of string
        let remainder = &url[host_start..];
        let host_end = remainder
            .find([':', '/', '?', '#'])
            .map_or(url.len(), |i| host_start + i);

        if host_end == host_start {
            return Err(ConfigError::InvalidHostUrl { url });
        }

        Ok(Self { url, scheme_end })
    }

    /// Returns the URL scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.url[..self.scheme_end]
    }

    /// Returns `true` for `https` URLs.
    #[must_use]
    pub fn is_https(&self) -> bool {
        self.scheme().eq_ignore_ascii_case("https")
    }

    /// Returns the URL without trailing slashes, for use as a base to which
    /// absolute paths are appended.
    #[must_use]
    pub fn base(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

impl AsRef<str> for HostUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_rejects_empty_string() {
        let result = ApiKey::new("");
        assert!(matches!(result, Err(ConfigError::EmptyApiKey)));
    }

    #[test]
    fn test_api_secret_key_masks_value_in_debug() {
        let secret = ApiSecretKey::new("super-secret-key").unwrap();
        let debug_output = format!("{:?}", secret);
        assert_eq!(debug_output, "ApiSecretKey(*****)");
        assert!(!debug_output.contains("super-secret-key"));
    }

    #[test]
    fn test_shop_domain_accepts_any_host_name() {
        assert_eq!(
            ShopDomain::new("my-store.myshopify.com").unwrap().as_ref(),
            "my-store.myshopify.com"
        );
        assert_eq!(ShopDomain::new("foo.example").unwrap().as_ref(), "foo.example");
        assert_eq!(ShopDomain::new("localhost").unwrap().as_ref(), "localhost");
    }

    #[test]
    fn test_shop_domain_normalizes_case_and_whitespace() {
        let shop = ShopDomain::new("  My-Store.MyShopify.com ").unwrap();
        assert_eq!(shop.as_ref(), "my-store.myshopify.com");
    }

    #[test]
    fn test_shop_domain_rejects_invalid_domains() {
        assert!(ShopDomain::new("").is_err());
        assert!(ShopDomain::new("my store").is_err());
        assert!(ShopDomain::new("my_store.example").is_err());
        assert!(ShopDomain::new("-my-store.example").is_err());
        assert!(ShopDomain::new("my-store-.example").is_err());
        assert!(ShopDomain::new("foo..example").is_err());
        assert!(ShopDomain::new(".foo.example").is_err());
        assert!(ShopDomain::new("foo.example/admin").is_err());
        assert!(ShopDomain::new("foo.example:8080").is_err());
        assert!(ShopDomain::new("user@foo.example").is_err());
        assert!(ShopDomain::new("a".repeat(256)).is_err());
    }

    #[test]
    fn test_host_url_validates_format() {
        let url = HostUrl::new("https://myapp.example.com").unwrap();
        assert_eq!(url.scheme(), "https");
        assert!(url.is_https());

        let url = HostUrl::new("http://localhost:3000/auth/callback").unwrap();
        assert_eq!(url.scheme(), "http");
        assert!(!url.is_https());
    }

    #[test]
    fn test_host_url_rejects_invalid() {
        assert!(HostUrl::new("myapp.example.com").is_err());
        assert!(HostUrl::new("https://").is_err());
        assert!(HostUrl::new("://example.com").is_err());
        assert!(HostUrl::new("https:///path").is_err());
    }

    #[test]
    fn test_host_url_base_strips_trailing_slash() {
        let url = HostUrl::new("http://127.0.0.1:4000/").unwrap();
        assert_eq!(url.base(), "http://127.0.0.1:4000");
    }
}
