//! Shopify Admin API version.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// An Admin API version, either a quarterly release (`YYYY-MM`) or `unstable`.
///
/// The version only selects the GraphQL endpoint path
/// (`/admin/api/{version}/graphql.json`); the OAuth endpoints are unversioned.
///
/// # Example
///
/// ```rust
/// use shopify_oauth_app::ApiVersion;
///
/// let version: ApiVersion = "2025-10".parse().unwrap();
/// assert_eq!(version.to_string(), "2025-10");
/// assert_eq!(ApiVersion::default().to_string(), "2026-01");
/// assert!("2025-13".parse::<ApiVersion>().is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ApiVersion(String);

impl ApiVersion {
    /// The version the products query was written against.
    pub const DEFAULT: &'static str = "2026-01";

    const UNSTABLE: &'static str = "unstable";

    fn is_release(s: &str) -> bool {
        let Some((year, month)) = s.split_once('-') else {
            return false;
        };
        if year.len() != 4 || month.len() != 2 {
            return false;
        }
        if !year.chars().chain(month.chars()).all(|c| c.is_ascii_digit()) {
            return false;
        }
        matches!(month.parse::<u8>(), Ok(1..=12))
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(Self::UNSTABLE) {
            return Ok(Self(Self::UNSTABLE.to_string()));
        }
        if Self::is_release(s) {
            return Ok(Self(s.to_string()));
        }
        Err(ConfigError::InvalidApiVersion {
            version: s.to_string(),
        })
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
