//! HMAC verification of platform-signed redirects.
//!
//! The platform signs every redirect it sends to the app (the install link and
//! the OAuth callback) with the app's API secret. The signature travels in the
//! `hmac` query parameter and covers every other parameter.
//!
//! # Signing scheme
//!
//! 1. Drop `hmac` from the parameter set.
//! 2. Sort the remaining keys by byte order.
//! 3. Percent-encode each key and value and join them as
//!    `key=value&key=value…`.
//! 4. HMAC-SHA256 that string with the API secret and hex-encode the digest
//!    (lowercase).
//!
//! # Security
//!
//! Digests are compared in constant time. Verification answers only `true`
//! or `false`: a missing `hmac`, a malformed one and a wrong one are
//! indistinguishable to the caller.
//!
//! # Example
//!
//! ```rust
//! use shopify_oauth_app::auth::oauth::hmac::{HmacVerifier, InboundQuery};
//! use shopify_oauth_app::ApiSecretKey;
//!
//! let verifier = HmacVerifier::new(ApiSecretKey::new("my-api-secret").unwrap(), None);
//!
//! let mut query: InboundQuery = [("shop", "foo.example"), ("timestamp", "1700000000")]
//!     .into_iter()
//!     .collect();
//! query.sign("my-api-secret");
//! assert!(verifier.verify(&query));
//!
//! query.insert("shop", "bar.example");
//! assert!(!verifier.verify(&query));
//! ```

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use std::collections::BTreeMap;
use subtle::ConstantTimeEq;

use crate::config::{ApiSecretKey, AppConfig};

type HmacSha256 = Hmac<Sha256>;

/// The query parameter carrying the signature.
pub const HMAC_PARAM: &str = "hmac";

/// The full set of query parameters received on an authorize or callback
/// request.
///
/// Keys are kept in byte order, which is the order the signing scheme
/// requires, so the original ordering of the request has no effect on
/// verification. When a key repeats, the last value wins.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct InboundQuery {
    params: BTreeMap<String, String>,
}

impl InboundQuery {
    /// Creates an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    /// Returns the value of `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Returns the value of `key` if it is present and not blank.
    #[must_use]
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.trim().is_empty())
    }

    /// Returns the supplied signature, if any.
    #[must_use]
    pub fn hmac(&self) -> Option<&str> {
        self.get(HMAC_PARAM)
    }

    /// Builds the message the platform signed: every parameter except
    /// `hmac`, sorted by key and percent-encoded.
    #[must_use]
    pub fn to_signable_string(&self) -> String {
        self.params
            .iter()
            .filter(|(key, _)| key.as_str() != HMAC_PARAM)
            .map(|(key, value)| {
                format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Signs the query with `secret`, setting the `hmac` parameter.
    ///
    /// This is what the platform does before redirecting to the app.
    pub fn sign(&mut self, secret: &str) {
        let signature = compute_signature(&self.to_signable_string(), secret);
        self.insert(HMAC_PARAM, signature);
    }

    /// Returns an iterator over the parameters in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for InboundQuery
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            params: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Computes an HMAC-SHA256 signature for the given message.
///
/// The signature is returned as a lowercase hexadecimal string.
///
/// # Example
///
/// ```rust
/// use shopify_oauth_app::auth::oauth::hmac::compute_signature;
///
/// let sig = compute_signature("test-message", "secret-key");
/// assert_eq!(sig.len(), 64); // SHA256 produces 32 bytes = 64 hex chars
/// ```
#[must_use]
#[allow(clippy::missing_panics_doc)] // HMAC accepts any key size, so this never panics
pub fn compute_signature(message: &str, secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Performs constant-time comparison of two strings.
///
/// Strings of different lengths compare unequal.
#[must_use]
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Verifies platform signatures with the app's secret.
///
/// During a secret rotation the previous secret can be supplied as well;
/// signatures made with either key are accepted, the primary key first.
#[derive(Clone, Debug)]
pub struct HmacVerifier {
    secret: ApiSecretKey,
    old_secret: Option<ApiSecretKey>,
}

impl HmacVerifier {
    /// Creates a verifier for `secret`, optionally also accepting `old_secret`.
    #[must_use]
    pub const fn new(secret: ApiSecretKey, old_secret: Option<ApiSecretKey>) -> Self {
        Self { secret, old_secret }
    }

    /// Creates a verifier from the configured secret keys.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.api_secret_key().clone(),
            config.old_api_secret_key().cloned(),
        )
    }

    /// Returns `true` if the query's `hmac` matches its other parameters.
    ///
    /// Never fails: a missing or malformed signature is simply `false`.
    #[must_use]
    pub fn verify(&self, query: &InboundQuery) -> bool {
        let Some(received) = query.hmac() else {
            return false;
        };
        let signable = query.to_signable_string();

        std::iter::once(&self.secret)
            .chain(self.old_secret.as_ref())
            .any(|secret| {
                constant_time_compare(&compute_signature(&signable, secret.as_ref()), received)
            })
    }
}
