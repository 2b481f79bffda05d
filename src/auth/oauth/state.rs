//! Anti-CSRF state handling for the OAuth redirect round-trip.
//!
//! Before sending a merchant to the consent screen the app issues a random
//! nonce, stores it in a short-lived cookie and passes it to the platform as
//! the `state` parameter. The platform echoes `state` back on the callback,
//! where it must match the cookie byte for byte. A callback whose `state`
//! does not match was not started by this browser and is rejected.
//!
//! The nonce is single-use: the callback clears the cookie as soon as the
//! nonce has been checked, whatever happens next.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use shopify_oauth_app::auth::oauth::StateTokenManager;
//!
//! let states = StateTokenManager::new(Duration::from_secs(300), true);
//! let (nonce, cookie) = states.issue();
//!
//! assert_eq!(nonce.as_ref().len(), 32);
//! assert_eq!(cookie.value(), nonce.as_ref());
//! assert!(StateTokenManager::validate(Some(nonce.as_ref()), Some(cookie.value())));
//! assert!(!StateTokenManager::validate(Some(nonce.as_ref()), None));
//! ```

use rand::RngCore;
use std::fmt;
use std::time::Duration;
use tower_cookies::cookie::SameSite;
use tower_cookies::Cookie;

use crate::auth::oauth::hmac::constant_time_compare;
use crate::config::AppConfig;

/// Name of the cookie carrying the nonce between authorize and callback.
pub const STATE_COOKIE_NAME: &str = "shopify_oauth_state";

/// A random, hex-encoded nonce.
#[derive(Clone, PartialEq, Eq)]
pub struct StateNonce(String);

impl StateNonce {
    /// Bytes of entropy per nonce.
    pub const ENTROPY_BYTES: usize = 16;

    /// Draws a fresh nonce from the thread-local CSPRNG.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; Self::ENTROPY_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }
}

impl AsRef<str> for StateNonce {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StateNonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for StateNonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StateNonce").field(&self.0).finish()
    }
}

// Verify StateNonce is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<StateNonce>();
};

/// Issues and checks state nonces.
#[derive(Clone, Debug)]
pub struct StateTokenManager {
    max_age: Duration,
    secure: bool,
}

impl StateTokenManager {
    /// Creates a manager whose cookies live for `max_age`. `secure` adds the
    /// `Secure` attribute, which browsers require to send the cookie only over
    /// HTTPS.
    #[must_use]
    pub const fn new(max_age: Duration, secure: bool) -> Self {
        Self { max_age, secure }
    }

    /// Creates a manager from the configured cookie lifetime. Cookies are
    /// `Secure` when the redirect URI is served over HTTPS.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.state_cookie_max_age(), config.redirect_uri().is_https())
    }

    /// Generates a nonce and the cookie that binds it to this browser.
    ///
    /// The cookie is `HttpOnly`, `SameSite=Lax` and scoped to `/`. `Lax` still
    /// sends it on the top-level GET navigation back from the consent screen.
    #[must_use]
    pub fn issue(&self) -> (StateNonce, Cookie<'static>) {
        let nonce = StateNonce::generate();
        let max_age = i64::try_from(self.max_age.as_secs()).unwrap_or(i64::MAX);

        let cookie = Cookie::build((STATE_COOKIE_NAME, nonce.to_string()))
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .path("/")
            .max_age(time::Duration::seconds(max_age))
            .build();

        (nonce, cookie)
    }

    /// Returns the cookie to hand to the jar's `remove` so the browser drops
    /// the nonce. Path must match the one set by [`issue`](Self::issue).
    #[must_use]
    pub fn clearing_cookie(&self) -> Cookie<'static> {
        Cookie::build((STATE_COOKIE_NAME, ""))
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .path("/")
            .build()
    }

    /// Checks the `state` echoed by the platform against the cookie value.
    ///
    /// Both sides must be present and non-empty and equal byte for byte.
    #[must_use]
    pub fn validate(supplied: Option<&str>, cookie: Option<&str>) -> bool {
        match (supplied, cookie) {
            (Some(supplied), Some(cookie)) if !supplied.is_empty() && !cookie.is_empty() => {
                constant_time_compare(supplied, cookie)
            }
            _ => false,
        }
    }
}
