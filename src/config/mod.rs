//! Configuration types for the installation service.
//!
//! Configuration is read once at process start into explicit values that are
//! passed by reference to the components that need them. Nothing reads the
//! environment after startup.
//!
//! # Overview
//!
//! - [`AppConfig`]: app credentials, scopes, redirect URI and flow tunables
//! - [`AppConfigBuilder`]: a builder for constructing [`AppConfig`] instances
//! - [`ServerConfig`]: listen address and static asset directory
//! - [`ApiKey`], [`ApiSecretKey`], [`ShopDomain`], [`HostUrl`], [`ApiVersion`]:
//!   validated newtypes
//!
//! # Example
//!
//! ```rust
//! use shopify_oauth_app::{AppConfig, ApiKey, ApiSecretKey, HostUrl};
//!
//! let config = AppConfig::builder()
//!     .api_key(ApiKey::new("my-api-key").unwrap())
//!     .api_secret_key(ApiSecretKey::new("my-secret").unwrap())
//!     .redirect_uri(HostUrl::new("https://myapp.example.com/auth/callback").unwrap())
//!     .scopes("read_products".parse().unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.app_view_path(), "/app.html");
//! ```

mod newtypes;
mod version;

pub use newtypes::{ApiKey, ApiSecretKey, HostUrl, ShopDomain};
pub use version::ApiVersion;

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::auth::AuthScopes;
use crate::error::ConfigError;

/// Default lifetime of the anti-CSRF state cookie.
pub const DEFAULT_STATE_COOKIE_MAX_AGE: Duration = Duration::from_secs(300);

/// Default timeout for outbound platform calls (token exchange and GraphQL).
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Default path of the authenticated app view.
pub const DEFAULT_APP_VIEW_PATH: &str = "/app.html";

/// Application configuration.
///
/// `AppConfig` is `Clone`, `Send`, and `Sync`. The service builds it once and
/// shares it behind an `Arc`.
///
/// # Key Rotation
///
/// When `old_api_secret_key` is set, HMAC signatures made with it are still
/// accepted, so installs that started before a secret rotation can finish.
#[derive(Clone, Debug)]
pub struct AppConfig {
    api_key: ApiKey,
    api_secret_key: ApiSecretKey,
    old_api_secret_key: Option<ApiSecretKey>,
    scopes: AuthScopes,
    redirect_uri: HostUrl,
    api_version: ApiVersion,
    api_host: Option<HostUrl>,
    app_view_path: String,
    state_cookie_max_age: Duration,
    http_timeout: Duration,
}

impl AppConfig {
    /// Creates a new builder for constructing an `AppConfig`.
    #[must_use]
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::new()
    }

    /// Reads the configuration from the process environment.
    ///
    /// See [`AppConfig::from_lookup`] for the variables consulted.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a required variable is missing or a value
    /// fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name to
    /// its value. Empty values count as unset.
    ///
    /// | Variable | Required |
    /// |---|---|
    /// | `SHOPIFY_API_KEY` | yes |
    /// | `SHOPIFY_API_SECRET` | yes |
    /// | `SHOPIFY_API_SECRET_OLD` | no |
    /// | `SHOPIFY_SCOPES` | no |
    /// | `REDIRECT_URI` | yes |
    /// | `SHOPIFY_API_VERSION` | no |
    /// | `SHOPIFY_API_HOST` | no |
    /// | `APP_VIEW_PATH` | no |
    /// | `STATE_COOKIE_MAX_AGE_SECS` | no |
    /// | `HTTP_TIMEOUT_SECS` | no |
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a required variable is missing or a value
    /// fails validation.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::HashMap;
    /// use shopify_oauth_app::AppConfig;
    ///
    /// let vars = HashMap::from([
    ///     ("SHOPIFY_API_KEY", "key"),
    ///     ("SHOPIFY_API_SECRET", "secret"),
    ///     ("REDIRECT_URI", "https://myapp.example.com/auth/callback"),
    /// ]);
    /// let config = AppConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string())).unwrap();
    /// assert_eq!(config.api_key().as_ref(), "key");
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &'static str| lookup(name).filter(|v| !v.trim().is_empty());
        let required =
            |name: &'static str| var(name).ok_or(ConfigError::MissingEnvVar { name });

        let mut builder = Self::builder()
            .api_key(ApiKey::new(required("SHOPIFY_API_KEY")?)?)
            .api_secret_key(ApiSecretKey::new(required("SHOPIFY_API_SECRET")?)?)
            .redirect_uri(HostUrl::new(required("REDIRECT_URI")?)?);

        if let Some(old) = var("SHOPIFY_API_SECRET_OLD") {
            builder = builder.old_api_secret_key(ApiSecretKey::new(old)?);
        }
        if let Some(scopes) = var("SHOPIFY_SCOPES") {
            builder = builder.scopes(scopes.parse()?);
        }
        if let Some(version) = var("SHOPIFY_API_VERSION") {
            builder = builder.api_version(version.parse()?);
        }
        if let Some(host) = var("SHOPIFY_API_HOST") {
            builder = builder.api_host(HostUrl::new(host)?);
        }
        if let Some(path) = var("APP_VIEW_PATH") {
            builder = builder.app_view_path(path);
        }
        if let Some(secs) = var("STATE_COOKIE_MAX_AGE_SECS") {
            builder = builder.state_cookie_max_age(parse_secs("STATE_COOKIE_MAX_AGE_SECS", &secs)?);
        }
        if let Some(secs) = var("HTTP_TIMEOUT_SECS") {
            builder = builder.http_timeout(parse_secs("HTTP_TIMEOUT_SECS", &secs)?);
        }

        builder.build()
    }

    /// Returns the API key (OAuth client id).
    #[must_use]
    pub const fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// Returns the API secret key.
    #[must_use]
    pub const fn api_secret_key(&self) -> &ApiSecretKey {
        &self.api_secret_key
    }

    /// Returns the previous API secret key, if configured.
    #[must_use]
    pub const fn old_api_secret_key(&self) -> Option<&ApiSecretKey> {
        self.old_api_secret_key.as_ref()
    }

    /// Returns the OAuth scopes requested at install time.
    #[must_use]
    pub const fn scopes(&self) -> &AuthScopes {
        &self.scopes
    }

    /// Returns the callback URL registered with the platform.
    #[must_use]
    pub const fn redirect_uri(&self) -> &HostUrl {
        &self.redirect_uri
    }

    /// Returns the Admin API version.
    #[must_use]
    pub const fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// Returns the API host override, if configured.
    #[must_use]
    pub const fn api_host(&self) -> Option<&HostUrl> {
        self.api_host.as_ref()
    }

    /// Returns the path of the authenticated app view.
    #[must_use]
    pub fn app_view_path(&self) -> &str {
        &self.app_view_path
    }

    /// Returns the lifetime of the state cookie.
    #[must_use]
    pub const fn state_cookie_max_age(&self) -> Duration {
        self.state_cookie_max_age
    }

    /// Returns the timeout applied to outbound platform calls.
    #[must_use]
    pub const fn http_timeout(&self) -> Duration {
        self.http_timeout
    }

    /// Returns the origin server-to-server calls for `shop` go to.
    ///
    /// This is `https://{shop}` unless an API host override is configured.
    #[must_use]
    pub fn admin_origin(&self, shop: &ShopDomain) -> String {
        self.api_host.as_ref().map_or_else(
            || format!("https://{}", shop.as_ref()),
            |host| host.base().to_string(),
        )
    }
}

// Verify AppConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AppConfig>();
};

fn parse_secs(name: &'static str, value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .ok_or_else(|| ConfigError::InvalidEnvVar {
            name,
            value: value.to_string(),
        })
}

/// Builder for constructing [`AppConfig`] instances.
///
/// Required fields are `api_key`, `api_secret_key` and `redirect_uri`.
///
/// # Defaults
///
/// - `scopes`: empty
/// - `api_version`: [`ApiVersion::DEFAULT`]
/// - `api_host`: `None`
/// - `app_view_path`: `/app.html`
/// - `state_cookie_max_age`: 5 minutes
/// - `http_timeout`: 10 seconds
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    api_key: Option<ApiKey>,
    api_secret_key: Option<ApiSecretKey>,
    old_api_secret_key: Option<ApiSecretKey>,
    scopes: Option<AuthScopes>,
    redirect_uri: Option<HostUrl>,
    api_version: Option<ApiVersion>,
    api_host: Option<HostUrl>,
    app_view_path: Option<String>,
    state_cookie_max_age: Option<Duration>,
    http_timeout: Option<Duration>,
}

impl AppConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: ApiKey) -> Self {
        self.api_key = Some(key);
        self
    }

    /// Sets the API secret key (required).
    #[must_use]
    pub fn api_secret_key(mut self, key: ApiSecretKey) -> Self {
        self.api_secret_key = Some(key);
        self
    }

    /// Sets the previous API secret key for rotation.
    #[must_use]
    pub fn old_api_secret_key(mut self, key: ApiSecretKey) -> Self {
        self.old_api_secret_key = Some(key);
        self
    }

    /// Sets the OAuth scopes.
    #[must_use]
    pub fn scopes(mut self, scopes: AuthScopes) -> Self {
        self.scopes = Some(scopes);
        self
    }

    /// Sets the OAuth redirect URI (required).
    #[must_use]
    pub fn redirect_uri(mut self, uri: HostUrl) -> Self {
        self.redirect_uri = Some(uri);
        self
    }

    /// Sets the Admin API version.
    #[must_use]
    pub fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Routes server-to-server calls to `host` instead of `https://{shop}`.
    #[must_use]
    pub fn api_host(mut self, host: HostUrl) -> Self {
        self.api_host = Some(host);
        self
    }

    /// Sets the path of the authenticated app view. A leading `/` is added
    /// if missing.
    #[must_use]
    pub fn app_view_path(mut self, path: impl Into<String>) -> Self {
        self.app_view_path = Some(path.into());
        self
    }

    /// Sets the state cookie lifetime.
    #[must_use]
    pub const fn state_cookie_max_age(mut self, max_age: Duration) -> Self {
        self.state_cookie_max_age = Some(max_age);
        self
    }

    /// Sets the timeout for outbound platform calls.
    #[must_use]
    pub const fn http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = Some(timeout);
        self
    }

    /// Builds the [`AppConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `api_key`,
    /// `api_secret_key` or `redirect_uri` are not set.
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let api_key = self
            .api_key
            .ok_or(ConfigError::MissingRequiredField { field: "api_key" })?;
        let api_secret_key = self
            .api_secret_key
            .ok_or(ConfigError::MissingRequiredField {
                field: "api_secret_key",
            })?;
        let redirect_uri = self
            .redirect_uri
            .ok_or(ConfigError::MissingRequiredField {
                field: "redirect_uri",
            })?;

        let app_view_path = match self.app_view_path {
            Some(path) if path.starts_with('/') => path,
            Some(path) => format!("/{path}"),
            None => DEFAULT_APP_VIEW_PATH.to_string(),
        };

        Ok(AppConfig {
            api_key,
            api_secret_key,
            old_api_secret_key: self.old_api_secret_key,
            scopes: self.scopes.unwrap_or_default(),
            redirect_uri,
            api_version: self.api_version.unwrap_or_default(),
            api_host: self.api_host,
            app_view_path,
            state_cookie_max_age: self
                .state_cookie_max_age
                .unwrap_or(DEFAULT_STATE_COOKIE_MAX_AGE),
            http_timeout: self
                .http_timeout
                .unwrap_or(DEFAULT_HTTP_TIMEOUT),
        })
    }
}

/// Listener and static asset settings for the binary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// Directory served for requests no route matches.
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
            static_dir: PathBuf::from("public"),
        }
    }
}

impl ServerConfig {
    /// Reads `HOST`, `PORT` and `STATIC_DIR` from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvVar`] if `HOST` or `PORT` cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads `HOST`, `PORT` and `STATIC_DIR` through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvVar`] if `HOST` or `PORT` cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(host) = var("HOST") {
            let ip = host
                .trim()
                .parse::<IpAddr>()
                .map_err(|_| ConfigError::InvalidEnvVar {
                    name: "HOST",
                    value: host.clone(),
                })?;
            config.bind_addr.set_ip(ip);
        }
        if let Some(port) = var("PORT") {
            let port = port
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidEnvVar {
                    name: "PORT",
                    value: port.clone(),
                })?;
            config.bind_addr.set_port(port);
        }
        if let Some(dir) = var("STATIC_DIR") {
            config.static_dir = PathBuf::from(dir);
        }

        Ok(config)
    }
}
