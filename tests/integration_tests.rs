//! Integration tests for configuration and signature verification.
//!
//! These tests verify that configuration read from the environment reaches
//! the components built from it.

use shopify_oauth_app::auth::oauth::{HmacVerifier, InboundQuery, StateTokenManager};
use shopify_oauth_app::{
    ApiKey, ApiSecretKey, ApiVersion, AppConfig, ConfigError, HostUrl, ShopDomain,
};
use std::collections::HashMap;

fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    AppConfig::from_lookup(|name| vars.get(name).cloned())
}

#[test]
fn test_full_workflow_env_to_components() {
    let config = config_from(&[
        ("SHOPIFY_API_KEY", "test-api-key"),
        ("SHOPIFY_API_SECRET", "new-secret"),
        ("SHOPIFY_API_SECRET_OLD", "old-secret"),
        ("SHOPIFY_SCOPES", "write_products, read_products"),
        ("REDIRECT_URI", "http://localhost:3000/auth/callback"),
        ("STATE_COOKIE_MAX_AGE_SECS", "120"),
    ])
    .unwrap();

    assert_eq!(config.api_key().as_ref(), "test-api-key");
    assert_eq!(config.scopes().to_string(), "read_products,write_products");
    assert_eq!(config.api_version(), &ApiVersion::default());

    // Signatures made with either secret verify
    let verifier = HmacVerifier::from_config(&config);
    for secret in ["new-secret", "old-secret"] {
        let mut query: InboundQuery = [("shop", "foo.example")].into_iter().collect();
        query.sign(secret);
        assert!(verifier.verify(&query), "signed with {secret}");
    }

    // Plain-http redirect URI yields a non-Secure cookie with the configured lifetime
    let states = StateTokenManager::from_config(&config);
    let (_, cookie) = states.issue();
    assert_eq!(cookie.max_age(), Some(time::Duration::seconds(120)));
    assert_ne!(cookie.secure(), Some(true));
}

#[test]
fn test_https_redirect_uri_yields_secure_cookie() {
    let config = config_from(&[
        ("SHOPIFY_API_KEY", "key"),
        ("SHOPIFY_API_SECRET", "secret"),
        ("REDIRECT_URI", "https://app.example/auth/callback"),
    ])
    .unwrap();

    let (_, cookie) = StateTokenManager::from_config(&config).issue();
    assert_eq!(cookie.secure(), Some(true));
}

#[test]
fn test_error_handling_invalid_inputs_produce_correct_errors() {
    // Empty API key
    let result = ApiKey::new("");
    assert!(matches!(result, Err(ConfigError::EmptyApiKey)));

    // Empty API secret key
    let result = ApiSecretKey::new("");
    assert!(matches!(result, Err(ConfigError::EmptyApiSecretKey)));

    // Invalid shop domain
    let result = ShopDomain::new("invalid domain with spaces");
    assert!(matches!(result, Err(ConfigError::InvalidShopDomain { .. })));

    // Invalid host URL
    let result = HostUrl::new("not-a-valid-url");
    assert!(matches!(result, Err(ConfigError::InvalidHostUrl { .. })));

    // Invalid API version
    let result: Result<ApiVersion, _> = "invalid".parse();
    assert!(matches!(result, Err(ConfigError::InvalidApiVersion { .. })));

    // Invalid scopes
    let result = config_from(&[
        ("SHOPIFY_API_KEY", "key"),
        ("SHOPIFY_API_SECRET", "secret"),
        ("REDIRECT_URI", "https://app.example/auth/callback"),
        ("SHOPIFY_SCOPES", "read products"),
    ]);
    assert!(matches!(result, Err(ConfigError::InvalidScopes { .. })));

    // Missing required variable
    let result = config_from(&[("SHOPIFY_API_KEY", "key")]);
    assert!(matches!(
        result,
        Err(ConfigError::MissingEnvVar {
            name: "SHOPIFY_API_SECRET"
        })
    ));

    // Missing required fields in builder
    let result = AppConfig::builder()
        .api_key(ApiKey::new("key").unwrap())
        .build();
    assert!(matches!(
        result,
        Err(ConfigError::MissingRequiredField {
            field: "api_secret_key"
        })
    ));
}

#[test]
fn test_config_can_be_cloned_and_shared() {
    let config = AppConfig::builder()
        .api_key(ApiKey::new("key").unwrap())
        .api_secret_key(ApiSecretKey::new("secret").unwrap())
        .redirect_uri(HostUrl::new("https://app.example/auth/callback").unwrap())
        .build()
        .unwrap();

    // Clone the config
    let config_clone = config.clone();

    // Both should have the same values
    assert_eq!(config.api_key().as_ref(), config_clone.api_key().as_ref());
    assert_eq!(config.api_version(), config_clone.api_version());

    // Verify Send + Sync by moving to thread (compile-time check)
    let handle = std::thread::spawn(move || {
        let _ = config_clone.api_key().as_ref();
    });
    handle.join().unwrap();
}
