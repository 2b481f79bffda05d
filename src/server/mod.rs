//! HTTP layer: axum router, route handlers and error mapping.
//!
//! Routes:
//! - `GET  /api`: begin an install from the platform's signed link
//! - `GET  /auth/callback`: finish an install after consent
//! - `POST /api/products`: fetch an authorized shop's products
//! - everything else: static files from the configured directory

mod error;
mod handlers;

pub use error::ApiError;
pub use handlers::ProductsRequest;

use axum::{
    routing::{get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower_cookies::CookieManagerLayer;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::auth::oauth::{HttpTokenExchanger, OAuthFlow};
use crate::clients::GraphqlClient;
use crate::config::AppConfig;
use crate::store::TokenStore;

/// Shared application state passed to all route handlers.
#[derive(Debug)]
pub struct AppState {
    /// The install flow.
    pub flow: OAuthFlow,
    /// Admin API client for the products proxy.
    pub graphql: GraphqlClient,
}

impl AppState {
    /// Wires the flow and clients for `config` on top of `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be constructed.
    pub fn new(config: AppConfig, store: Arc<dyn TokenStore>) -> Result<Arc<Self>, reqwest::Error> {
        let exchanger = Arc::new(HttpTokenExchanger::new(&config)?);
        let graphql = GraphqlClient::new(&config)?;
        let flow = OAuthFlow::new(Arc::new(config), store, exchanger);
        Ok(Arc::new(Self { flow, graphql }))
    }
}

/// Builds the full axum router.
///
/// Requests that match no route are served from `static_dir`.
pub fn make_router(state: Arc<AppState>, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/api", get(handlers::begin_install))
        .route("/auth/callback", get(handlers::auth_callback))
        .route("/api/products", post(handlers::products))
        .with_state(state)
        .fallback_service(ServeDir::new(static_dir))
        .layer(CookieManagerLayer::new())
        .layer(TraceLayer::new_for_http())
}
