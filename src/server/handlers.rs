//! Route handlers. Each one translates between HTTP and [`OAuthFlow`] or
//! the GraphQL client; no protocol decisions are made here.
//!
//! [`OAuthFlow`]: crate::auth::oauth::OAuthFlow

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_cookies::Cookies;

use super::{ApiError, AppState};
use crate::auth::oauth::{BeginOutcome, InboundQuery, OAuthError, STATE_COOKIE_NAME};
use crate::config::ShopDomain;
use crate::store::TokenStore as _;

/// Body of `POST /api/products`.
#[derive(Debug, Deserialize)]
pub struct ProductsRequest {
    /// The shop whose catalog to fetch.
    #[serde(default)]
    pub shop: Option<String>,
}

/// `302 Found` to `location`.
///
/// `location` must be a valid header value. The flow URL-encodes every
/// shop, nonce and consent component; `APP_VIEW_PATH` is inserted as is, and
/// a value with control characters would turn the redirect into a 500.
fn found(location: String) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

/// `GET /api`: begins an install, or skips straight to the app view.
pub async fn begin_install(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Query(query): Query<InboundQuery>,
) -> Result<Response, ApiError> {
    match state.flow.begin(&query).await? {
        BeginOutcome::AlreadyAuthorized { location } => Ok(found(location)),
        BeginOutcome::Consent {
            location,
            state_cookie,
        } => {
            cookies.add(state_cookie);
            Ok(found(location))
        }
    }
}

/// `GET /auth/callback`: completes an install.
pub async fn auth_callback(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Query(query): Query<InboundQuery>,
) -> Result<Response, ApiError> {
    let state_cookie = cookies
        .get(STATE_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string());

    let outcome = state.flow.callback(&query, state_cookie.as_deref()).await;
    if outcome.clear_state_cookie {
        cookies.remove(state.flow.states().clearing_cookie());
    }

    Ok(found(outcome.result?))
}

/// `POST /api/products`: proxies the catalog query for an authorized shop.
///
/// The upstream body is forwarded byte for byte.
pub async fn products(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ProductsRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload.map_err(|e| OAuthError::BadRequest {
        reason: e.body_text(),
    })?;

    let shop = request
        .shop
        .as_deref()
        .and_then(|shop| ShopDomain::new(shop).ok())
        .ok_or(OAuthError::Unauthenticated)?;
    let token = state
        .flow
        .store()
        .get(&shop)
        .await
        .ok_or(OAuthError::Unauthenticated)?;

    let body = state
        .graphql
        .fetch_products(&shop, &token)
        .await
        .map_err(|e| {
            tracing::error!(shop = %shop, error = %e, "Error fetching products");
            e
        })?;

    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}
