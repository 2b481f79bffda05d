//! API error type that maps flow and upstream failures to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::auth::oauth::OAuthError;
use crate::clients::GraphqlError;

/// Body sent when the code exchange fails. Upstream details stay in the log.
pub const TOKEN_EXCHANGE_FAILED_BODY: &str = "Error exchanging code for access token.";

/// Body sent when the products query fails without an upstream `errors` list.
pub const PRODUCTS_FAILED_BODY: &str = "Error fetching products.";

/// Body sent when the shop has no stored token.
pub const UNAUTHENTICATED_BODY: &str = "Not authenticated.";

/// Wrapper around handler failures that implements [`IntoResponse`].
#[derive(Debug)]
pub enum ApiError {
    /// A failure of the install flow or of request authentication.
    OAuth(OAuthError),
    /// A failed products query.
    Products(GraphqlError),
}

impl ApiError {
    /// Returns the HTTP status for the wrapped error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::OAuth(OAuthError::BadRequest { .. } | OAuthError::HmacInvalid) => {
                StatusCode::BAD_REQUEST
            }
            Self::OAuth(OAuthError::OriginUnverified) => StatusCode::FORBIDDEN,
            Self::OAuth(OAuthError::Unauthenticated) => StatusCode::UNAUTHORIZED,
            Self::OAuth(OAuthError::TokenExchangeFailed { .. }) | Self::Products(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<OAuthError> for ApiError {
    fn from(error: OAuthError) -> Self {
        Self::OAuth(error)
    }
}

impl From<GraphqlError> for ApiError {
    fn from(error: GraphqlError) -> Self {
        Self::Products(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::OAuth(OAuthError::TokenExchangeFailed { .. }) => {
                (status, TOKEN_EXCHANGE_FAILED_BODY).into_response()
            }
            Self::OAuth(OAuthError::Unauthenticated) => {
                (status, UNAUTHENTICATED_BODY).into_response()
            }
            Self::OAuth(error) => (status, error.to_string()).into_response(),
            Self::Products(error) => match error.upstream_errors() {
                Some(errors) => (status, Json(errors)).into_response(),
                None => (status, PRODUCTS_FAILED_BODY).into_response(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt as _;

    async fn body_text(error: ApiError) -> (StatusCode, String) {
        let response = error.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                OAuthError::BadRequest {
                    reason: "x".to_string(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (OAuthError::HmacInvalid, StatusCode::BAD_REQUEST),
            (OAuthError::OriginUnverified, StatusCode::FORBIDDEN),
            (OAuthError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (
                OAuthError::TokenExchangeFailed {
                    status: Some(500),
                    message: "x".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(ApiError::from(error).status(), expected);
        }
    }

    #[tokio::test]
    async fn test_exchange_failure_hides_upstream_body() {
        let (status, body) = body_text(ApiError::from(OAuthError::TokenExchangeFailed {
            status: Some(400),
            message: "client_secret=hunter2 rejected".to_string(),
        }))
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, TOKEN_EXCHANGE_FAILED_BODY);
    }

    #[tokio::test]
    async fn test_products_failure_serializes_upstream_errors() {
        let (status, body) = body_text(ApiError::from(GraphqlError::Response {
            status: 401,
            body: r#"{"errors":[{"message":"Access denied"}]}"#.to_string(),
        }))
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, r#"[{"message":"Access denied"}]"#);
    }

    #[tokio::test]
    async fn test_products_failure_without_errors_is_generic() {
        let (_, body) = body_text(ApiError::from(GraphqlError::Network {
            message: "timed out".to_string(),
        }))
        .await;

        assert_eq!(body, PRODUCTS_FAILED_BODY);
    }
}
