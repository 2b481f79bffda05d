//! GraphQL-specific error types.
//!
//! - [`GraphqlError::Network`]: no response was received
//! - [`GraphqlError::Response`]: the Admin API answered with a non-2xx status
//! - [`GraphqlError::InvalidBody`]: a 2xx response whose body is not JSON
//!
//! # Example
//!
//! ```rust
//! use shopify_oauth_app::clients::GraphqlError;
//!
//! let error = GraphqlError::Response {
//!     status: 401,
//!     body: r#"{"errors":"[API] Invalid API key or access token"}"#.to_string(),
//! };
//! assert_eq!(
//!     error.upstream_errors(),
//!     Some(serde_json::json!("[API] Invalid API key or access token"))
//! );
//! ```

use thiserror::Error;

/// Error type for GraphQL API operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphqlError {
    /// The request could not be sent or timed out.
    #[error("Network error: {message}")]
    Network {
        /// The transport error.
        message: String,
    },

    /// The Admin API returned a non-success HTTP status.
    #[error("GraphQL request failed with status {status}: {body}")]
    Response {
        /// The HTTP status code.
        status: u16,
        /// The raw response body.
        body: String,
    },

    /// A success response carried a body that is not valid JSON.
    #[error("Invalid GraphQL response body: {message}")]
    InvalidBody {
        /// The parse error.
        message: String,
    },
}

impl GraphqlError {
    /// Returns the `errors` member of a JSON error response, if there is one.
    #[must_use]
    pub fn upstream_errors(&self) -> Option<serde_json::Value> {
        let Self::Response { body, .. } = self else {
            return None;
        };
        let mut parsed: serde_json::Value = serde_json::from_str(body).ok()?;
        parsed
            .get_mut("errors")
            .map(serde_json::Value::take)
            .filter(|errors| !errors.is_null())
    }
}

// Verify GraphqlError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GraphqlError>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_upstream_errors_from_error_list() {
        let error = GraphqlError::Response {
            status: 400,
            body: r#"{"errors":[{"message":"Field 'foo' doesn't exist"}]}"#.to_string(),
        };
        assert_eq!(
            error.upstream_errors(),
            Some(json!([{"message": "Field 'foo' doesn't exist"}]))
        );
    }

    #[test]
    fn test_upstream_errors_absent_for_non_json_body() {
        let error = GraphqlError::Response {
            status: 502,
            body: "<html>Bad Gateway</html>".to_string(),
        };
        assert_eq!(error.upstream_errors(), None);
    }

    #[test]
    fn test_upstream_errors_absent_without_errors_member() {
        let error = GraphqlError::Response {
            status: 500,
            body: r#"{"message":"oops","errors":null}"#.to_string(),
        };
        assert_eq!(error.upstream_errors(), None);
    }

    #[test]
    fn test_network_error_has_no_upstream_errors() {
        let error = GraphqlError::Network {
            message: "connection refused".to_string(),
        };
        assert_eq!(error.upstream_errors(), None);
        assert!(error.to_string().contains("connection refused"));
    }

    #[test]
    fn test_all_error_variants_implement_std_error() {
        let error: &dyn std::error::Error = &GraphqlError::InvalidBody {
            message: "expected value".to_string(),
        };
        let _ = error;
    }
}
