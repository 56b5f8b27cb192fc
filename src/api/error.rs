//! Error types for the request/query core.
//!
//! Every failure carries enough context (verb, path, underlying cause)
//! to reconstruct what was attempted.

use serde_json::Value;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed criteria or options, caught before any network call.
    #[error("invalid query: {0}")]
    Validation(String),

    /// An operator key outside the supported filter operator set.
    #[error("unsupported filter operator '{0}'")]
    UnsupportedOperator(String),

    /// The configured timeout elapsed before a response arrived.
    #[error("{verb} {path} timed out")]
    Timeout { verb: &'static str, path: String },

    /// Connection-level failure (DNS, refused connection, broken pipe).
    /// The transport error is preserved as the source.
    #[error("{verb} {path} failed: {source}")]
    Transport {
        verb: &'static str,
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx response. The upstream error body, when present, is
    /// carried unmodified.
    #[error("{verb} {path} returned HTTP {status}")]
    Http {
        verb: &'static str,
        path: String,
        status: u16,
        body: Option<Value>,
    },

    /// A successful response body that does not match the requested shape.
    #[error("{verb} {path} returned an unexpected body: {detail}")]
    Decode {
        verb: &'static str,
        path: String,
        detail: String,
    },
}

impl ApiError {
    /// HTTP status of the upstream response, when the error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The upstream error body, when the error carries one.
    pub fn upstream_body(&self) -> Option<&Value> {
        match self {
            ApiError::Http { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_http_error_accessors() {
        let error = ApiError::Http {
            verb: "GET",
            path: "/v1/queries".to_string(),
            status: 404,
            body: Some(json!({"error": {"code": "NOT_FOUND"}})),
        };

        assert_eq!(error.status(), Some(404));
        assert_eq!(
            error.upstream_body().unwrap()["error"]["code"],
            json!("NOT_FOUND")
        );
        assert_eq!(error.to_string(), "GET /v1/queries returned HTTP 404");
    }

    #[test]
    fn test_non_http_errors_have_no_status() {
        let error = ApiError::Validation("empty value list".to_string());
        assert_eq!(error.status(), None);
        assert!(error.upstream_body().is_none());
    }
}
