//! Mapping relay failures to HTTP responses.
//!
//! Caller mistakes become `400` with a plain-text reason. Upstream and parse
//! failures become RFC 7807 problem documents with a 5xx status.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use glimpse_core::{RelayError, UpstreamError};
use serde::Serialize;

/// Error returned by route handlers.
#[derive(Debug)]
pub enum ApiError {
    /// The relay rejected or failed the request
    Relay(RelayError),

    /// The multipart body could not be read
    Form { status: StatusCode, message: String },
}

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        ApiError::Relay(err)
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Form {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(err: MultipartRejection) -> Self {
        ApiError::Form {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

/// RFC 7807 problem document.
#[derive(Debug, Serialize)]
struct Problem {
    #[serde(rename = "type")]
    kind: &'static str,
    title: &'static str,
    status: u16,
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    upstream_status: Option<u16>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Form { status, message } => (status, message).into_response(),
            ApiError::Relay(err) if err.is_client_error() => {
                (StatusCode::BAD_REQUEST, err.to_string()).into_response()
            }
            ApiError::Relay(err) => problem_response(&err),
        }
    }
}

fn problem_response(err: &RelayError) -> Response {
    let (status, detail, upstream_status) = match err {
        RelayError::Upstream(UpstreamError::Timeout { .. }) => {
            (StatusCode::GATEWAY_TIMEOUT, err.to_string(), None)
        }
        RelayError::Upstream(UpstreamError::Network { .. }) => (
            StatusCode::BAD_GATEWAY,
            "Could not reach the inference provider".to_string(),
            None,
        ),
        RelayError::Upstream(upstream @ UpstreamError::Status { .. }) => (
            StatusCode::BAD_GATEWAY,
            err.to_string(),
            upstream.status_code(),
        ),
        _ => (StatusCode::BAD_GATEWAY, err.to_string(), None),
    };

    let problem = Problem {
        kind: "about:blank",
        title: status.canonical_reason().unwrap_or("Error"),
        status: status.as_u16(),
        detail,
        upstream_status,
    };

    (
        status,
        [(header::CONTENT_TYPE, "application/problem+json")],
        Json(problem),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_are_bad_request() {
        let response = ApiError::from(RelayError::MissingInput).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_timeout_is_gateway_timeout() {
        let err = RelayError::Upstream(UpstreamError::Timeout { timeout_ms: 10 });
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/problem+json"
        );
    }

    #[test]
    fn test_malformed_is_bad_gateway() {
        let err = RelayError::MalformedUpstreamResponse {
            message: "empty choices array".into(),
        };
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
