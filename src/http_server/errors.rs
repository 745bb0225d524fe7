//! # Gateway Errors
//!
//! Every failed request is answered with `{"action":"error","reason":...}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// Result type for gateway handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Gateway errors
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Body is not the expected JSON
    #[error("Bad Request: failed to parse JSON")]
    InvalidBody,

    /// Required field missing or empty
    #[error("Bad Request: {0}")]
    MissingField(&'static str),

    // ==================
    // Store Errors
    // ==================
    #[error("{0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody => StatusCode::BAD_REQUEST,
            ApiError::MissingField(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(e) => {
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }

    /// Client-facing reason. Store I/O details stay in the logs.
    pub fn reason(&self) -> String {
        match self {
            ApiError::Store(StoreError::InvalidKey(_)) => "Bad Request: invalid uuid".to_string(),
            ApiError::Store(StoreError::PayloadTooLarge(_, max)) => format!(
                "Payload Too Large: encrypted data exceeds {} bytes",
                max
            ),
            ApiError::Store(StoreError::NotFound(_)) => "Not Found: data not found".to_string(),
            ApiError::Store(StoreError::Io(_)) => {
                "Internal Server Error: storage failure".to_string()
            }
            ApiError::Store(StoreError::Cancelled(_)) => {
                "Service Unavailable: request cancelled".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub action: &'static str,
    pub reason: String,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        Self {
            action: "error",
            reason: err.reason(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::from(&self));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::InvalidBody.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(StoreError::NotFound("k".into())).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(StoreError::PayloadTooLarge(2, 1)).status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            ApiError::from(StoreError::Cancelled("get".into())).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_io_detail_not_exposed() {
        let err = ApiError::from(StoreError::Io("write record: /srv/data/k.json denied".into()));
        assert!(!err.reason().contains("/srv/data"));
    }

    #[test]
    fn test_invalid_key_reason_is_fixed() {
        let err = ApiError::from(StoreError::InvalidKey("\"../secret\"".into()));
        assert_eq!(err.reason(), "Bad Request: invalid uuid");
    }

    #[test]
    fn test_envelope() {
        let body = serde_json::to_value(ErrorResponse::from(&ApiError::MissingField(
            "both 'encrypted' and 'uuid' fields are required",
        )))
        .unwrap();
        assert_eq!(body["action"], "error");
        assert_eq!(
            body["reason"],
            "Bad Request: both 'encrypted' and 'uuid' fields are required"
        );
    }
}
