//! HTTP error responses.
//!
//! Every failure leaves the service as `{code, message, field?}` so callers
//! can tell a field to fix (`VALIDATION_ERROR`) from a parameter combination
//! to adjust (`COMPUTATION_ERROR`) or a collaborator outage (`UPSTREAM_ERROR`).

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use lease_quote_core::LeaseQuoteError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Unique error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Offending request field, for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Quote(#[from] LeaseQuoteError),

    #[error("Malformed request body: {0}")]
    Body(#[from] JsonRejection),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Quote(LeaseQuoteError::InvalidInput { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Quote(LeaseQuoteError::Computation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Quote(LeaseQuoteError::Upstream(_)) => StatusCode::BAD_GATEWAY,
            ApiError::Quote(LeaseQuoteError::SerializationError(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Body(rejection) => rejection.status(),
        }
    }

    pub fn to_error_response(&self) -> ErrorResponse {
        match self {
            ApiError::Quote(e) => ErrorResponse {
                code: e.code().to_string(),
                message: e.to_string(),
                field: match e {
                    LeaseQuoteError::InvalidInput { field, .. } => Some(field.clone()),
                    _ => None,
                },
            },
            ApiError::Body(rejection) => ErrorResponse {
                code: "INVALID_BODY".to_string(),
                message: rejection.body_text(),
                field: None,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            warn!(error = %self, status = status.as_u16(), "request failed");
        }
        (status, Json(self.to_error_response())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let v: ApiError = LeaseQuoteError::invalid("term_months", "must be > 0").into();
        assert_eq!(v.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(v.to_error_response().field.as_deref(), Some("term_months"));

        let c: ApiError = LeaseQuoteError::Computation("no solution".into()).into();
        assert_eq!(c.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(c.to_error_response().code, "COMPUTATION_ERROR");

        let u: ApiError = LeaseQuoteError::Upstream("503".into()).into();
        assert_eq!(u.status_code(), StatusCode::BAD_GATEWAY);
        assert!(u.to_error_response().field.is_none());
    }
}
