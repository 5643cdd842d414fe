use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use rwsync_core::error::AppError;

use crate::dto::{DataAccessErrorResponse, ErrorObject};

/// Detail returned for every data-access route.
pub const DATA_ACCESS_NOT_SUPPORTED: &str = "This dataset does not support data access through this API. Refer to the dataset's metadata for information on how to access the data from the original provider";

/// API error type that maps to HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Query, download and field listing are never served.
    #[error("{}", DATA_ACCESS_NOT_SUPPORTED)]
    DataAccessNotSupported,
}

/// JSON error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                msg.clone(),
            ),
            ApiError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                msg.clone(),
            ),
            ApiError::DataAccessNotSupported => {
                let body = Json(DataAccessErrorResponse {
                    errors: vec![ErrorObject {
                        status: StatusCode::BAD_REQUEST.as_u16(),
                        detail: DATA_ACCESS_NOT_SUPPORTED.to_string(),
                    }],
                });
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
            details: None,
        });

        (status, body).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        match &err {
            AppError::InvalidDatasetReference(_) | AppError::InvalidUrl(_) => {
                ApiError::BadRequest(err.to_string())
            }
            AppError::ConfigError(msg) => {
                ApiError::Internal(format!("Configuration error: {}", msg))
            }
            AppError::NetworkError(_) | AppError::Timeout(_) | AppError::ClientError(_) => {
                ApiError::ServiceUnavailable(format!("Registry unavailable: {}", err))
            }
            _ => ApiError::Internal(err.to_string()),
        }
    }
}
