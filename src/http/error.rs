//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::RepositoryError;
use crate::histogram::{ErrorMap, HistogramError};
use crate::services::ServiceError;

/// API error response body for non-validation failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found
    NotFound(String),
    /// Invalid request shape
    BadRequest(String),
    /// Request parameters failed validation; the body is the field-keyed
    /// message map itself.
    Unprocessable(ErrorMap),
    /// Internal server error
    Internal(String),
    /// Repository error
    Repository(RepositoryError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(ApiError::new("NOT_FOUND", msg))).into_response()
            }
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                Json(ApiError::new("BAD_REQUEST", msg)),
            )
                .into_response(),
            AppError::Unprocessable(errors) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(errors)).into_response()
            }
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::new("INTERNAL_ERROR", msg)),
            )
                .into_response(),
            AppError::Repository(err) => match err {
                RepositoryError::NotFound(msg) => {
                    (StatusCode::NOT_FOUND, Json(ApiError::new("NOT_FOUND", msg))).into_response()
                }
                other => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiError::new("REPOSITORY_ERROR", other.to_string())),
                )
                    .into_response(),
            },
        }
    }
}

impl From<HistogramError> for AppError {
    fn from(err: HistogramError) -> Self {
        match err {
            HistogramError::Validation(errors) => AppError::Unprocessable(errors),
            HistogramError::ContestNotFound(_) | HistogramError::UnknownRecordKind(_) => {
                AppError::NotFound(err.to_string())
            }
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Histogram(err) => err.into(),
            ServiceError::Repository(err) => AppError::Repository(err),
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
