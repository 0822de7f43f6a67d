//! API error handling
//!
//! Author: hephaex@gmail.com

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use blog_core::BlogError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// API error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Error code
    #[schema(example = "NOT_FOUND")]
    pub code: String,
    /// Human-readable detail message
    #[schema(example = "Blog with id=7 not found")]
    pub detail: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            detail: detail.into(),
        }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", detail)
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", detail)
    }

    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::new("UNAUTHORIZED", detail)
    }

    pub fn internal_error() -> Self {
        Self::new("INTERNAL_ERROR", "Internal server error")
    }
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
    Database(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) | AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match self {
            AppError::NotFound(msg) => ApiError::not_found(msg),
            AppError::BadRequest(msg) => ApiError::bad_request(msg),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                ApiError::internal_error()
            }
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "database error");
                ApiError::new("DATABASE_ERROR", "Database operation failed")
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<BlogError> for AppError {
    fn from(err: BlogError) -> Self {
        match err {
            BlogError::NotFound(msg) => AppError::NotFound(msg),
            BlogError::DuplicateUsername | BlogError::InvalidCredentials => {
                AppError::BadRequest(err.to_string())
            }
            BlogError::ValidationError(msg) => AppError::BadRequest(msg),
            BlogError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}
