// ABOUTME: HTTP error type and its JSON response shape
// ABOUTME: Maps lifecycle and validation failures to status codes without leaking internals

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use todolist_core::ValidationError;
use todolist_tasks::TaskError;
use tracing::{error, info, warn};
use uuid::Uuid;

const INTERNAL_MESSAGE: &str = "Internal server error";

/// Error type returned by every handler
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded { retry_after: u64 },

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

/// `message` is a list for validation failures and a plain string otherwise
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ErrorMessage {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    status_code: u16,
    message: ErrorMessage,
    error: &'static str,
    request_id: String,
}

impl AppError {
    /// Convert AppError to appropriate HTTP status code and error code
    fn to_status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::InvalidArgument(_) => (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::RateLimitExceeded { .. } => {
                (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMIT_EXCEEDED")
            }
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// User-facing message, sanitized for internal failures
    fn to_user_message(&self) -> ErrorMessage {
        match self {
            AppError::Validation(messages) => ErrorMessage::Many(messages.clone()),
            AppError::InvalidArgument(msg) | AppError::NotFound(msg) => {
                ErrorMessage::One(msg.clone())
            }
            AppError::RateLimitExceeded { .. } => {
                ErrorMessage::One("Too many requests. Please try again later".to_string())
            }
            AppError::Internal(_) => ErrorMessage::One(INTERNAL_MESSAGE.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let request_id = Uuid::new_v4().to_string();
        let (status_code, error_code) = self.to_status_and_code();

        match &self {
            AppError::Internal(err) => {
                error!(
                    request_id = %request_id,
                    error = ?err,
                    "Internal server error occurred"
                );
            }
            AppError::RateLimitExceeded { retry_after } => {
                warn!(
                    request_id = %request_id,
                    retry_after = %retry_after,
                    "Rate limit exceeded"
                );
            }
            _ => {
                info!(
                    request_id = %request_id,
                    error_code = %error_code,
                    error = %self,
                    "API error response"
                );
            }
        }

        let body = ErrorResponse {
            status_code: status_code.as_u16(),
            message: self.to_user_message(),
            error: status_code.canonical_reason().unwrap_or("Error"),
            request_id,
        };

        let mut response = (status_code, Json(body)).into_response();

        if let AppError::RateLimitExceeded { retry_after } = &self {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(*retry_after));
        }

        response
    }
}

impl From<TaskError> for AppError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::InvalidArgument(msg) => AppError::InvalidArgument(msg),
            TaskError::NotFound(msg) => AppError::NotFound(msg),
            TaskError::Storage(storage) => AppError::Internal(storage.into()),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.messages)
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, AppError>;

impl AppError {
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }

    pub fn rate_limited(retry_after: u64) -> Self {
        Self::RateLimitExceeded { retry_after }
    }
}
