//! Custom error types and handling
//!
//! This module defines the application's error types and implements
//! conversion to HTTP responses for the Axum framework.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Resource errors
    #[error("Not found: {0}")]
    NotFound(String),

    // Scheduler errors
    #[error("Task queue is full")]
    QueueFull,

    // Container runtime errors
    #[error("Docker error: {0}")]
    Docker(String),

    // Sandbox execution errors
    #[error("Compilation error: {0}")]
    CompilationError(String),

    #[error("Runtime error: {0}")]
    RuntimeError(String),

    #[error("Time limit exceeded")]
    TimeLimitExceeded,

    #[error("Memory limit exceeded")]
    MemoryLimitExceeded,

    // Internal errors
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

/// Error details in response
#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AppError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::QueueFull => "QUEUE_FULL",
            Self::Docker(_) => "DOCKER_ERROR",
            Self::CompilationError(_) => "COMPILATION_ERROR",
            Self::RuntimeError(_) => "RUNTIME_ERROR",
            Self::TimeLimitExceeded => "TIME_LIMIT_EXCEEDED",
            Self::MemoryLimitExceeded => "MEMORY_LIMIT_EXCEEDED",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// Only `QueueFull` maps to 503; every other unexpected failure maps to
    /// 500, per the resolved 500-vs-503 split.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::QueueFull => StatusCode::SERVICE_UNAVAILABLE,
            Self::CompilationError(_) | Self::RuntimeError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::TimeLimitExceeded | Self::MemoryLimitExceeded => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::Docker(_) | Self::Internal(_) | Self::Configuration(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Create error response with additional details
    pub fn with_details(self, details: serde_json::Value) -> AppErrorWithDetails {
        AppErrorWithDetails {
            error: self,
            details: Some(details),
        }
    }
}

/// Error with additional details
pub struct AppErrorWithDetails {
    pub error: AppError,
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Log internal errors but don't expose details to clients
        let message = match &self {
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                tracing::debug!("Internal error details: {:#?}", e);
                "An internal error occurred".to_string()
            }
            AppError::Docker(e) => {
                tracing::error!("Docker error: {}", e);
                "A container runtime error occurred".to_string()
            }
            _ => self.to_string(),
        };

        let body = ErrorResponse {
            error: ErrorDetails {
                code: self.error_code().to_string(),
                message,
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl IntoResponse for AppErrorWithDetails {
    fn into_response(self) -> Response {
        let status = self.error.status_code();
        let code = self.error.error_code().to_string();
        let message = self.error.to_string();

        let body = ErrorResponse {
            error: ErrorDetails {
                code,
                message,
                details: self.details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<bollard::errors::Error> for AppError {
    fn from(err: bollard::errors::Error) -> Self {
        AppError::Docker(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.into())
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_full_maps_to_503() {
        assert_eq!(AppError::QueueFull.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(AppError::QueueFull.error_code(), "QUEUE_FULL");
    }

    #[test]
    fn unexpected_internal_errors_map_to_500() {
        let err = AppError::Internal(anyhow::anyhow!("boom"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let docker_err = AppError::Docker("daemon unreachable".to_string());
        assert_eq!(docker_err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_maps_to_400() {
        assert_eq!(
            AppError::Validation("no code provided".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(
            AppError::NotFound("task not found".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
    }
}
