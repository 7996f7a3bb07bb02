//! Structured error type for all web handlers.
//!
//! Each variant maps to an HTTP status code, a machine-readable code
//! string, and a human-readable message. Implements [`IntoResponse`] so
//! handlers can return `Result<T, ApiError>` directly.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

#[derive(Debug)]
pub enum ApiError {
    /// 409 - A shutdown is already in flight.
    ShutdownInProgress,
    /// 400 - The appliance is not configured.
    NotConfigured(String),
    /// 500 - Catch-all internal error.
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ShutdownInProgress => StatusCode::CONFLICT,
            ApiError::NotConfigured(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::ShutdownInProgress => "shutdown_in_progress",
            ApiError::NotConfigured(_) => "not_configured",
            ApiError::Internal(_) => "internal_error",
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::ShutdownInProgress => {
                "A shutdown is already in progress. Poll /status for its outcome.".to_string()
            }
            ApiError::NotConfigured(detail) => format!("Appliance not configured: {detail}."),
            ApiError::Internal(detail) => format!("Internal error: {detail}."),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": {
                "code": self.code(),
                "message": self.message(),
            }
        });
        (self.status_code(), Json(body)).into_response()
    }
}
