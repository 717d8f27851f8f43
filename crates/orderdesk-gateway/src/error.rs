//! Error handling for the gateway.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Internal server error.
    Internal(String),
    /// Filter/sort payload or paging parameters could not be decoded.
    MalformedInput(String),
    /// The store rejected the compiled query.
    Query(String),
}

/// Error response body.
#[derive(Serialize)]
pub struct ErrorResponse {
    /// Error flag.
    pub error: bool,
    /// Error code.
    pub code: String,
    /// Error message.
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
            AppError::MalformedInput(msg) => (StatusCode::BAD_REQUEST, "MALFORMED_INPUT", msg),
            AppError::Query(msg) => (StatusCode::BAD_GATEWAY, "QUERY_ERROR", msg),
        };

        let body = ErrorResponse {
            error: true,
            code: code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<orderdesk_core::Error> for AppError {
    fn from(err: orderdesk_core::Error) -> Self {
        match err {
            orderdesk_core::Error::MalformedInput(msg) => AppError::MalformedInput(msg),
            orderdesk_core::Error::Query(msg) => AppError::Query(msg),
            other @ orderdesk_core::Error::InvalidRow(_) => AppError::Internal(other.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("request task failed: {}", err))
    }
}
