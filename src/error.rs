//! Error handling module
//!
//! Provides the unified error type for the gateway, the inventory core and
//! the HTTP surface.

use crate::politeia::ErrorStatusCode;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Transport failure, timeout, or an unexpected HTTP status.
    #[error("Remote unavailable: {0}")]
    RemoteUnavailable(String),

    /// A response body could not be decoded.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid proposal category: {0}")]
    InvalidCategory(String),

    /// Structured error reported by the politeiawww server.
    #[error("Politeiawww server responded with error code: {code} - {}{}", .code.description(), context_suffix(.context))]
    Server {
        http_status: u16,
        code: ErrorStatusCode,
        context: Vec<String>,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    /// A state-changing request was attempted before the version handshake.
    #[error("Must call version first: no CSRF token for this session")]
    HandshakeRequired,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn context_suffix(context: &[String]) -> String {
    if context.is_empty() {
        String::new()
    } else {
        format!(" context: {}", context.join(", "))
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match &self {
            AppError::RemoteUnavailable(msg) => {
                error!("Remote unavailable: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "REMOTE_UNAVAILABLE",
                    "The proposal server could not be reached".to_string(),
                    Some(msg.clone()),
                )
            }
            AppError::MalformedResponse(msg) => {
                error!("Malformed response: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "MALFORMED_RESPONSE",
                    "The proposal server sent an unreadable response".to_string(),
                    Some(msg.clone()),
                )
            }
            AppError::InvalidCategory(msg) => (
                StatusCode::BAD_REQUEST,
                "INVALID_CATEGORY",
                format!("Invalid proposal category: {}", msg),
                None,
            ),
            AppError::Server { http_status, code, .. } => (
                if *code == ErrorStatusCode::PROPOSAL_NOT_FOUND {
                    StatusCode::NOT_FOUND
                } else if *http_status == 400 {
                    StatusCode::BAD_REQUEST
                } else {
                    StatusCode::BAD_GATEWAY
                },
                "SERVER_ERROR",
                self.to_string(),
                None,
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                msg.clone(),
                None,
            ),
            AppError::HandshakeRequired => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "HANDSHAKE_REQUIRED",
                self.to_string(),
                None,
            ),
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                None,
            ),
            AppError::Config(msg) => {
                error!("Configuration error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIG_ERROR",
                    "A configuration error occurred".to_string(),
                    Some(msg.clone()),
                )
            }
            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    Some(msg.clone()),
                )
            }
        };

        let body = Json(ErrorResponse {
            success: false,
            message,
            error: details,
            code: Some(error_code.to_string()),
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, AppError>;

/// Helper function to create a validation error
pub fn validation_error(msg: impl Into<String>) -> AppError {
    AppError::Validation(msg.into())
}
