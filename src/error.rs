//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use std::any::Any;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// Each variant maps to a specific HTTP status code and error message.
///
/// # Error Categories
///
/// - **Validation Errors**: Missing or malformed request data
/// - **OTP Errors**: Unknown, expired, exhausted or mismatched codes
/// - **Resource Errors**: Requested transaction not found
/// - **Internal Errors**: Anything unexpected (including handler panics)
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    /// The String contains details about what was invalid.
    #[error("{0}")]
    InvalidRequest(String),

    /// No live OTP exists for the identifier.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("OTP not found or expired")]
    OtpNotFound,

    /// The OTP outlived its expiry. The record has been discarded.
    #[error("OTP expired")]
    OtpExpired,

    /// The attempt ceiling was reached. The record has been discarded.
    #[error("Too many attempts")]
    TooManyAttempts,

    /// Submitted code does not match. The record stays live.
    #[error("Invalid OTP")]
    InvalidOtp,

    /// Transaction is neither tracked nor historical.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("Transaction not found")]
    TransactionNotFound,

    /// Unexpected failure.
    ///
    /// Returns HTTP 500 with the failure's message.
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_)
            | AppError::OtpExpired
            | AppError::TooManyAttempts
            | AppError::InvalidOtp => StatusCode::BAD_REQUEST,
            AppError::OtpNotFound | AppError::TransactionNotFound => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Convert AppError into an HTTP response.
///
/// All errors return JSON in this format:
/// ```json
/// { "error": "Human-readable error message" }
/// ```
///
/// # Status Code Mapping
///
/// - `InvalidRequest`, `OtpExpired`, `TooManyAttempts`, `InvalidOtp` → 400 Bad Request
/// - `OtpNotFound`, `TransactionNotFound` → 404 Not Found
/// - `Internal` → 500 Internal Server Error
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if let AppError::Internal(ref msg) = self {
            tracing::error!("Internal error: {}", msg);
        }

        let body = Json(json!({ "error": self.to_string() }));

        (status, body).into_response()
    }
}

/// Undecodable JSON bodies are a validation failure, not axum's default 422.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

/// Turn a caught handler panic into a 500 response.
///
/// Installed through `tower_http::catch_panic::CatchPanicLayer::custom`.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic message".to_string()
    };

    AppError::Internal(message).into_response()
}
