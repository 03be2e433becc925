//! OTP HTTP handlers.
//!
//! This module implements the OTP endpoints:
//! - POST /api/send-otp - Issue a code for an email or customer number
//! - POST /api/verify-otp - Check a submitted code

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    error::AppError,
    extract::AppJson,
    models::otp::{SendOtpRequest, SendOtpResponse, VerifyOtpRequest, VerifyOtpResponse},
    services::otp_service::OtpService,
};

/// Issue a one-time password.
///
/// # Request Body
///
/// ```json
/// { "email": "jane@example.com" }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: Code issued and handed to the email sender
/// - **Error (400)**: Neither `email` nor `customerNumber` given
///
/// ```json
/// {
///   "success": true,
///   "message": "OTP sent to email",
///   "otp": "482913"
/// }
/// ```
///
/// `otp` is only included when `EXPOSE_OTP_IN_RESPONSE` is enabled.
pub async fn send_otp(
    State(service): State<Arc<OtpService>>,
    AppJson(request): AppJson<SendOtpRequest>,
) -> Result<Json<SendOtpResponse>, AppError> {
    let identifier = request.identifier().ok_or_else(|| {
        AppError::InvalidRequest("Email or customer number required".to_string())
    })?;

    let code = service.issue(identifier).await?;

    Ok(Json(SendOtpResponse {
        success: true,
        message: "OTP sent to email".to_string(),
        otp: service.policy().expose_code.then_some(code),
    }))
}

/// Verify a one-time password.
///
/// # Request Body
///
/// ```json
/// { "customerNumber": "CUST-0042", "otp": "482913" }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: Code matched and was consumed
/// - **Error (400)**: Missing fields, expired, too many attempts, or wrong code
/// - **Error (404)**: No live code for the identifier
pub async fn verify_otp(
    State(service): State<Arc<OtpService>>,
    AppJson(request): AppJson<VerifyOtpRequest>,
) -> Result<Json<VerifyOtpResponse>, AppError> {
    let (Some(identifier), Some(code)) = (request.identifier(), request.code()) else {
        return Err(AppError::InvalidRequest(
            "Email and OTP required".to_string(),
        ));
    };

    service.verify(identifier, code).await?;

    Ok(Json(VerifyOtpResponse {
        success: true,
        message: "OTP verified successfully".to_string(),
    }))
}
