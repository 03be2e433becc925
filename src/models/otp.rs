//! OTP data models and API request/response types.
//!
//! This module defines:
//! - `OtpRecord`: In-memory entry for one identifier's live code
//! - Request bodies for issuing and verifying codes
//! - Response bodies returned to clients

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A live one-time password for a single identifier.
///
/// At most one record exists per identifier; issuing again replaces it.
#[derive(Debug, Clone)]
pub struct OtpRecord {
    /// 6-digit numeric code
    pub code: String,

    /// Absolute expiry (issuance time + TTL)
    pub expires_at: DateTime<Utc>,

    /// Failed verifications so far
    pub attempts: u32,
}

impl OtpRecord {
    pub fn new(code: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            code,
            expires_at,
            attempts: 0,
        }
    }

    /// Expired only once `now` is strictly past `expires_at`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Request body for `POST /api/send-otp`.
///
/// # JSON Example
///
/// ```json
/// { "email": "jane@example.com" }
/// ```
///
/// or
///
/// ```json
/// { "customerNumber": "CUST-0042" }
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpRequest {
    pub email: Option<String>,
    pub customer_number: Option<String>,
}

impl SendOtpRequest {
    /// `email` wins when non-empty, otherwise `customerNumber`.
    pub fn identifier(&self) -> Option<&str> {
        resolve_identifier(self.email.as_deref(), self.customer_number.as_deref())
    }
}

/// Request body for `POST /api/verify-otp`.
///
/// # JSON Example
///
/// ```json
/// { "email": "jane@example.com", "otp": "482913" }
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    pub email: Option<String>,
    pub customer_number: Option<String>,
    pub otp: Option<String>,
}

impl VerifyOtpRequest {
    pub fn identifier(&self) -> Option<&str> {
        resolve_identifier(self.email.as_deref(), self.customer_number.as_deref())
    }

    pub fn code(&self) -> Option<&str> {
        self.otp.as_deref().filter(|code| !code.is_empty())
    }
}

fn resolve_identifier<'a>(email: Option<&'a str>, customer_number: Option<&'a str>) -> Option<&'a str> {
    email
        .filter(|value| !value.is_empty())
        .or(customer_number.filter(|value| !value.is_empty()))
}

/// Response body for a successful `send-otp`.
///
/// `otp` is only present when the server is configured to echo codes,
/// which is a testing convenience and must stay off in production.
#[derive(Debug, Serialize)]
pub struct SendOtpResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp: Option<String>,
}

/// Response body for a successful `verify-otp`.
#[derive(Debug, Serialize)]
pub struct VerifyOtpResponse {
    pub success: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_takes_precedence() {
        let request = SendOtpRequest {
            email: Some("a@b.c".to_string()),
            customer_number: Some("42".to_string()),
        };
        assert_eq!(request.identifier(), Some("a@b.c"));
    }

    #[test]
    fn empty_email_falls_back_to_customer_number() {
        let request = SendOtpRequest {
            email: Some(String::new()),
            customer_number: Some("42".to_string()),
        };
        assert_eq!(request.identifier(), Some("42"));
    }

    #[test]
    fn missing_identifier_resolves_to_none() {
        assert_eq!(SendOtpRequest::default().identifier(), None);
    }

    #[test]
    fn empty_code_is_missing() {
        let request = VerifyOtpRequest {
            email: Some("a@b.c".to_string()),
            customer_number: None,
            otp: Some(String::new()),
        };
        assert_eq!(request.code(), None);
    }
}
