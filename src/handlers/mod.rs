//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, etc.)
//! 2. Delegates to the owning service
//! 3. Returns HTTP response (JSON, status code)

/// Liveness endpoint shared by both routers
pub mod health;
/// OTP issuance and verification endpoints
pub mod otp;
/// Ledger listing and transfer endpoints
pub mod transactions;
