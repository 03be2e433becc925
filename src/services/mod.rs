//! Business logic services.
//!
//! Services own the in-memory state and the rules applied to it,
//! separated from HTTP handlers.

pub mod email_service;
pub mod otp_service;
pub mod transaction_service;
