//! Data models for both services.
//!
//! This module contains the in-memory records and the JSON request/response bodies.

/// One-time password records and bodies
pub mod otp;
/// Ledger entries and transfer bodies
pub mod transaction;
