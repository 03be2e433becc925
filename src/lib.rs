//! In-memory OTP and transaction ledger services.
//!
//! Two independent HTTP services:
//!
//! - **OTP**: issues 6-digit codes per email or customer number and verifies
//!   them with expiry, an attempt ceiling and single-use semantics.
//! - **Transactions**: serves a fixed history and accepts transfers that move
//!   from "processing" to "pending" after a short random delay.
//!
//! All state is process memory and is lost on restart.

pub mod clock;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
