//! OTP service - issuance and verification of one-time passwords.
//!
//! This service handles:
//! - Code generation and per-identifier storage
//! - Expiry and attempt-ceiling enforcement
//! - Single-use consumption on successful verification
//!
//! # State Machine
//!
//! ```text
//! Issued ──match──────────▶ Verified   (record removed)
//!    │  ──past expiry─────▶ Expired    (record removed)
//!    │  ──ceiling reached─▶ Exhausted  (record removed)
//!    └─ ──mismatch────────▶ Issued     (attempts + 1)
//! ```
//!
//! All records live behind one async mutex, so concurrent requests for the
//! same identifier are serialized.

use std::{collections::HashMap, sync::Arc, time::Duration};

use rand::Rng;
use tokio::{sync::Mutex, task::JoinHandle, time::Instant};

use crate::{
    clock::Clock, error::AppError, models::otp::OtpRecord, services::email_service::EmailSender,
};

/// Issuance and verification limits.
#[derive(Debug, Clone)]
pub struct OtpPolicy {
    /// Lifetime of an issued code
    pub ttl: chrono::Duration,

    /// Failed verifications allowed before the code is discarded
    pub max_attempts: u32,

    /// Echo the code back to the caller (testing only, insecure)
    pub expose_code: bool,
}

impl Default for OtpPolicy {
    fn default() -> Self {
        Self {
            ttl: chrono::Duration::minutes(5),
            max_attempts: 3,
            expose_code: true,
        }
    }
}

pub struct OtpService {
    records: Mutex<HashMap<String, OtpRecord>>,
    policy: OtpPolicy,
    mailer: Arc<dyn EmailSender>,
    clock: Arc<dyn Clock>,
}

impl OtpService {
    pub fn new(policy: OtpPolicy, mailer: Arc<dyn EmailSender>, clock: Arc<dyn Clock>) -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            policy,
            mailer,
            clock,
        }
    }

    pub fn policy(&self) -> &OtpPolicy {
        &self.policy
    }

    /// Issue a fresh code for `identifier`, replacing any live one.
    ///
    /// # Process
    ///
    /// 1. Generate a 6-digit code
    /// 2. Store it with expiry = now + TTL and zero attempts
    /// 3. Hand it to the email sender (failure is logged, not returned)
    ///
    /// # Errors
    ///
    /// - `InvalidRequest`: identifier is empty
    pub async fn issue(&self, identifier: &str) -> Result<String, AppError> {
        if identifier.is_empty() {
            return Err(AppError::InvalidRequest(
                "Email or customer number required".to_string(),
            ));
        }

        let code = generate_code();
        let expires_at = self.clock.now() + self.policy.ttl;

        self.records
            .lock()
            .await
            .insert(identifier.to_string(), OtpRecord::new(code.clone(), expires_at));

        if !self.mailer.send(identifier, &code) {
            tracing::warn!(identifier, "OTP notification was not accepted by the sender");
        }

        tracing::info!(identifier, %expires_at, "OTP issued");
        Ok(code)
    }

    /// Check `submitted` against the live code for `identifier`.
    ///
    /// Checks run in a fixed order, each one terminal:
    /// expiry, then attempt ceiling, then code comparison.
    ///
    /// # Errors
    ///
    /// - `OtpNotFound`: no live code for the identifier
    /// - `OtpExpired`: code outlived its TTL (record removed)
    /// - `TooManyAttempts`: ceiling reached (record removed)
    /// - `InvalidOtp`: mismatch below the ceiling (record kept)
    pub async fn verify(&self, identifier: &str, submitted: &str) -> Result<(), AppError> {
        let mut records = self.records.lock().await;
        let now = self.clock.now();

        let Some(record) = records.get_mut(identifier) else {
            return Err(AppError::OtpNotFound);
        };

        if record.is_expired(now) {
            records.remove(identifier);
            tracing::info!(identifier, "OTP expired");
            return Err(AppError::OtpExpired);
        }

        if record.attempts >= self.policy.max_attempts {
            records.remove(identifier);
            tracing::warn!(identifier, "OTP discarded after too many attempts");
            return Err(AppError::TooManyAttempts);
        }

        if record.code == submitted {
            records.remove(identifier);
            tracing::info!(identifier, "OTP verified");
            return Ok(());
        }

        record.attempts += 1;
        let attempts = record.attempts;

        // The failure that reaches the ceiling is reported as exhaustion.
        if attempts >= self.policy.max_attempts {
            records.remove(identifier);
            tracing::warn!(identifier, attempts, "OTP discarded after too many attempts");
            return Err(AppError::TooManyAttempts);
        }

        tracing::info!(identifier, attempts, "Invalid OTP attempt");
        Err(AppError::InvalidOtp)
    }

    /// Drop every expired record. Returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|_, record| !record.is_expired(now));
        before - records.len()
    }

    /// Number of identifiers holding a live record.
    pub async fn live_count(&self) -> usize {
        self.records.lock().await.len()
    }
}

/// Uniform over 100000..=999999.
fn generate_code() -> String {
    rand::rng().random_range(100_000..=999_999u32).to_string()
}

/// Spawn a background task that purges expired OTPs every `interval`.
pub fn spawn_expiry_sweeper(service: Arc<OtpService>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
        loop {
            ticker.tick().await;
            let purged = service.purge_expired().await;
            if purged > 0 {
                tracing::debug!(purged, "Purged expired OTPs");
            }
        }
    })
}
