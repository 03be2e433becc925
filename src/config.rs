//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use std::time::Duration;

use anyhow::ensure;
use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// All variables are optional:
///
/// - `BIND_ADDRESS`: interface for both listeners, defaults to 0.0.0.0
/// - `OTP_PORT`: OTP service port, defaults to 5000
/// - `TRANSACTION_PORT`: transaction service port, defaults to 5001
/// - `OTP_TTL_SECS`: OTP lifetime, defaults to 300
/// - `OTP_MAX_ATTEMPTS`: failed attempts before an OTP is discarded, defaults to 3
/// - `EXPOSE_OTP_IN_RESPONSE`: echo the code back from send-otp, defaults to true
/// - `OTP_SWEEP_INTERVAL_SECS`: expired-record sweep period, 0 disables, defaults to 60
/// - `TRANSFER_DELAY_MIN_MS` / `TRANSFER_DELAY_MAX_MS`: processing delay bounds, default 3000..=5000
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_otp_port")]
    pub otp_port: u16,

    #[serde(default = "default_transaction_port")]
    pub transaction_port: u16,

    #[serde(default = "default_otp_ttl_secs")]
    pub otp_ttl_secs: u64,

    #[serde(default = "default_otp_max_attempts")]
    pub otp_max_attempts: u32,

    /// Returning the code to the caller is insecure and only meant for testing.
    #[serde(default = "default_expose_otp")]
    pub expose_otp_in_response: bool,

    #[serde(default = "default_otp_sweep_interval_secs")]
    pub otp_sweep_interval_secs: u64,

    #[serde(default = "default_transfer_delay_min_ms")]
    pub transfer_delay_min_ms: u64,

    #[serde(default = "default_transfer_delay_max_ms")]
    pub transfer_delay_max_ms: u64,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_otp_port() -> u16 {
    5000
}

fn default_transaction_port() -> u16 {
    5001
}

fn default_otp_ttl_secs() -> u64 {
    300
}

fn default_otp_max_attempts() -> u32 {
    3
}

fn default_expose_otp() -> bool {
    true
}

fn default_otp_sweep_interval_secs() -> u64 {
    60
}

fn default_transfer_delay_min_ms() -> u64 {
    3000
}

fn default_transfer_delay_max_ms() -> u64 {
    5000
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Environment variable values cannot be parsed into expected types
    /// - The parsed values are inconsistent (see [`Config::validate`])
    pub fn from_env() -> anyhow::Result<Self> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Field names are automatically converted: otp_port -> OTP_PORT
        let config = envy::from_env::<Config>()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from explicit key/value pairs instead of the process environment.
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(vars)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject combinations the services cannot run with.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.otp_port != self.transaction_port,
            "OTP_PORT and TRANSACTION_PORT must differ (both {})",
            self.otp_port
        );
        ensure!(self.otp_ttl_secs > 0, "OTP_TTL_SECS must be positive");
        ensure!(self.otp_max_attempts >= 1, "OTP_MAX_ATTEMPTS must be at least 1");
        ensure!(
            self.transfer_delay_min_ms <= self.transfer_delay_max_ms,
            "TRANSFER_DELAY_MIN_MS ({}) exceeds TRANSFER_DELAY_MAX_MS ({})",
            self.transfer_delay_min_ms,
            self.transfer_delay_max_ms
        );
        Ok(())
    }

    pub fn otp_ttl(&self) -> Duration {
        Duration::from_secs(self.otp_ttl_secs)
    }

    /// `None` when the sweeper is disabled.
    pub fn otp_sweep_interval(&self) -> Option<Duration> {
        (self.otp_sweep_interval_secs > 0).then(|| Duration::from_secs(self.otp_sweep_interval_secs))
    }

    pub fn transfer_delay(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.transfer_delay_min_ms),
            Duration::from_millis(self.transfer_delay_max_ms),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_match_reference_services() {
        let config = Config::from_vars(Vec::new()).unwrap();
        assert_eq!(config.otp_port, 5000);
        assert_eq!(config.transaction_port, 5001);
        assert_eq!(config.otp_ttl(), Duration::from_secs(300));
        assert_eq!(config.otp_max_attempts, 3);
        assert!(config.expose_otp_in_response);
        assert_eq!(
            config.transfer_delay(),
            (Duration::from_secs(3), Duration::from_secs(5))
        );
    }

    #[test]
    fn overrides_are_parsed() {
        let config = Config::from_vars(vars(&[
            ("OTP_PORT", "8000"),
            ("EXPOSE_OTP_IN_RESPONSE", "false"),
            ("OTP_SWEEP_INTERVAL_SECS", "0"),
        ]))
        .unwrap();
        assert_eq!(config.otp_port, 8000);
        assert!(!config.expose_otp_in_response);
        assert_eq!(config.otp_sweep_interval(), None);
    }

    #[test]
    fn inverted_delay_bounds_are_rejected() {
        let result = Config::from_vars(vars(&[
            ("TRANSFER_DELAY_MIN_MS", "6000"),
            ("TRANSFER_DELAY_MAX_MS", "5000"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn shared_port_is_rejected() {
        let result = Config::from_vars(vars(&[("OTP_PORT", "7000"), ("TRANSACTION_PORT", "7000")]));
        assert!(result.is_err());
    }

    #[test]
    fn zero_attempts_is_rejected() {
        assert!(Config::from_vars(vars(&[("OTP_MAX_ATTEMPTS", "0")])).is_err());
    }
}
