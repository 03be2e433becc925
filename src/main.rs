//! OTP + Transaction Ledger Services - Main Application Entry Point
//!
//! Hosts two independent REST services in one process, each on its own port:
//! one-time password issuance/verification and a mock transaction ledger.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Storage**: In-memory registries owned by each service
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Build the OTP service and start its expiry sweeper
//! 3. Build the transaction ledger
//! 4. Bind both listeners and serve until Ctrl-C
//! 5. Cancel outstanding transfer timers and stop the sweeper

use std::sync::Arc;

use otp_ledger_web_server::{
    clock::SystemClock,
    config::Config,
    routes,
    services::{
        email_service::LogEmailSender,
        otp_service::{self, OtpPolicy, OtpService},
        transaction_service::{TransactionLedger, TransferDelay},
    },
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    let policy = OtpPolicy {
        ttl: chrono::Duration::from_std(config.otp_ttl())?,
        max_attempts: config.otp_max_attempts,
        expose_code: config.expose_otp_in_response,
    };
    if policy.expose_code {
        tracing::warn!("EXPOSE_OTP_IN_RESPONSE is enabled; codes are returned to callers");
    }

    let otp = Arc::new(OtpService::new(
        policy,
        Arc::new(LogEmailSender),
        Arc::new(SystemClock),
    ));
    let sweeper = config
        .otp_sweep_interval()
        .map(|interval| otp_service::spawn_expiry_sweeper(Arc::clone(&otp), interval));

    let (min, max) = config.transfer_delay();
    let ledger = Arc::new(TransactionLedger::new(TransferDelay { min, max }));

    let otp_addr = format!("{}:{}", config.bind_address, config.otp_port);
    let otp_listener = tokio::net::TcpListener::bind(&otp_addr).await?;
    tracing::info!("OTP service listening on {}", otp_addr);

    let transaction_addr = format!("{}:{}", config.bind_address, config.transaction_port);
    let transaction_listener = tokio::net::TcpListener::bind(&transaction_addr).await?;
    tracing::info!("Transaction service listening on {}", transaction_addr);

    let otp_server = async {
        axum::serve(otp_listener, routes::otp_router(otp))
            .with_graceful_shutdown(shutdown_signal())
            .await
    };
    let transaction_server = async {
        axum::serve(
            transaction_listener,
            routes::transaction_router(Arc::clone(&ledger)),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
    };

    tokio::try_join!(otp_server, transaction_server)?;

    ledger.shutdown().await;
    if let Some(sweeper) = sweeper {
        sweeper.abort();
    }
    tracing::info!("Shutdown complete");

    Ok(())
}

/// Resolves on Ctrl-C. Each server awaits its own copy.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
