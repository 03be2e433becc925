//! Router construction for both services.
//!
//! Each service gets its own router and its own state; nothing is shared
//! between them. Both carry the same middleware stack:
//! request tracing, permissive CORS, and panic-to-500 conversion.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::{
    error,
    handlers,
    services::{otp_service::OtpService, transaction_service::TransactionLedger},
};

/// Router for the OTP service.
pub fn otp_router(service: Arc<OtpService>) -> Router {
    let router = Router::new()
        .route("/api/send-otp", post(handlers::otp::send_otp))
        .route("/api/verify-otp", post(handlers::otp::verify_otp))
        .route("/api/health", get(handlers::health::health_check))
        .with_state(service);

    with_middleware(router)
}

/// Router for the transaction service.
pub fn transaction_router(ledger: Arc<TransactionLedger>) -> Router {
    let router = Router::new()
        .route(
            "/api/transactions",
            get(handlers::transactions::list_transactions),
        )
        .route("/api/transfer", post(handlers::transactions::create_transfer))
        .route(
            "/api/transaction/{id}",
            get(handlers::transactions::get_transaction),
        )
        .route("/api/health", get(handlers::health::health_check))
        .with_state(ledger);

    with_middleware(router)
}

fn with_middleware(router: Router) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .layer(CatchPanicLayer::custom(error::handle_panic)),
    )
}
