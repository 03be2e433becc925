//! Transaction HTTP handlers.
//!
//! This module implements transaction-related API endpoints:
//! - GET /api/transactions - History plus tracked transfers, newest first
//! - POST /api/transfer - Start a transfer
//! - GET /api/transaction/{id} - Poll a single transaction

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    error::AppError,
    extract::AppJson,
    models::transaction::{
        TransactionListResponse, TransactionResponse, TransferRequest, TransferResponse,
    },
    services::transaction_service::TransactionLedger,
};

/// List all transactions.
///
/// # Response (200)
///
/// ```json
/// {
///   "success": true,
///   "transactions": [
///     {
///       "id": "TXN001",
///       "date": "15 Jan 2025",
///       "description": "Dividend Payment",
///       "reference": "DIV-2025-001",
///       "amount": 12450.0,
///       "type": "credit",
///       "status": "completed"
///     }
///   ]
/// }
/// ```
pub async fn list_transactions(
    State(ledger): State<Arc<TransactionLedger>>,
) -> Json<TransactionListResponse> {
    Json(TransactionListResponse {
        success: true,
        transactions: ledger.list().await,
    })
}

/// Create a transfer.
///
/// # Request Body
///
/// ```json
/// {
///   "amount": 100,
///   "toAccount": "ACC123",
///   "description": "Rent",
///   "reference": "RENT-FEB"
/// }
/// ```
///
/// # Response (200)
///
/// The transaction comes back as "processing" with a negated amount. It turns
/// "pending" a few seconds later; poll `GET /api/transaction/{id}` to see it.
///
/// # Validation
///
/// - `amount` must be present and positive (400 otherwise)
pub async fn create_transfer(
    State(ledger): State<Arc<TransactionLedger>>,
    AppJson(request): AppJson<TransferRequest>,
) -> Result<Json<TransferResponse>, AppError> {
    let transaction = ledger
        .create_transfer(
            request.amount.unwrap_or_default(),
            request.to_account,
            request.description,
            request.reference,
        )
        .await?;

    Ok(Json(TransferResponse {
        success: true,
        transaction,
        message: "Transaction processing".to_string(),
    }))
}

/// Get a transaction by id.
///
/// Tracked transfers are checked before the history. Returns 404 if neither holds the id.
pub async fn get_transaction(
    State(ledger): State<Arc<TransactionLedger>>,
    Path(transaction_id): Path<String>,
) -> Result<Json<TransactionResponse>, AppError> {
    let transaction = ledger.get(&transaction_id).await?;

    Ok(Json(TransactionResponse {
        success: true,
        transaction,
    }))
}
