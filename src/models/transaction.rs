//! Transaction data models and API request/response types.
//!
//! This module defines:
//! - `Transaction`: A ledger entry, historical or newly transferred
//! - `TransferRequest`: Request body for creating transfers
//! - Response bodies returned to clients
//! - The fixed historical seed list

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of money movement. Always agrees with the sign of `amount`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Credit,
    Debit,
}

impl TransactionType {
    pub fn for_amount(amount: Decimal) -> Self {
        if amount.is_sign_negative() {
            TransactionType::Debit
        } else {
            TransactionType::Credit
        }
    }
}

/// Lifecycle status.
///
/// - "completed": Historical entries only
/// - "processing": A transfer that was just accepted
/// - "pending": A transfer whose processing delay has elapsed
///
/// Nothing in this system moves a transfer to "completed".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Completed,
    Processing,
    Pending,
}

/// A ledger entry.
///
/// # Amount Storage
///
/// Amounts are `Decimal` to avoid floating-point drift and are serialized as
/// JSON numbers. Positive amounts are credits, negative amounts are debits.
#[derive(Debug, Clone, Serialize)]
pub struct Transaction {
    /// Fixed for historical entries (`TXN001`..), `TXN` + 6 random digits for transfers
    pub id: String,

    /// Display date, e.g. "15 Jan 2025"
    pub date: String,

    pub description: String,

    pub reference: String,

    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,

    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    pub status: TransactionStatus,

    /// Destination account, transfers only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_account: Option<String>,

    /// Creation time in Unix seconds, transfers only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,

    /// Set when a transfer leaves "processing"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Descending sort key for listings.
    ///
    /// Transfers use their `timestamp`. Historical entries use the Unix time
    /// of their display date at midnight UTC, which keeps them in seed order
    /// and older than anything created at runtime.
    #[serde(skip)]
    pub sort_key: f64,
}

impl Transaction {
    fn historical(
        id: &str,
        date: &str,
        description: &str,
        reference: &str,
        amount: Decimal,
        sort_key: i64,
    ) -> Self {
        Self {
            id: id.to_string(),
            date: date.to_string(),
            description: description.to_string(),
            reference: reference.to_string(),
            amount,
            transaction_type: TransactionType::for_amount(amount),
            status: TransactionStatus::Completed,
            to_account: None,
            timestamp: None,
            message: None,
            sort_key: sort_key as f64,
        }
    }
}

/// The immutable history present at startup, newest first.
pub fn seed_history() -> Vec<Transaction> {
    vec![
        Transaction::historical(
            "TXN001",
            "15 Jan 2025",
            "Dividend Payment",
            "DIV-2025-001",
            Decimal::new(1_245_000, 2),
            1_736_899_200,
        ),
        Transaction::historical(
            "TXN002",
            "12 Jan 2025",
            "Property Rental Income",
            "RENT-JAN-2025",
            Decimal::new(320_000, 2),
            1_736_640_000,
        ),
        Transaction::historical(
            "TXN003",
            "10 Jan 2025",
            "Trustee Fee Payment",
            "FEE-2025-01",
            Decimal::new(-150_000, 2),
            1_736_467_200,
        ),
        Transaction::historical(
            "TXN004",
            "8 Jan 2025",
            "Investment Transfer",
            "INV-2025-045",
            Decimal::new(-2_500_000, 2),
            1_736_294_400,
        ),
        Transaction::historical(
            "TXN005",
            "5 Jan 2025",
            "Beneficiary Payment",
            "BEN-2025-003",
            Decimal::new(-500_000, 2),
            1_736_035_200,
        ),
    ]
}

/// Request to transfer money out of the account.
///
/// # JSON Example
///
/// ```json
/// {
///   "amount": 250.00,
///   "toAccount": "ACC123",
///   "description": "Rent",
///   "reference": "RENT-FEB"
/// }
/// ```
///
/// `amount` may also be sent as a numeric string. Everything is optional at
/// the wire level; a missing amount is rejected as invalid.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub amount: Option<Decimal>,
    pub to_account: Option<String>,
    pub description: Option<String>,
    pub reference: Option<String>,
}

/// Response for `GET /api/transactions`.
#[derive(Debug, Serialize)]
pub struct TransactionListResponse {
    pub success: bool,
    pub transactions: Vec<Transaction>,
}

/// Response for `GET /api/transaction/{id}`.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub success: bool,
    pub transaction: Transaction,
}

/// Response for `POST /api/transfer`.
#[derive(Debug, Serialize)]
pub struct TransferResponse {
    pub success: bool,
    pub transaction: Transaction,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_types_follow_amount_sign() {
        for txn in seed_history() {
            let expected = if txn.amount.is_sign_negative() {
                TransactionType::Debit
            } else {
                TransactionType::Credit
            };
            assert_eq!(txn.transaction_type, expected, "{}", txn.id);
            assert_eq!(txn.status, TransactionStatus::Completed);
        }
    }

    #[test]
    fn seed_sort_keys_strictly_decrease() {
        let history = seed_history();
        for pair in history.windows(2) {
            assert!(pair[0].sort_key > pair[1].sort_key);
        }
    }

    #[test]
    fn historical_entry_serializes_without_transfer_fields() {
        let json = serde_json::to_value(&seed_history()[2]).unwrap();
        assert_eq!(json["type"], "debit");
        assert_eq!(json["status"], "completed");
        assert_eq!(json["amount"], -1500.0);
        assert!(json.get("timestamp").is_none());
        assert!(json.get("sort_key").is_none());
        assert!(json.get("to_account").is_none());
    }

    #[test]
    fn transfer_request_accepts_string_amount() {
        let request: TransferRequest =
            serde_json::from_str(r#"{"amount": "12.50", "toAccount": "ACC1"}"#).unwrap();
        assert_eq!(request.amount, Some(Decimal::new(1250, 2)));
        assert_eq!(request.to_account.as_deref(), Some("ACC1"));
    }
}
