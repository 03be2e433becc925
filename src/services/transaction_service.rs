//! Transaction service - the in-memory ledger.
//!
//! This service handles:
//! - Listing the immutable history together with tracked transfers
//! - Accepting transfers and scheduling their processing delay
//! - Cancelling scheduled transitions
//!
//! # Transfer Lifecycle
//!
//! A transfer is stored as "processing" and returned immediately. A tokio task
//! sleeps for a random delay and then flips it to "pending", once, if the
//! record is still tracked. The task's abort handle is kept beside the record
//! so the transition can be cancelled; after it fires the handle is dropped.

use std::{collections::HashMap, sync::Arc, time::Duration};

use chrono::Utc;
use rand::Rng;
use rust_decimal::Decimal;
use tokio::{sync::RwLock, task::AbortHandle};

use crate::{
    error::AppError,
    models::transaction::{Transaction, TransactionStatus, TransactionType, seed_history},
};

const PENDING_MESSAGE: &str = "Transaction pending approval";

/// Bounds of the processing delay, sampled uniformly per transfer.
#[derive(Debug, Clone, Copy)]
pub struct TransferDelay {
    pub min: Duration,
    pub max: Duration,
}

impl Default for TransferDelay {
    fn default() -> Self {
        Self {
            min: Duration::from_secs(3),
            max: Duration::from_secs(5),
        }
    }
}

impl TransferDelay {
    fn sample(&self) -> Duration {
        let min = self.min.as_millis() as u64;
        let max = (self.max.as_millis() as u64).max(min);
        Duration::from_millis(rand::rng().random_range(min..=max))
    }
}

/// A transfer plus its scheduled transition, if still armed.
#[derive(Debug)]
struct TrackedTransfer {
    transaction: Transaction,
    timer: Option<AbortHandle>,
}

type Registry = Arc<RwLock<HashMap<String, TrackedTransfer>>>;

pub struct TransactionLedger {
    history: Vec<Transaction>,
    transfers: Registry,
    delay: TransferDelay,
}

impl TransactionLedger {
    /// Ledger seeded with the fixed history.
    pub fn new(delay: TransferDelay) -> Self {
        Self::with_history(seed_history(), delay)
    }

    pub fn with_history(history: Vec<Transaction>, delay: TransferDelay) -> Self {
        Self {
            history,
            transfers: Arc::new(RwLock::new(HashMap::new())),
            delay,
        }
    }

    /// History plus every tracked transfer, newest first.
    pub async fn list(&self) -> Vec<Transaction> {
        let mut all = self.history.clone();
        all.extend(
            self.transfers
                .read()
                .await
                .values()
                .map(|tracked| tracked.transaction.clone()),
        );

        all.sort_by(|a, b| b.sort_key.total_cmp(&a.sort_key));
        all
    }

    /// Tracked transfers are consulted before the history.
    ///
    /// # Errors
    ///
    /// - `TransactionNotFound`: unknown id
    pub async fn get(&self, id: &str) -> Result<Transaction, AppError> {
        if let Some(tracked) = self.transfers.read().await.get(id) {
            return Ok(tracked.transaction.clone());
        }

        self.history
            .iter()
            .find(|txn| txn.id == id)
            .cloned()
            .ok_or(AppError::TransactionNotFound)
    }

    /// Record a debit transfer and schedule its move to "pending".
    ///
    /// # Process
    ///
    /// 1. Validate the amount is positive
    /// 2. Allocate an id unused by history and tracked transfers
    /// 3. Store the record as "processing" with the amount negated
    /// 4. Spawn the delayed transition and keep its abort handle
    ///
    /// Returns without waiting for the transition.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest`: amount is zero or negative
    pub async fn create_transfer(
        &self,
        amount: Decimal,
        to_account: Option<String>,
        description: Option<String>,
        reference: Option<String>,
    ) -> Result<Transaction, AppError> {
        if amount <= Decimal::ZERO {
            return Err(AppError::InvalidRequest("Invalid amount".to_string()));
        }

        let now = Utc::now();
        let timestamp = now.timestamp_millis() as f64 / 1000.0;
        let delay = self.delay.sample();

        let mut transfers = self.transfers.write().await;

        let id = loop {
            let candidate = generate_transaction_id();
            let taken = transfers.contains_key(&candidate)
                || self.history.iter().any(|txn| txn.id == candidate);
            if !taken {
                break candidate;
            }
        };

        let amount = -amount;
        let transaction = Transaction {
            id: id.clone(),
            date: now.format("%d %b %Y").to_string(),
            description: description
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| "Transfer".to_string()),
            reference: reference
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| id.clone()),
            amount,
            transaction_type: TransactionType::for_amount(amount),
            status: TransactionStatus::Processing,
            to_account: Some(to_account.unwrap_or_default()),
            timestamp: Some(timestamp),
            message: None,
            sort_key: timestamp,
        };

        // The task cannot touch the registry before this write guard is released.
        let timer = tokio::spawn(mark_pending_after(
            Arc::clone(&self.transfers),
            id.clone(),
            delay,
        ))
        .abort_handle();

        transfers.insert(
            id.clone(),
            TrackedTransfer {
                transaction: transaction.clone(),
                timer: Some(timer),
            },
        );

        tracing::info!(
            transaction_id = %id,
            amount = %transaction.amount,
            delay_ms = delay.as_millis() as u64,
            "Transfer accepted"
        );

        Ok(transaction)
    }

    /// Abort the scheduled transition for `id`.
    ///
    /// Returns `false` when there is no armed timer (unknown id, or the
    /// transition already happened). The record keeps its current status.
    pub async fn cancel_transition(&self, id: &str) -> bool {
        let mut transfers = self.transfers.write().await;
        let Some(timer) = transfers.get_mut(id).and_then(|tracked| tracked.timer.take()) else {
            return false;
        };

        timer.abort();
        tracing::info!(transaction_id = %id, "Transfer transition cancelled");
        true
    }

    /// Abort every armed transition. Returns how many were cancelled.
    pub async fn shutdown(&self) -> usize {
        let mut transfers = self.transfers.write().await;
        let mut cancelled = 0;
        for tracked in transfers.values_mut() {
            if let Some(timer) = tracked.timer.take() {
                timer.abort();
                cancelled += 1;
            }
        }

        if cancelled > 0 {
            tracing::info!(cancelled, "Cancelled outstanding transfer transitions");
        }
        cancelled
    }
}

/// `TXN` followed by six random digits.
fn generate_transaction_id() -> String {
    format!("TXN{}", rand::rng().random_range(100_000..=999_999u32))
}

async fn mark_pending_after(transfers: Registry, id: String, delay: Duration) {
    tokio::time::sleep(delay).await;

    let mut transfers = transfers.write().await;
    let Some(tracked) = transfers.get_mut(&id) else {
        return;
    };

    tracked.timer = None;
    if tracked.transaction.status == TransactionStatus::Processing {
        tracked.transaction.status = TransactionStatus::Pending;
        tracked.transaction.message = Some(PENDING_MESSAGE.to_string());
        tracing::info!(transaction_id = %id, "Transfer moved to pending");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> TransactionLedger {
        TransactionLedger::new(TransferDelay::default())
    }

    async fn transfer(ledger: &TransactionLedger, amount: i64) -> Result<Transaction, AppError> {
        ledger
            .create_transfer(Decimal::from(amount), Some("ACC123".to_string()), None, None)
            .await
    }

    #[tokio::test]
    async fn fresh_ledger_lists_the_seeded_history() {
        let all = ledger().list().await;
        assert_eq!(all.len(), 5);
        assert!(all.iter().all(|txn| txn.status == TransactionStatus::Completed));
        let ids: Vec<&str> = all.iter().map(|txn| txn.id.as_str()).collect();
        assert_eq!(ids, ["TXN001", "TXN002", "TXN003", "TXN004", "TXN005"]);
    }

    #[tokio::test]
    async fn transfer_is_a_processing_debit() {
        let ledger = ledger();
        let txn = transfer(&ledger, 100).await.unwrap();

        assert_eq!(txn.amount, Decimal::from(-100));
        assert_eq!(txn.transaction_type, TransactionType::Debit);
        assert_eq!(txn.status, TransactionStatus::Processing);
        assert!(txn.id.starts_with("TXN"));
        assert_eq!(txn.id.len(), 9);
        assert_eq!(txn.reference, txn.id);
        assert_eq!(txn.description, "Transfer");
        assert_eq!(txn.to_account.as_deref(), Some("ACC123"));
        assert!(txn.timestamp.is_some());
    }

    #[tokio::test]
    async fn non_positive_amounts_are_rejected() {
        let ledger = ledger();
        assert!(matches!(
            transfer(&ledger, 0).await,
            Err(AppError::InvalidRequest(_))
        ));
        assert!(matches!(
            transfer(&ledger, -5).await,
            Err(AppError::InvalidRequest(_))
        ));
        assert_eq!(ledger.list().await.len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn transfer_moves_to_pending_after_delay() {
        let ledger = ledger();
        let txn = transfer(&ledger, 100).await.unwrap();

        tokio::time::sleep(Duration::from_millis(2_900)).await;
        assert_eq!(
            ledger.get(&txn.id).await.unwrap().status,
            TransactionStatus::Processing
        );

        tokio::time::sleep(Duration::from_millis(2_200)).await;
        let polled = ledger.get(&txn.id).await.unwrap();
        assert_eq!(polled.status, TransactionStatus::Pending);
        assert_eq!(polled.message.as_deref(), Some(PENDING_MESSAGE));
        assert_eq!(polled.amount, Decimal::from(-100));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_transition_never_fires() {
        let ledger = ledger();
        let txn = transfer(&ledger, 10).await.unwrap();

        assert!(ledger.cancel_transition(&txn.id).await);
        assert!(!ledger.cancel_transition(&txn.id).await);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(
            ledger.get(&txn.id).await.unwrap().status,
            TransactionStatus::Processing
        );
    }

    #[tokio::test(start_paused = true)]
    async fn fired_transition_cannot_be_cancelled() {
        let ledger = ledger();
        let txn = transfer(&ledger, 10).await.unwrap();

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert!(!ledger.cancel_transition(&txn.id).await);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_every_armed_timer() {
        let ledger = ledger();
        transfer(&ledger, 10).await.unwrap();
        transfer(&ledger, 20).await.unwrap();

        assert_eq!(ledger.shutdown().await, 2);
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(
            ledger
                .list()
                .await
                .iter()
                .all(|txn| txn.status != TransactionStatus::Pending)
        );
    }

    #[tokio::test]
    async fn new_transfers_list_before_history() {
        let ledger = ledger();
        let txn = transfer(&ledger, 100).await.unwrap();

        let all = ledger.list().await;
        assert_eq!(all.len(), 6);
        assert_eq!(all[0].id, txn.id);
    }

    #[tokio::test]
    async fn lookup_falls_back_to_history() {
        let ledger = ledger();
        assert_eq!(ledger.get("TXN004").await.unwrap().description, "Investment Transfer");
        assert!(matches!(
            ledger.get("TXN999999").await,
            Err(AppError::TransactionNotFound)
        ));
    }

    #[tokio::test]
    async fn explicit_fields_are_kept() {
        let ledger = ledger();
        let txn = ledger
            .create_transfer(
                Decimal::new(2550, 2),
                None,
                Some("Rent".to_string()),
                Some("RENT-FEB".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(txn.amount, Decimal::new(-2550, 2));
        assert_eq!(txn.description, "Rent");
        assert_eq!(txn.reference, "RENT-FEB");
        assert_eq!(txn.to_account.as_deref(), Some(""));
    }
}
