//! The ledger store: session-scoped incomes, expenses and last error.
//!
//! State is held in a [`tokio::sync::watch`] channel, which doubles as the
//! subscription mechanism: every mutation publishes a fresh
//! [`LedgerSnapshot`] to all receivers.
//!
//! Mutations never apply locally. A successful create or delete re-fetches the
//! affected collection from the API, and any failure only updates the error
//! slot, leaving the collections as they were.

use std::sync::Arc;

use fintrack_core::{
    HISTORY_LIMIT, NewTransaction, Transaction, TransactionId, TransactionKind, summary,
};
use tokio::sync::watch;

use crate::api::{LedgerApi, STATUS_OK};
use crate::config::{ClientConfig, ConfigError};
use crate::error::LedgerError;
use crate::http::HttpLedgerApi;

/// Point-in-time copy of the store state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerSnapshot {
    /// Incomes in server response order.
    pub incomes: Vec<Transaction>,
    /// Expenses in server response order.
    pub expenses: Vec<Transaction>,
    /// Last failure; overwritten by each failing operation, never cleared by
    /// a later success.
    pub error: Option<LedgerError>,
}

impl LedgerSnapshot {
    pub fn collection(&self, kind: TransactionKind) -> &[Transaction] {
        match kind {
            TransactionKind::Income => &self.incomes,
            TransactionKind::Expense => &self.expenses,
        }
    }

    fn collection_mut(&mut self, kind: TransactionKind) -> &mut Vec<Transaction> {
        match kind {
            TransactionKind::Income => &mut self.incomes,
            TransactionKind::Expense => &mut self.expenses,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(LedgerError::message)
    }

    pub fn total_income(&self) -> f64 {
        summary::total(&self.incomes)
    }

    pub fn total_expenses(&self) -> f64 {
        summary::total(&self.expenses)
    }

    pub fn total_balance(&self) -> f64 {
        summary::balance(&self.incomes, &self.expenses)
    }

    /// The three most recent transactions across both collections.
    pub fn transaction_history(&self) -> Vec<Transaction> {
        self.history(HISTORY_LIMIT)
    }

    pub fn history(&self, limit: usize) -> Vec<Transaction> {
        summary::history(&self.incomes, &self.expenses, limit)
    }
}

/// Shared handle to the ledger state.
///
/// Cloning is cheap; all clones see and mutate the same state. Operations
/// never return failures: they land in [`LedgerStore::error`].
#[derive(Clone)]
pub struct LedgerStore {
    api: Arc<dyn LedgerApi>,
    state: Arc<watch::Sender<LedgerSnapshot>>,
}

impl core::fmt::Debug for LedgerStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LedgerStore")
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl LedgerStore {
    /// Start a session against `api` with empty collections.
    pub fn new(api: Arc<dyn LedgerApi>) -> Self {
        let (state, _) = watch::channel(LedgerSnapshot::default());
        Self {
            api,
            state: Arc::new(state),
        }
    }

    pub fn with_api(api: impl LedgerApi + 'static) -> Self {
        Self::new(Arc::new(api))
    }

    /// Start a session against the HTTP API described by `config`.
    pub fn connect(config: &ClientConfig) -> Result<Self, ConfigError> {
        let api = HttpLedgerApi::new(config)?;
        tracing::info!(base_url = %api.base_url(), "ledger session started");
        Ok(Self::with_api(api))
    }

    pub fn incomes(&self) -> Vec<Transaction> {
        self.state.borrow().incomes.clone()
    }

    pub fn expenses(&self) -> Vec<Transaction> {
        self.state.borrow().expenses.clone()
    }

    pub fn collection(&self, kind: TransactionKind) -> Vec<Transaction> {
        self.state.borrow().collection(kind).to_vec()
    }

    /// Message of the last failure, if any.
    pub fn error(&self) -> Option<String> {
        self.state.borrow().error_message().map(str::to_string)
    }

    /// The last failure with its classification.
    pub fn last_error(&self) -> Option<LedgerError> {
        self.state.borrow().error.clone()
    }

    /// Overwrite the error slot; `None` clears it.
    pub fn set_error(&self, message: Option<String>) {
        self.state
            .send_modify(|s| s.error = message.map(LedgerError::Unknown));
    }

    pub fn clear_error(&self) {
        self.set_error(None);
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        self.state.borrow().clone()
    }

    /// Receiver that observes a new snapshot after every state change.
    pub fn subscribe(&self) -> watch::Receiver<LedgerSnapshot> {
        self.state.subscribe()
    }

    pub fn total_income(&self) -> f64 {
        self.state.borrow().total_income()
    }

    pub fn total_expenses(&self) -> f64 {
        self.state.borrow().total_expenses()
    }

    pub fn total_balance(&self) -> f64 {
        self.state.borrow().total_balance()
    }

    pub fn transaction_history(&self) -> Vec<Transaction> {
        self.state.borrow().transaction_history()
    }

    pub fn history(&self, limit: usize) -> Vec<Transaction> {
        self.state.borrow().history(limit)
    }

    pub async fn fetch_incomes(&self) {
        self.fetch(TransactionKind::Income).await;
    }

    pub async fn fetch_expenses(&self) {
        self.fetch(TransactionKind::Expense).await;
    }

    /// Replace the `kind` collection with the server's current list.
    pub async fn fetch(&self, kind: TransactionKind) {
        match self.api.list(kind).await {
            Ok(items) => {
                tracing::info!(kind = kind.plural(), count = items.len(), "collection fetched");
                self.state.send_modify(|s| *s.collection_mut(kind) = items);
            }
            Err(err) => self.record_failure("fetch", kind, err),
        }
    }

    /// Fetch both collections concurrently.
    pub async fn refresh_all(&self) {
        tokio::join!(
            self.fetch(TransactionKind::Income),
            self.fetch(TransactionKind::Expense)
        );
    }

    pub async fn add_income(&self, data: NewTransaction) {
        self.add(TransactionKind::Income, data).await;
    }

    pub async fn add_expense(&self, data: NewTransaction) {
        self.add(TransactionKind::Expense, data).await;
    }

    /// Create `data` through the `endpoint` family.
    ///
    /// On `200` the collection named by `data.kind` is re-fetched before
    /// returning. Other success codes are accepted without a refresh.
    pub async fn add(&self, endpoint: TransactionKind, data: NewTransaction) {
        if let Err(err) = data.validate() {
            self.record_failure("add", endpoint, err.into());
            return;
        }

        match self.api.create(endpoint, &data).await {
            Ok(STATUS_OK) => {
                tracing::info!(kind = endpoint.as_str(), amount = data.amount, "transaction added");
                self.fetch(data.kind).await;
            }
            Ok(status) => {
                tracing::debug!(kind = endpoint.as_str(), status, "create accepted without refresh");
            }
            Err(err) => self.record_failure("add", endpoint, err),
        }
    }

    pub async fn delete_income(&self, id: &TransactionId) {
        self.delete(TransactionKind::Income, id).await;
    }

    pub async fn delete_expense(&self, id: &TransactionId) {
        self.delete(TransactionKind::Expense, id).await;
    }

    /// Delete `id`; on `200` the `kind` collection is re-fetched.
    pub async fn delete(&self, kind: TransactionKind, id: &TransactionId) {
        match self.api.delete(kind, id).await {
            Ok(STATUS_OK) => {
                tracing::info!(kind = kind.as_str(), %id, "transaction deleted");
                self.fetch(kind).await;
            }
            Ok(status) => {
                tracing::debug!(kind = kind.as_str(), %id, status, "delete accepted without refresh");
            }
            Err(err) => self.record_failure("delete", kind, err),
        }
    }

    /// End of session: drop both collections and the error.
    pub fn reset(&self) {
        self.state.send_modify(|s| *s = LedgerSnapshot::default());
        tracing::info!("ledger session reset");
    }

    fn record_failure(&self, operation: &'static str, kind: TransactionKind, err: LedgerError) {
        tracing::warn!(operation, kind = kind.as_str(), error = %err, "ledger operation failed");
        self.state.send_modify(|s| s.error = Some(err));
    }
}
