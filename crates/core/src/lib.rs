//! `fintrack-core`: ledger domain building blocks.
//!
//! This crate contains **pure domain** types and queries (no IO): the
//! transaction model shared by incomes and expenses, and the aggregate
//! queries (totals, balance, recent history) computed over them.

pub mod error;
pub mod id;
pub mod summary;
pub mod transaction;

pub use error::{DomainError, DomainResult};
pub use id::TransactionId;
pub use summary::{HISTORY_LIMIT, balance, history, total};
pub use transaction::{NewTransaction, Transaction, TransactionKind};
