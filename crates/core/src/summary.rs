//! Aggregate queries over the in-memory collections.
//!
//! All functions are pure and recompute from scratch on every call; the
//! collections are small and replaced wholesale on each fetch, so nothing is
//! cached or maintained incrementally.

use crate::transaction::Transaction;

/// Number of entries returned by the recent-history view.
pub const HISTORY_LIMIT: usize = 3;

/// Sum of `amount` over `items` (0 for an empty slice).
pub fn total(items: &[Transaction]) -> f64 {
    items.iter().fold(0.0, |acc, tx| acc + tx.amount)
}

/// `total(incomes) - total(expenses)`.
pub fn balance(incomes: &[Transaction], expenses: &[Transaction]) -> f64 {
    total(incomes) - total(expenses)
}

/// Most recent transactions first, at most `limit` of them.
///
/// Incomes are concatenated before expenses and the sort is stable, so records
/// sharing a `created_at` keep that relative order.
pub fn history(incomes: &[Transaction], expenses: &[Transaction], limit: usize) -> Vec<Transaction> {
    let mut all: Vec<&Transaction> = incomes.iter().chain(expenses.iter()).collect();
    all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    all.into_iter().take(limit).cloned().collect()
}
