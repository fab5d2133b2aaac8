//! Transaction model shared by incomes and expenses.

use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DomainError, DomainResult};
use crate::id::TransactionId;

/// Which side of the ledger a transaction belongs to.
///
/// Determines both the collection a record is kept in and the endpoint family
/// used to list, create and delete it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    /// Collection name (`incomes` / `expenses`).
    pub fn plural(&self) -> &'static str {
        match self {
            TransactionKind::Income => "incomes",
            TransactionKind::Expense => "expenses",
        }
    }
}

impl core::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" | "incomes" => Ok(TransactionKind::Income),
            "expense" | "expenses" => Ok(TransactionKind::Expense),
            other => Err(DomainError::unknown_kind(other)),
        }
    }
}

/// A single income or expense record as returned by the remote API.
///
/// Only `id`, `amount`, `type` and `createdAt` are interpreted. Everything
/// else (title, category, description, date, ...) is carried in `details`
/// untouched so records survive a round trip through the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "WireTransaction")]
pub struct Transaction {
    pub id: TransactionId,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// Transaction as it appears on the wire: the identifier may arrive as
/// `_id`, `id`, or both (document stores that also serialise virtuals).
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireTransaction {
    #[serde(rename = "_id")]
    document_id: Option<TransactionId>,
    id: Option<TransactionId>,
    amount: f64,
    #[serde(rename = "type")]
    kind: TransactionKind,
    created_at: DateTime<Utc>,
    #[serde(flatten)]
    details: Map<String, Value>,
}

impl TryFrom<WireTransaction> for Transaction {
    type Error = DomainError;

    fn try_from(wire: WireTransaction) -> Result<Self, Self::Error> {
        let id = wire
            .document_id
            .or(wire.id)
            .ok_or_else(|| DomainError::invalid_id("transaction without `_id` or `id`"))?;
        Ok(Self {
            id,
            amount: wire.amount,
            kind: wire.kind,
            created_at: wire.created_at,
            details: wire.details,
        })
    }
}

impl Transaction {
    pub fn new(
        id: impl Into<TransactionId>,
        kind: TransactionKind,
        amount: f64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            amount,
            kind,
            created_at,
            details: Map::new(),
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details.get(key)
    }
}

/// Keys owned by the typed fields; they may not appear in `details`.
const RESERVED_KEYS: [&str; 5] = ["id", "_id", "type", "amount", "createdAt"];

/// Create payload: a transaction before the server assigns `id` and `createdAt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: f64,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl NewTransaction {
    pub fn new(kind: TransactionKind, amount: f64) -> Self {
        Self {
            kind,
            amount,
            details: Map::new(),
        }
    }

    pub fn income(amount: f64) -> Self {
        Self::new(TransactionKind::Income, amount)
    }

    pub fn expense(amount: f64) -> Self {
        Self::new(TransactionKind::Expense, amount)
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Check that the payload serialises to a well-formed body: the
    /// pass-through fields must not shadow the typed ones.
    ///
    /// Amounts are not checked here; the API owns that rule and its message.
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(key) = RESERVED_KEYS.iter().find(|k| self.details.contains_key(**k)) {
            return Err(DomainError::validation(format!(
                "detail field `{key}` is reserved"
            )));
        }
        Ok(())
    }
}
