//! Remote ledger API seam.
//!
//! [`LedgerApi`] is what the store talks to. The HTTP implementation lives in
//! [`crate::http`]; tests substitute in-memory fakes.

use async_trait::async_trait;
use fintrack_core::{NewTransaction, Transaction, TransactionId, TransactionKind};

use crate::error::LedgerError;

/// The only status that counts as "applied" for create and delete.
pub const STATUS_OK: u16 = 200;

/// One of the six endpoints, relative to the API base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `GET get-incomes` / `GET get-expenses`
    List(TransactionKind),
    /// `POST add-income` / `POST add-expense`
    Create(TransactionKind),
    /// `DELETE delete-income/{id}` / `DELETE delete-expense/{id}`
    Delete(TransactionKind, TransactionId),
}

impl Endpoint {
    pub fn method(&self) -> &'static str {
        match self {
            Endpoint::List(_) => "GET",
            Endpoint::Create(_) => "POST",
            Endpoint::Delete(..) => "DELETE",
        }
    }

    /// Path segments, unescaped.
    pub fn segments(&self) -> Vec<String> {
        match self {
            Endpoint::List(kind) => vec![format!("get-{}", kind.plural())],
            Endpoint::Create(kind) => vec![format!("add-{}", kind.as_str())],
            Endpoint::Delete(kind, id) => {
                vec![format!("delete-{}", kind.as_str()), id.as_str().to_string()]
            }
        }
    }

    pub fn path(&self) -> String {
        self.segments().join("/")
    }
}

/// Remote system holding the authoritative incomes and expenses.
///
/// Success is reported with the HTTP status so callers can tell a plain `200`
/// from other 2xx codes; failures are already classified.
#[async_trait]
pub trait LedgerApi: Send + Sync {
    /// Full collection of the given kind, in server order.
    async fn list(&self, kind: TransactionKind) -> Result<Vec<Transaction>, LedgerError>;

    /// Create a record through the `kind` endpoint family.
    async fn create(&self, kind: TransactionKind, data: &NewTransaction) -> Result<u16, LedgerError>;

    /// Delete a record through the `kind` endpoint family.
    async fn delete(&self, kind: TransactionKind, id: &TransactionId) -> Result<u16, LedgerError>;
}
