//! Failures of ledger operations.

use fintrack_core::DomainError;
use thiserror::Error;

/// A failed ledger operation.
///
/// Every variant carries the human-readable message that ends up in the
/// store's `error` slot; [`LedgerError::message`] returns it verbatim.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The request never produced a response (refused, DNS, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// The payload was rejected, either locally or by the API (400/422).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The API reported that the record does not exist (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other non-success response.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// A success response whose body could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// A message set from outside the store.
    #[error("{0}")]
    Unknown(String),
}

impl LedgerError {
    /// Classify a non-success HTTP status.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            400 | 422 => Self::Validation(message),
            404 => Self::NotFound(message),
            _ => Self::Api { status, message },
        }
    }

    /// The provider's message, without classification prefixes.
    pub fn message(&self) -> &str {
        match self {
            Self::Network(m)
            | Self::Validation(m)
            | Self::NotFound(m)
            | Self::Parse(m)
            | Self::Unknown(m) => m,
            Self::Api { message, .. } => message,
        }
    }

    /// HTTP status of the failing response, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::NotFound(_) => Some(404),
            _ => None,
        }
    }
}

impl From<DomainError> for LedgerError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => Self::Validation(msg),
            other => Self::Validation(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for LedgerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}
