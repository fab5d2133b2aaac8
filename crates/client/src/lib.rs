//! `fintrack-client`
//!
//! **Responsibility:** client-side copy of the income/expense ledger.
//!
//! This crate provides:
//! - The remote API seam ([`LedgerApi`]) and its HTTP implementation
//! - [`LedgerStore`], a shared handle over the fetched collections with
//!   derived totals and recent history
//! - Environment-driven configuration
//!
//! The API remains the authority: the store never applies writes locally and
//! re-fetches after every successful mutation.

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod store;

pub use api::{Endpoint, LedgerApi, STATUS_OK};
pub use config::{ClientConfig, ConfigError};
pub use error::LedgerError;
pub use http::HttpLedgerApi;
pub use store::{LedgerSnapshot, LedgerStore};
