//! Folioledger Core - Domain entities, services, and the ledger engine.
//!
//! This crate holds the portfolio ledger: balances, FIFO cost basis and
//! valued positions computed from a portfolio's operation log. It is
//! database-agnostic and defines repository traits that are implemented
//! by the `storage-sqlite` and `storage-memory` crates.

pub mod constants;
pub mod errors;
pub mod instruments;
pub mod ledger;
pub mod money;
pub mod operations;
pub mod portfolios;
pub mod prices;
pub mod sync;

#[cfg(test)]
pub(crate) mod test_support;

pub use ledger::{LedgerService, LedgerServiceTrait, PositionValuation};
pub use money::Money;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
