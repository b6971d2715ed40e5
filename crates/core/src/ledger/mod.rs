//! Ledger engine - balances, FIFO cost basis and valued positions.
//!
//! The engine types are pure and total over their input. [`LedgerService`]
//! does all repository I/O before handing snapshots to them.

mod balance_aggregator;
mod ledger_service;
mod ledger_traits;
mod lot_queue;
mod position_valuer;
mod positions_model;

#[cfg(test)]
pub(crate) mod test_fixtures;

#[cfg(test)]
mod ledger_service_tests;

pub use balance_aggregator::{signed_amount, BalanceAggregator};
pub use ledger_service::LedgerService;
pub use ledger_traits::LedgerServiceTrait;
pub use lot_queue::{FifoCostMatcher, Lot, LotQueue};
pub use position_valuer::{select_price, window_start, Holdings, PositionValuer};
pub use positions_model::PositionValuation;
