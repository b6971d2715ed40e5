//! Folioledger Market Data Crate
//!
//! Provider-agnostic market data fetching for the ledger's ingestion side.
//!
//! # Overview
//!
//! The ledger engine never talks to a market data source directly. Background
//! sync jobs in `folioledger-core` use a [`MarketDataProvider`] to pull daily
//! price bars and instrument profiles, then persist them through the price and
//! instrument repositories.
//!
//! ```text
//! +------------------+     +------------------+     +------------------+
//! |  Sync job (core) | --> | MarketDataProvider| --> |  MOEX ISS (HTTP) |
//! +------------------+     +------------------+     +------------------+
//!          |
//!          v
//!   PriceBar / InstrumentProfile
//! ```
//!
//! # Core Types
//!
//! - [`PriceBar`] - One trading day's close and volume for a ticker
//! - [`InstrumentProfile`] - Ticker, ISIN and display name of a listed instrument
//! - [`MarketDataError`] - Error type with retry classification

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::{MarketDataError, RetryClass};
pub use models::{InstrumentProfile, PriceBar};
pub use provider::moex::MoexProvider;
pub use provider::{MarketDataProvider, ProviderCapabilities, RateLimit};
