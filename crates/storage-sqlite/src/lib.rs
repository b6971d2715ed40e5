//! SQLite storage implementation for the portfolio ledger.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `folioledger-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for portfolios, operations, instruments and prices
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the workspace where Diesel dependencies exist.
//! The core crate is database-agnostic and works with traits.
//!
//! ```text
//!          core (domain, traits)
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!                  │
//!                  ▼
//!              SQLite DB
//! ```
//!
//! Reads go through an r2d2 pool; every write runs on a single writer actor.

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod instruments;
pub mod operations;
pub mod portfolios;
pub mod prices;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, open, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use instruments::InstrumentRepository;
pub use operations::OperationRepository;
pub use portfolios::PortfolioRepository;
pub use prices::PriceRepository;

// Re-export from folioledger-core for convenience
pub use folioledger_core::errors::{DatabaseError, Error, Result};
