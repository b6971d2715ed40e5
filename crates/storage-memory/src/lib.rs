//! In-process storage implementation for the portfolio ledger.
//!
//! Every repository keeps its records behind a `RwLock`. Nothing is persisted;
//! the store lives as long as the process. Useful for tests, demos and
//! ephemeral servers (`LEDGER_STORAGE=memory`).

mod instruments;
mod operations;
mod portfolios;
mod prices;

use std::sync::{PoisonError, RwLockReadGuard, RwLockWriteGuard};

use folioledger_core::errors::{DatabaseError, Error};

pub use instruments::InMemoryInstrumentRepository;
pub use operations::InMemoryOperationRepository;
pub use portfolios::InMemoryPortfolioRepository;
pub use prices::InMemoryPriceRepository;

pub(crate) fn poisoned<T>(_: PoisonError<T>) -> Error {
    Error::Database(DatabaseError::Internal(
        "in-memory store lock poisoned".to_string(),
    ))
}

pub(crate) type ReadResult<'a, T> = folioledger_core::Result<RwLockReadGuard<'a, T>>;
pub(crate) type WriteResult<'a, T> = folioledger_core::Result<RwLockWriteGuard<'a, T>>;
