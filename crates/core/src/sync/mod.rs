//! Background ingestion: price and instrument sync jobs with observable status.

mod instrument_sync;
mod price_sync;
mod sync_runner;
mod sync_status;

pub use instrument_sync::{profile_to_instrument, InstrumentSyncJob};
pub use price_sync::{bar_to_price_point, PriceSyncJob};
pub use sync_runner::{SyncHandle, SyncJob, SyncKind, SyncReport, SyncRunner};
pub use sync_status::{SyncError, SyncStatus, SyncStatusSnapshot, SyncStatusTracker};
