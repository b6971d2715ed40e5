//! Background scheduler for periodic price sync.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::main_lib::AppState;
use folioledger_core::{
    errors::Error,
    sync::{SyncError, SyncKind},
};

/// Initial delay before the first sync so startup is not slowed by network I/O
const INITIAL_DELAY_SECS: u64 = 30;

/// Starts the periodic price sync; does nothing when `every` is `None`.
pub fn start_price_sync_scheduler(state: Arc<AppState>, every: Option<Duration>) {
    let Some(every) = every else {
        info!("Price sync scheduler disabled");
        return;
    };

    tokio::spawn(async move {
        info!("Price sync scheduler started ({}s interval)", every.as_secs());
        tokio::time::sleep(Duration::from_secs(INITIAL_DELAY_SECS)).await;

        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            run_scheduled_sync(&state).await;
        }
    });
}

/// Runs the instrument sync first so newly traded instruments get tickers,
/// then the price sync.
async fn run_scheduled_sync(state: &Arc<AppState>) {
    for kind in [SyncKind::Instruments, SyncKind::Prices] {
        let handle = match state.sync_runner.trigger(kind) {
            Ok(handle) => handle,
            Err(Error::Sync(SyncError::AlreadyRunning(_))) => {
                debug!("Scheduled {} sync skipped: already running", kind);
                continue;
            }
            Err(e) => {
                warn!("Scheduled {} sync could not start: {}", kind, e);
                continue;
            }
        };
        match handle.wait().await {
            Ok(report) => info!(
                "Scheduled {} sync completed: {} stored, {} failed",
                kind, report.stored, report.failed
            ),
            Err(e) => warn!("Scheduled {} sync failed: {}", kind, e),
        }
    }
}
