//! Observable state of the background sync tasks.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::sync_runner::{SyncKind, SyncReport};

/// Tri-state status of one sync kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SyncStatus {
    #[default]
    Idle,
    Processing,
    Error,
}

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("{0} sync is already running")]
    AlreadyRunning(SyncKind),

    #[error("No {0} sync job is registered")]
    NotRegistered(SyncKind),

    #[error("{kind} sync task did not complete: {message}")]
    TaskFailed { kind: SyncKind, message: String },

    #[error("{kind} sync failed for all {failed} items")]
    AllFailed { kind: SyncKind, failed: usize },
}

/// Point-in-time copy of a tracker's state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatusSnapshot {
    pub kind: SyncKind,
    pub status: SyncStatus,
    pub last_started_at: Option<DateTime<Utc>>,
    pub last_finished_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub last_report: Option<SyncReport>,
}

/// Single-flight guard for one sync kind.
///
/// `Idle | Error -> Processing` happens only through [`try_begin`](Self::try_begin);
/// `Processing -> Idle | Error` only through [`finish_ok`](Self::finish_ok) or
/// [`finish_err`](Self::finish_err).
#[derive(Debug)]
pub struct SyncStatusTracker {
    state: Mutex<SyncStatusSnapshot>,
}

impl SyncStatusTracker {
    pub fn new(kind: SyncKind) -> Self {
        Self {
            state: Mutex::new(SyncStatusSnapshot {
                kind,
                status: SyncStatus::Idle,
                last_started_at: None,
                last_finished_at: None,
                last_error: None,
                last_report: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SyncStatusSnapshot> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> SyncStatusSnapshot {
        self.lock().clone()
    }

    pub fn status(&self) -> SyncStatus {
        self.lock().status
    }

    pub fn try_begin(&self) -> Result<(), SyncError> {
        let mut state = self.lock();
        if state.status == SyncStatus::Processing {
            return Err(SyncError::AlreadyRunning(state.kind));
        }
        state.status = SyncStatus::Processing;
        state.last_started_at = Some(Utc::now());
        Ok(())
    }

    pub fn finish_ok(&self, report: SyncReport) {
        let mut state = self.lock();
        state.status = SyncStatus::Idle;
        state.last_finished_at = Some(Utc::now());
        state.last_error = None;
        state.last_report = Some(report);
    }

    pub fn finish_err(&self, message: impl Into<String>) {
        let mut state = self.lock();
        state.status = SyncStatus::Error;
        state.last_finished_at = Some(Utc::now());
        state.last_error = Some(message.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_flight_transitions() {
        let tracker = SyncStatusTracker::new(SyncKind::Prices);
        assert_eq!(tracker.status(), SyncStatus::Idle);

        tracker.try_begin().unwrap();
        assert_eq!(tracker.status(), SyncStatus::Processing);
        assert!(matches!(
            tracker.try_begin(),
            Err(SyncError::AlreadyRunning(SyncKind::Prices))
        ));

        tracker.finish_err("provider down");
        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.status, SyncStatus::Error);
        assert_eq!(snapshot.last_error.as_deref(), Some("provider down"));

        tracker.try_begin().unwrap();
        tracker.finish_ok(SyncReport::default());
        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.status, SyncStatus::Idle);
        assert!(snapshot.last_error.is_none());
        assert!(snapshot.last_report.is_some());
    }
}
