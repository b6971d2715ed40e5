//! Single-flight execution of background sync jobs.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use log::{error, info};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use super::sync_status::{SyncError, SyncStatusSnapshot, SyncStatusTracker};
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SyncKind {
    Prices,
    Instruments,
}

impl SyncKind {
    pub const ALL: [SyncKind; 2] = [SyncKind::Prices, SyncKind::Instruments];

    pub fn as_str(&self) -> &'static str {
        match self {
            SyncKind::Prices => "prices",
            SyncKind::Instruments => "instruments",
        }
    }
}

impl fmt::Display for SyncKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    /// Items the job looked at (instruments)
    pub processed: usize,
    /// Records written
    pub stored: usize,
    /// Items skipped without error, e.g. nothing new to fetch
    pub skipped: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

impl SyncReport {
    pub fn record_failure(&mut self, item: &str, message: impl fmt::Display) {
        self.failed += 1;
        self.errors.push(format!("{}: {}", item, message));
    }
}

/// A unit of background ingestion work.
#[async_trait]
pub trait SyncJob: Send + Sync {
    fn kind(&self) -> SyncKind;
    async fn run(&self) -> Result<SyncReport>;
}

/// Handle to a spawned sync run.
pub struct SyncHandle {
    kind: SyncKind,
    handle: JoinHandle<Result<SyncReport>>,
}

impl SyncHandle {
    pub fn kind(&self) -> SyncKind {
        self.kind
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the run to complete.
    pub async fn wait(self) -> Result<SyncReport> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) => Err(SyncError::TaskFailed {
                kind: self.kind,
                message: e.to_string(),
            }
            .into()),
        }
    }
}

/// Marks the tracker failed if the task ends without reporting.
struct RunGuard {
    tracker: Arc<SyncStatusTracker>,
    finished: bool,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        if !self.finished {
            self.tracker.finish_err("sync task aborted");
        }
    }
}

/// Owns one tracker per sync kind and spawns registered jobs.
pub struct SyncRunner {
    jobs: HashMap<SyncKind, Arc<dyn SyncJob>>,
    trackers: HashMap<SyncKind, Arc<SyncStatusTracker>>,
}

impl Default for SyncRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncRunner {
    pub fn new() -> Self {
        let trackers = SyncKind::ALL
            .into_iter()
            .map(|kind| (kind, Arc::new(SyncStatusTracker::new(kind))))
            .collect();
        Self {
            jobs: HashMap::new(),
            trackers,
        }
    }

    pub fn with_job(mut self, job: Arc<dyn SyncJob>) -> Self {
        self.jobs.insert(job.kind(), job);
        self
    }

    fn tracker(&self, kind: SyncKind) -> Arc<SyncStatusTracker> {
        self.trackers
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| Arc::new(SyncStatusTracker::new(kind)))
    }

    /// Starts a run of `kind` unless one is already in flight.
    ///
    /// Must be called from within a tokio runtime.
    pub fn trigger(&self, kind: SyncKind) -> Result<SyncHandle> {
        let job = self
            .jobs
            .get(&kind)
            .cloned()
            .ok_or(SyncError::NotRegistered(kind))?;
        let tracker = self.tracker(kind);
        tracker.try_begin()?;
        info!("Starting {} sync", kind);

        let handle = tokio::spawn(async move {
            let mut guard = RunGuard {
                tracker: tracker.clone(),
                finished: false,
            };
            let result = job.run().await;
            match &result {
                Ok(report) => {
                    info!(
                        "{} sync finished: {} processed, {} stored, {} failed",
                        kind, report.processed, report.stored, report.failed
                    );
                    tracker.finish_ok(report.clone());
                }
                Err(e) => {
                    error!("{} sync failed: {}", kind, e);
                    tracker.finish_err(e.to_string());
                }
            }
            guard.finished = true;
            result
        });

        Ok(SyncHandle { kind, handle })
    }

    pub fn status(&self, kind: SyncKind) -> SyncStatusSnapshot {
        self.tracker(kind).snapshot()
    }

    pub fn statuses(&self) -> Vec<SyncStatusSnapshot> {
        SyncKind::ALL
            .into_iter()
            .map(|kind| self.status(kind))
            .collect()
    }
}
