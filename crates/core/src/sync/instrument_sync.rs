//! Fills the instrument directory for instruments seen in operations.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use folioledger_market_data::{InstrumentProfile, MarketDataError, MarketDataProvider};
use log::{debug, warn};

use super::price_sync::with_backoff;
use super::sync_runner::{SyncJob, SyncKind, SyncReport};
use super::sync_status::SyncError;
use crate::instruments::{Instrument, InstrumentRepositoryTrait};
use crate::operations::{InstrumentId, InstrumentKind, OperationRepositoryTrait};
use crate::Result;

pub fn profile_to_instrument(id: &InstrumentId, profile: InstrumentProfile) -> Instrument {
    let figi = (id.kind() == InstrumentKind::Figi).then(|| id.to_string());
    Instrument {
        id: id.clone(),
        ticker: Some(profile.ticker),
        isin: profile.isin,
        figi,
        name: profile.name,
        currency: None,
        updated_at: Utc::now(),
    }
}

/// Looks up directory entries for operation instruments that have none.
pub struct InstrumentSyncJob {
    operation_repository: Arc<dyn OperationRepositoryTrait>,
    instrument_repository: Arc<dyn InstrumentRepositoryTrait>,
    provider: Arc<dyn MarketDataProvider>,
}

impl InstrumentSyncJob {
    pub fn new(
        operation_repository: Arc<dyn OperationRepositoryTrait>,
        instrument_repository: Arc<dyn InstrumentRepositoryTrait>,
        provider: Arc<dyn MarketDataProvider>,
    ) -> Self {
        Self {
            operation_repository,
            instrument_repository,
            provider,
        }
    }

    fn missing_instruments(&self) -> Result<Vec<InstrumentId>> {
        let mut missing = Vec::new();
        for id in self.operation_repository.list_instrument_ids()? {
            if id.is_cash() {
                continue;
            }
            if self.instrument_repository.get_instrument(&id)?.is_none() {
                missing.push(id);
            }
        }
        Ok(missing)
    }
}

#[async_trait]
impl SyncJob for InstrumentSyncJob {
    fn kind(&self) -> SyncKind {
        SyncKind::Instruments
    }

    async fn run(&self) -> Result<SyncReport> {
        let provider = self.provider.as_ref();
        let mut report = SyncReport::default();
        if !provider.capabilities().supports_search {
            warn!("{} does not support instrument search", provider.id());
            return Ok(report);
        }
        let pacing = provider.rate_limit().pacing();

        for id in self.missing_instruments()? {
            report.processed += 1;
            let query = id.as_str();
            match with_backoff(provider, || provider.find_instrument(query)).await {
                Ok(profile) => {
                    debug!("Resolved {} to ticker {}", id, profile.ticker);
                    self.instrument_repository
                        .upsert_instrument(profile_to_instrument(&id, profile))
                        .await?;
                    report.stored += 1;
                }
                Err(MarketDataError::SymbolNotFound(_)) => {
                    debug!("{} is not listed on {}", id, provider.id());
                    report.skipped += 1;
                }
                Err(e) => {
                    warn!("Failed to look up instrument {}: {}", id, e);
                    report.record_failure(id.as_str(), e);
                }
            }
            tokio::time::sleep(pacing).await;
        }

        if report.failed > 0 && report.failed == report.processed {
            return Err(SyncError::AllFailed {
                kind: SyncKind::Instruments,
                failed: report.failed,
            }
            .into());
        }
        Ok(report)
    }
}
