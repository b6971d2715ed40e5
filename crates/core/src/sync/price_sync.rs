//! Daily price ingestion for every instrument in the directory.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use folioledger_market_data::{MarketDataError, MarketDataProvider, PriceBar, RetryClass};
use log::{debug, warn};
use num_traits::ToPrimitive;

use super::sync_runner::{SyncJob, SyncKind, SyncReport};
use super::sync_status::SyncError;
use crate::constants::PRICE_BACKFILL_DAYS;
use crate::instruments::{Instrument, InstrumentRepositoryTrait};
use crate::operations::InstrumentId;
use crate::prices::{PricePoint, PriceRepositoryTrait};
use crate::Result;

/// Calls `f`, retrying once after the provider's backoff on a transient error.
pub(crate) async fn with_backoff<T, F, Fut>(
    provider: &dyn MarketDataProvider,
    mut f: F,
) -> std::result::Result<T, MarketDataError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, MarketDataError>>,
{
    match f().await {
        Err(e) if e.retry_class() == RetryClass::WithBackoff => {
            let backoff = provider.rate_limit().backoff;
            debug!("{} answered {}, retrying in {:?}", provider.id(), e, backoff);
            tokio::time::sleep(backoff).await;
            f().await
        }
        other => other,
    }
}

pub fn bar_to_price_point(instrument_id: &InstrumentId, bar: &PriceBar, source: &str) -> PricePoint {
    PricePoint::new(
        instrument_id.clone(),
        bar.date.and_time(NaiveTime::MIN).and_utc(),
        bar.close,
        bar.volume.trunc().to_i64().unwrap_or_default(),
        source,
    )
}

/// Fetches missing daily bars and stores them keyed by instrument id.
pub struct PriceSyncJob {
    instrument_repository: Arc<dyn InstrumentRepositoryTrait>,
    price_repository: Arc<dyn PriceRepositoryTrait>,
    provider: Arc<dyn MarketDataProvider>,
}

impl PriceSyncJob {
    pub fn new(
        instrument_repository: Arc<dyn InstrumentRepositoryTrait>,
        price_repository: Arc<dyn PriceRepositoryTrait>,
        provider: Arc<dyn MarketDataProvider>,
    ) -> Self {
        Self {
            instrument_repository,
            price_repository,
            provider,
        }
    }

    /// First day to request: the day after the latest stored point, or the
    /// start of the backfill period.
    fn start_date(&self, instrument_id: &InstrumentId, today: NaiveDate) -> Result<NaiveDate> {
        Ok(match self.price_repository.latest_price(instrument_id)? {
            Some(latest) => latest.date() + Duration::days(1),
            None => today - Duration::days(PRICE_BACKFILL_DAYS),
        })
    }

    async fn sync_instrument(
        &self,
        instrument: &Instrument,
        ticker: &str,
        today: NaiveDate,
        report: &mut SyncReport,
    ) -> Result<()> {
        let start = self.start_date(&instrument.id, today)?;
        if start > today {
            debug!("Prices for {} are up to date", instrument.id);
            report.skipped += 1;
            return Ok(());
        }

        let provider = self.provider.as_ref();
        let bars = match with_backoff(provider, || {
            provider.get_historical_prices(ticker, start, today)
        })
        .await
        {
            Ok(bars) => bars,
            Err(MarketDataError::NoDataForRange) => {
                report.skipped += 1;
                return Ok(());
            }
            Err(e) => {
                warn!("Failed to fetch prices for {} ({}): {}", instrument.id, ticker, e);
                report.record_failure(instrument.id.as_str(), e);
                return Ok(());
            }
        };

        let points: Vec<PricePoint> = bars
            .iter()
            .map(|bar| bar_to_price_point(&instrument.id, bar, provider.id()))
            .collect();
        if points.is_empty() {
            report.skipped += 1;
            return Ok(());
        }
        report.stored += self.price_repository.upsert_prices(points).await?;
        Ok(())
    }
}

#[async_trait]
impl SyncJob for PriceSyncJob {
    fn kind(&self) -> SyncKind {
        SyncKind::Prices
    }

    async fn run(&self) -> Result<SyncReport> {
        let mut report = SyncReport::default();
        if !self.provider.capabilities().supports_historical {
            warn!("{} does not serve historical prices", self.provider.id());
            return Ok(report);
        }
        let today = Utc::now().date_naive();
        let pacing = self.provider.rate_limit().pacing();

        for instrument in self.instrument_repository.list_instruments()? {
            if instrument.id.is_cash() {
                continue;
            }
            let Some(ticker) = instrument.ticker.clone() else {
                debug!("Skipping {}: no ticker in directory", instrument.id);
                continue;
            };
            report.processed += 1;
            self.sync_instrument(&instrument, &ticker, today, &mut report)
                .await?;
            tokio::time::sleep(pacing).await;
        }

        if report.failed > 0 && report.failed == report.processed {
            return Err(SyncError::AllFailed {
                kind: SyncKind::Prices,
                failed: report.failed,
            }
            .into());
        }
        Ok(report)
    }
}
