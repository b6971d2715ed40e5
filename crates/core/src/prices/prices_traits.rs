use super::prices_model::{NewPricePoint, PricePoint};
use crate::operations::InstrumentId;
use crate::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Storage contract for the price time series (the ledger's Price Source).
///
/// Range reads may return points in any order; callers select what they need.
#[async_trait]
pub trait PriceRepositoryTrait: Send + Sync {
    fn get_prices(
        &self,
        instrument_id: &InstrumentId,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<PricePoint>>;
    fn latest_price(&self, instrument_id: &InstrumentId) -> Result<Option<PricePoint>>;
    /// Inserts or replaces points by id.
    async fn upsert_prices(&self, prices: Vec<PricePoint>) -> Result<usize>;
}

#[async_trait]
pub trait PriceServiceTrait: Send + Sync {
    fn get_prices(
        &self,
        instrument_id: &InstrumentId,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<PricePoint>>;
    async fn save_prices(&self, prices: Vec<NewPricePoint>) -> Result<Vec<PricePoint>>;
}
