use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;

use super::prices_model::{NewPricePoint, PricePoint};
use super::prices_traits::{PriceRepositoryTrait, PriceServiceTrait};
use crate::operations::InstrumentId;
use crate::Result;

pub struct PriceService {
    repository: Arc<dyn PriceRepositoryTrait>,
}

impl PriceService {
    pub fn new(repository: Arc<dyn PriceRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl PriceServiceTrait for PriceService {
    /// Points in the range, oldest first.
    fn get_prices(
        &self,
        instrument_id: &InstrumentId,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<PricePoint>> {
        let mut prices = self.repository.get_prices(instrument_id, from, to)?;
        prices.sort_by_key(|p| p.timestamp);
        Ok(prices)
    }

    async fn save_prices(&self, prices: Vec<NewPricePoint>) -> Result<Vec<PricePoint>> {
        let points = prices
            .into_iter()
            .map(NewPricePoint::into_price_point)
            .collect::<Result<Vec<_>>>()?;
        if points.is_empty() {
            return Ok(points);
        }
        let saved = self.repository.upsert_prices(points.clone()).await?;
        debug!("Saved {} manual price points", saved);
        Ok(points)
    }
}
