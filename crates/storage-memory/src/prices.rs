use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use folioledger_core::operations::InstrumentId;
use folioledger_core::prices::{PricePoint, PriceRepositoryTrait};
use folioledger_core::Result;
use log::debug;

use crate::poisoned;

/// Price points grouped by instrument, keyed by point id.
#[derive(Default)]
pub struct InMemoryPriceRepository {
    prices: RwLock<HashMap<InstrumentId, HashMap<String, PricePoint>>>,
}

impl InMemoryPriceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PriceRepositoryTrait for InMemoryPriceRepository {
    fn get_prices(
        &self,
        instrument_id: &InstrumentId,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<PricePoint>> {
        let store = self.prices.read().map_err(poisoned)?;
        let mut points: Vec<PricePoint> = store
            .get(instrument_id)
            .into_iter()
            .flat_map(|points| points.values())
            .filter(|p| from.map_or(true, |f| p.timestamp >= f))
            .filter(|p| to.map_or(true, |t| p.timestamp <= t))
            .cloned()
            .collect();
        points.sort_by_key(|p| p.timestamp);
        Ok(points)
    }

    fn latest_price(&self, instrument_id: &InstrumentId) -> Result<Option<PricePoint>> {
        let store = self.prices.read().map_err(poisoned)?;
        Ok(store
            .get(instrument_id)
            .and_then(|points| points.values().max_by_key(|p| p.timestamp))
            .cloned())
    }

    async fn upsert_prices(&self, prices: Vec<PricePoint>) -> Result<usize> {
        let count = prices.len();
        let mut store = self.prices.write().map_err(poisoned)?;
        for point in prices {
            store
                .entry(point.instrument_id.clone())
                .or_default()
                .insert(point.id.clone(), point);
        }
        debug!("Upserted {} price points", count);
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_upsert_replaces_same_day() {
        let repo = InMemoryPriceRepository::new();
        let id = InstrumentId::new("FXGD");
        let day = |d: u32, h: u32| Utc.with_ymd_and_hms(2020, 2, d, h, 0, 0).unwrap();
        repo.upsert_prices(vec![
            PricePoint::new(id.clone(), day(5, 0), dec!(600), 1, "MOEX"),
            PricePoint::new(id.clone(), day(6, 0), dec!(601), 1, "MOEX"),
        ])
        .await
        .unwrap();
        repo.upsert_prices(vec![PricePoint::new(id.clone(), day(6, 18), dec!(602), 1, "MANUAL")])
            .await
            .unwrap();

        let all = repo.get_prices(&id, None, None).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(repo.latest_price(&id).unwrap().unwrap().price, dec!(602));
        assert_eq!(
            repo.get_prices(&id, Some(day(6, 0)), None).unwrap().len(),
            1
        );
        assert!(repo
            .get_prices(&InstrumentId::new("FXIT"), None, None)
            .unwrap()
            .is_empty());
    }
}
