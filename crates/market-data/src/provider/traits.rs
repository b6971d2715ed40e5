//! Market data provider trait definitions.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::MarketDataError;
use crate::models::{InstrumentProfile, PriceBar};

use super::capabilities::{ProviderCapabilities, RateLimit};

/// Trait for market data providers.
///
/// Implement this trait to add support for a new market data source.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider, e.g. "MOEX".
    fn id(&self) -> &'static str;

    fn capabilities(&self) -> ProviderCapabilities;

    fn rate_limit(&self) -> RateLimit;

    /// Fetch daily bars for `ticker` between `start` and `end` (both inclusive).
    ///
    /// Bars are returned in ascending date order with at most one bar per day.
    async fn get_historical_prices(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, MarketDataError>;

    /// Look up an instrument by ticker or ISIN.
    async fn find_instrument(&self, query: &str) -> Result<InstrumentProfile, MarketDataError>;
}
