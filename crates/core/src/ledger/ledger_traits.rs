use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::positions_model::PositionValuation;
use crate::operations::{Currency, InstrumentId};
use crate::Result;

/// Read-only ledger outputs computed on demand from the operation log.
#[async_trait]
pub trait LedgerServiceTrait: Send + Sync {
    /// Signed cash-flow balance, rounded to cents.
    async fn balance(
        &self,
        portfolio_id: &str,
        currency: Option<Currency>,
        instrument_id: Option<&InstrumentId>,
    ) -> Result<Decimal>;

    /// FIFO average acquisition price of the open lots, six decimals.
    async fn average_price(&self, portfolio_id: &str, instrument_id: &InstrumentId)
        -> Result<Decimal>;

    /// Valued holdings as of `date` (now when omitted).
    async fn positions(
        &self,
        portfolio_id: &str,
        date: Option<DateTime<Utc>>,
    ) -> Result<Vec<PositionValuation>>;
}
