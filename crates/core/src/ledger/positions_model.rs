use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::operations::InstrumentId;

/// A held instrument valued as of a date.
///
/// The cash position carries `volume = 0` and its total in `valuation_price`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionValuation {
    pub instrument_id: InstrumentId,
    pub ticker: String,
    pub volume: i64,
    pub valuation_date: DateTime<Utc>,
    pub valuation_price: Decimal,
}

impl PositionValuation {
    pub fn is_cash(&self) -> bool {
        self.instrument_id.is_cash()
    }
}
