use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One trading day of market data for a single ticker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBar {
    /// Trading date
    pub date: NaiveDate,

    /// Closing price
    pub close: Decimal,

    /// Traded volume in lots/shares
    pub volume: Decimal,

    /// Trading board the bar was reported on (e.g. "TQBR", "TQTF")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board: Option<String>,
}

impl PriceBar {
    pub fn new(date: NaiveDate, close: Decimal, volume: Decimal) -> Self {
        Self {
            date,
            close,
            volume,
            board: None,
        }
    }

    pub fn with_board(mut self, board: impl Into<String>) -> Self {
        self.board = Some(board.into());
        self
    }
}
