//! Instrument directory models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::CASH_TICKER;
use crate::errors::ValidationError;
use crate::operations::{Currency, InstrumentId};
use crate::Result;

/// Directory entry describing a tradable instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    pub id: InstrumentId,
    pub ticker: Option<String>,
    pub isin: Option<String>,
    pub figi: Option<String>,
    pub name: Option<String>,
    pub currency: Option<Currency>,
    pub updated_at: DateTime<Utc>,
}

impl Instrument {
    /// Ticker shown next to a position; empty when the directory has none.
    pub fn display_ticker(&self) -> &str {
        if self.id.is_cash() {
            return CASH_TICKER;
        }
        self.ticker.as_deref().unwrap_or_default()
    }
}

/// Input model for creating or replacing a directory entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentInput {
    pub id: String,
    pub ticker: Option<String>,
    pub isin: Option<String>,
    pub figi: Option<String>,
    pub name: Option<String>,
    pub currency: Option<Currency>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl InstrumentInput {
    pub fn into_instrument(self, updated_at: DateTime<Utc>) -> Result<Instrument> {
        let id = InstrumentId::new(self.id);
        if id.is_empty() {
            return Err(ValidationError::MissingField("id".to_string()).into());
        }
        let ticker = non_empty(self.ticker);
        let isin = non_empty(self.isin);
        let figi = non_empty(self.figi);
        if ticker.is_none() && isin.is_none() && figi.is_none() && !id.is_cash() {
            return Err(ValidationError::InvalidInput(format!(
                "Instrument {} needs at least one of ticker, isin or figi",
                id
            ))
            .into());
        }
        Ok(Instrument {
            id,
            ticker,
            isin,
            figi,
            name: non_empty(self.name),
            currency: self.currency,
            updated_at,
        })
    }
}
