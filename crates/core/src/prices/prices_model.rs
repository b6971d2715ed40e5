//! Price time series models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::operations::InstrumentId;
use crate::Result;

pub const PRICE_SOURCE_MANUAL: &str = "MANUAL";

/// Market price of an instrument at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    /// `{instrument_id}_{YYYYMMDD}`; one point per instrument and day
    pub id: String,
    pub instrument_id: InstrumentId,
    pub timestamp: DateTime<Utc>,
    pub price: Decimal,
    pub volume: i64,
    pub source: String,
}

impl PricePoint {
    pub fn new(
        instrument_id: InstrumentId,
        timestamp: DateTime<Utc>,
        price: Decimal,
        volume: i64,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: price_point_id(&instrument_id, timestamp.date_naive()),
            instrument_id,
            timestamp,
            price,
            volume,
            source: source.into(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

pub fn price_point_id(instrument_id: &InstrumentId, date: NaiveDate) -> String {
    format!("{}_{}", instrument_id, date.format("%Y%m%d"))
}

/// Input model for a manually entered price
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPricePoint {
    pub instrument_id: String,
    pub timestamp: DateTime<Utc>,
    pub price: Decimal,
    #[serde(default)]
    pub volume: i64,
}

impl NewPricePoint {
    pub fn into_price_point(self) -> Result<PricePoint> {
        let instrument_id = InstrumentId::new(self.instrument_id);
        if instrument_id.is_empty() {
            return Err(ValidationError::MissingField("instrumentId".to_string()).into());
        }
        if self.price.is_sign_negative() && !self.price.is_zero() {
            return Err(ValidationError::NegativeValue {
                field: "price".to_string(),
                value: self.price.to_string(),
            }
            .into());
        }
        if self.volume < 0 {
            return Err(ValidationError::NegativeValue {
                field: "volume".to_string(),
                value: self.volume.to_string(),
            }
            .into());
        }
        Ok(PricePoint::new(
            instrument_id,
            self.timestamp,
            self.price,
            self.volume,
            PRICE_SOURCE_MANUAL,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn test_price_point_id_is_per_day() {
        let morning = Utc.with_ymd_and_hms(2020, 2, 5, 7, 0, 0).unwrap();
        let evening = Utc.with_ymd_and_hms(2020, 2, 5, 19, 0, 0).unwrap();
        let a = PricePoint::new("FXGD".into(), morning, dec!(600), 10, "MOEX");
        let b = PricePoint::new("FXGD".into(), evening, dec!(601), 10, "MOEX");
        assert_eq!(a.id, "FXGD_20200205");
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn test_manual_price_validation() {
        let input = NewPricePoint {
            instrument_id: "FXGD".to_string(),
            timestamp: Utc::now(),
            price: dec!(-1),
            volume: 0,
        };
        assert!(input.into_price_point().is_err());

        let input = NewPricePoint {
            instrument_id: "FXGD".to_string(),
            timestamp: Utc::now(),
            price: dec!(604.9),
            volume: 0,
        };
        let point = input.into_price_point().unwrap();
        assert_eq!(point.source, PRICE_SOURCE_MANUAL);
    }
}
