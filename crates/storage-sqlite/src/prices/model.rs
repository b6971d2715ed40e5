use diesel::prelude::*;
use folioledger_core::operations::InstrumentId;
use folioledger_core::prices::PricePoint;

use crate::errors::StorageError;
use crate::utils::{format_timestamp, parse_decimal, parse_timestamp};

#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::price_points)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PricePointDB {
    pub id: String,
    pub instrument_id: String,
    pub priced_at: String,
    pub price: String,
    pub volume: i64,
    pub source: String,
}

/// Bound parameters per inserted row
pub const PRICE_POINT_COLUMNS: usize = 6;

impl From<&PricePoint> for PricePointDB {
    fn from(p: &PricePoint) -> Self {
        Self {
            id: p.id.clone(),
            instrument_id: p.instrument_id.to_string(),
            priced_at: format_timestamp(p.timestamp),
            price: p.price.to_string(),
            volume: p.volume,
            source: p.source.clone(),
        }
    }
}

impl TryFrom<PricePointDB> for PricePoint {
    type Error = StorageError;

    fn try_from(row: PricePointDB) -> Result<Self, Self::Error> {
        Ok(PricePoint {
            timestamp: parse_timestamp(&row.priced_at, "priced_at")?,
            price: parse_decimal(&row.price, "price")?,
            id: row.id,
            instrument_id: InstrumentId::new(row.instrument_id),
            volume: row.volume,
            source: row.source,
        })
    }
}
