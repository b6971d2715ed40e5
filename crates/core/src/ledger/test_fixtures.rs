use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::operations::{Currency, InstrumentId, Operation, OperationType};

/// 2020-02-`d` at `hour`:00 UTC.
pub fn at(d: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 2, d, hour, 0, 0).unwrap()
}

pub fn day(d: u32) -> DateTime<Utc> {
    at(d, 10)
}

pub fn op(
    d: u32,
    instrument: &str,
    operation_type: OperationType,
    unit_price: Decimal,
    volume: i64,
) -> Operation {
    Operation {
        id: format!("op-{}-{}-{}", d, instrument, operation_type),
        portfolio_id: "p1".to_string(),
        instrument_id: InstrumentId::new(instrument),
        currency: Currency::Rub,
        unit_price,
        volume,
        timestamp: day(d),
        operation_type,
        created_at: day(d),
    }
}
