/// Instrument key used by cash operations (pay-ins, pay-outs, fees without a security)
pub const CASH_INSTRUMENT_ID: &str = "RUB/cash";

/// Ticker reported for the aggregated cash position
pub const CASH_TICKER: &str = "RUB";

/// Scale of fixed-point money: amounts are stored in millionths
pub const MONEY_SCALE: u32 = 6;

/// Decimal precision for average acquisition price
pub const DECIMAL_PRECISION: u32 = 6;

/// Decimal precision for balances and cash
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// How far back the valuer looks for a price at or before the valuation date
pub const PRICE_LOOKBACK_DAYS: i64 = 10;

/// History fetched for an instrument that has no stored prices yet
pub const PRICE_BACKFILL_DAYS: i64 = 365;
