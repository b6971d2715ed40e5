//! Query-string parsing shared by the route modules.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use folioledger_core::operations::Currency;

use crate::error::{ApiError, ApiResult};

pub fn parse_currency(raw: Option<&str>) -> ApiResult<Option<Currency>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(code) => code
            .parse::<Currency>()
            .map(Some)
            .map_err(|e| ApiError::BadRequest(e.to_string())),
    }
}

/// Accepts an RFC 3339 timestamp or a plain `YYYY-MM-DD` date.
///
/// A plain date means the end of that day (UTC) so operations booked during
/// the day are included.
pub fn parse_valuation_date(raw: Option<&str>) -> ApiResult<Option<DateTime<Utc>>> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ApiError::BadRequest(format!("Invalid date '{}'", raw)))?;
    let end_of_day = NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999).unwrap_or(NaiveTime::MIN);
    Ok(Some(date.and_time(end_of_day).and_utc()))
}
