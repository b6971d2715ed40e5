//! Column codecs and batching helpers for SQLite storage.
//!
//! Timestamps are stored as fixed-width RFC 3339 text in UTC so that text
//! comparison and `ORDER BY` follow chronological order. Decimals are stored
//! as text to keep every digit.

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::errors::StorageError;

/// SQLite's default limit on bound parameters per statement.
pub const SQLITE_MAX_PARAMS: usize = 999;

/// Splits rows into batches whose bound parameter count stays under the limit.
pub fn chunk_rows<T>(rows: &[T], columns_per_row: usize) -> impl Iterator<Item = &[T]> {
    let per_chunk = (SQLITE_MAX_PARAMS / columns_per_row.max(1)).max(1);
    rows.chunks(per_chunk)
}

pub fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn parse_timestamp(value: &str, field: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StorageError::SerializationError(format!("{} '{}': {}", field, value, e)))
}

pub fn parse_decimal(value: &str, field: &str) -> Result<Decimal, StorageError> {
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map_err(|e| StorageError::SerializationError(format!("{} '{}': {}", field, value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn test_chunk_rows_respects_parameter_limit() {
        let rows: Vec<i32> = (0..250).collect();
        let chunks: Vec<_> = chunk_rows(&rows, 9).collect();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 111);
        assert_eq!(chunks[2].len(), 28);
        assert!(chunk_rows::<i32>(&[], 9).next().is_none());
    }

    #[test]
    fn test_timestamps_sort_as_text() {
        let earlier = Utc.with_ymd_and_hms(2020, 2, 3, 9, 59, 59).unwrap();
        let later = Utc.with_ymd_and_hms(2020, 2, 3, 10, 0, 0).unwrap();
        let a = format_timestamp(earlier);
        let b = format_timestamp(later);
        assert_eq!(b, "2020-02-03T10:00:00.000000Z");
        assert!(a < b);
        assert_eq!(parse_timestamp(&b, "t").unwrap(), later);
    }

    #[test]
    fn test_decimal_text() {
        assert_eq!(parse_decimal("590.7", "price").unwrap(), dec!(590.7));
        assert_eq!(parse_decimal("1e2", "price").unwrap(), dec!(100));
        assert!(parse_decimal("abc", "price").is_err());
    }
}
