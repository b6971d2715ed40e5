//! MOEX ISS response structures and parsing.
//!
//! ISS answers with one JSON object per requested block, every block being a
//! `{ "columns": [...], "data": [[...], ...] }` table.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::MarketDataError;
use crate::models::{InstrumentProfile, PriceBar};

use super::PROVIDER_ID;

/// A single ISS block.
#[derive(Debug, Deserialize)]
pub(crate) struct IssTable {
    pub columns: Vec<String>,
    #[serde(default)]
    pub data: Vec<Vec<Value>>,
}

impl IssTable {
    fn column(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
    }

    fn required_column(&self, name: &str) -> Result<usize, MarketDataError> {
        self.column(name).ok_or_else(|| parse_error(format!("missing column {}", name)))
    }
}

/// Paging information from the `history.cursor` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct IssCursor {
    pub index: u64,
    pub total: u64,
    pub page_size: u64,
}

impl IssCursor {
    /// Start offset of the next page, if there is one.
    pub fn next_start(&self) -> Option<u64> {
        let next = self.index + self.page_size;
        (self.page_size > 0 && next < self.total).then_some(next)
    }
}

/// One parsed page of the `history` endpoint.
#[derive(Debug)]
pub(crate) struct HistoryPage {
    pub bars: Vec<PriceBar>,
    pub cursor: Option<IssCursor>,
}

fn parse_error(message: impl Into<String>) -> MarketDataError {
    MarketDataError::ParseFailed {
        provider: PROVIDER_ID.to_string(),
        message: message.into(),
    }
}

fn parse_blocks(body: &str) -> Result<HashMap<String, IssTable>, MarketDataError> {
    serde_json::from_str(body).map_err(|e| parse_error(e.to_string()))
}

fn value_as_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            let repr = n.to_string();
            Decimal::from_str(&repr)
                .or_else(|_| Decimal::from_scientific(&repr))
                .ok()
        }
        Value::String(s) => Decimal::from_str(s).ok(),
        _ => None,
    }
}

fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn value_as_u64(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}

/// Parses one page of `/history/engines/stock/markets/shares/securities/{ticker}.json`.
///
/// Rows without a close price (no trades that day on that board) are skipped.
pub(crate) fn parse_history_page(body: &str) -> Result<HistoryPage, MarketDataError> {
    let blocks = parse_blocks(body)?;
    let history = blocks
        .get("history")
        .ok_or_else(|| parse_error("missing history block"))?;

    let date_idx = history.required_column("TRADEDATE")?;
    let close_idx = history.required_column("CLOSE")?;
    let volume_idx = history.column("VOLUME");
    let board_idx = history.column("BOARDID");

    let mut bars = Vec::with_capacity(history.data.len());
    for row in &history.data {
        let Some(date) = row
            .get(date_idx)
            .and_then(Value::as_str)
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        else {
            continue;
        };
        let Some(close) = row.get(close_idx).and_then(value_as_decimal) else {
            continue;
        };
        let volume = volume_idx
            .and_then(|i| row.get(i))
            .and_then(value_as_decimal)
            .unwrap_or(Decimal::ZERO);
        let mut bar = PriceBar::new(date, close, volume);
        if let Some(board) = board_idx.and_then(|i| row.get(i)).and_then(value_as_string) {
            bar = bar.with_board(board);
        }
        bars.push(bar);
    }

    let cursor = blocks.get("history.cursor").and_then(|table| {
        let row = table.data.first()?;
        Some(IssCursor {
            index: value_as_u64(row.get(table.column("INDEX")?)?)?,
            total: value_as_u64(row.get(table.column("TOTAL")?)?)?,
            page_size: value_as_u64(row.get(table.column("PAGESIZE")?)?)?,
        })
    });

    Ok(HistoryPage { bars, cursor })
}

/// Collapses bars reported on several boards into one bar per day.
///
/// The preferred board wins when present; otherwise the bar with the largest
/// traded volume is kept. Output is sorted by date.
pub(crate) fn merge_daily_bars(bars: Vec<PriceBar>, preferred_board: Option<&str>) -> Vec<PriceBar> {
    let mut by_day: BTreeMap<NaiveDate, PriceBar> = BTreeMap::new();
    for bar in bars {
        match by_day.get(&bar.date) {
            None => {
                by_day.insert(bar.date, bar);
            }
            Some(current) => {
                let on_preferred =
                    |b: &PriceBar| preferred_board.is_some() && b.board.as_deref() == preferred_board;
                let replace = match (on_preferred(&bar), on_preferred(current)) {
                    (true, false) => true,
                    (false, true) => false,
                    _ => bar.volume > current.volume,
                };
                if replace {
                    by_day.insert(bar.date, bar);
                }
            }
        }
    }
    by_day.into_values().collect()
}

/// Parses `/securities.json?q=...` and picks the row matching `query`.
///
/// An exact ticker or ISIN match wins; otherwise the first traded row is used.
pub(crate) fn parse_search(body: &str, query: &str) -> Result<InstrumentProfile, MarketDataError> {
    let blocks = parse_blocks(body)?;
    let securities = blocks
        .get("securities")
        .ok_or_else(|| parse_error("missing securities block"))?;

    let secid_idx = securities.required_column("secid")?;
    let isin_idx = securities.column("isin");
    let name_idx = securities.column("shortname");
    let board_idx = securities.column("primary_boardid");
    let traded_idx = securities.column("is_traded");

    let cell = |row: &Vec<Value>, idx: Option<usize>| -> Option<String> {
        idx.and_then(|i| row.get(i)).and_then(value_as_string)
    };

    let exact = securities.data.iter().find(|row| {
        cell(row, Some(secid_idx)).is_some_and(|s| s.eq_ignore_ascii_case(query))
            || cell(row, isin_idx).is_some_and(|s| s.eq_ignore_ascii_case(query))
    });
    let row = exact
        .or_else(|| {
            securities.data.iter().find(|row| {
                traded_idx
                    .and_then(|i| row.get(i))
                    .and_then(value_as_u64)
                    .is_some_and(|v| v == 1)
            })
        })
        .ok_or_else(|| MarketDataError::SymbolNotFound(query.to_string()))?;

    let ticker =
        cell(row, Some(secid_idx)).ok_or_else(|| MarketDataError::SymbolNotFound(query.to_string()))?;

    Ok(InstrumentProfile {
        ticker,
        isin: cell(row, isin_idx),
        name: cell(row, name_idx),
        primary_board: cell(row, board_idx),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const HISTORY_PAGE: &str = r#"{
        "history": {
            "columns": ["BOARDID", "TRADEDATE", "CLOSE", "VOLUME"],
            "data": [
                ["TQTF", "2020-02-03", 590.7, 1200],
                ["SMAL", "2020-02-03", 591.1, 3],
                ["TQTF", "2020-02-04", 595, 800],
                ["TQTF", "2020-02-05", null, 0]
            ]
        },
        "history.cursor": {
            "columns": ["INDEX", "TOTAL", "PAGESIZE"],
            "data": [[0, 250, 100]]
        }
    }"#;

    #[test]
    fn test_parse_history_page_skips_rows_without_close() {
        let page = parse_history_page(HISTORY_PAGE).unwrap();
        assert_eq!(page.bars.len(), 3);
        assert_eq!(page.bars[0].close, dec!(590.7));
        assert_eq!(page.bars[0].board.as_deref(), Some("TQTF"));
        assert_eq!(page.bars[2].close, dec!(595));
    }

    #[test]
    fn test_cursor_next_start() {
        let page = parse_history_page(HISTORY_PAGE).unwrap();
        let cursor = page.cursor.unwrap();
        assert_eq!(cursor.next_start(), Some(100));

        let last = IssCursor {
            index: 200,
            total: 250,
            page_size: 100,
        };
        assert_eq!(last.next_start(), None);
    }

    #[test]
    fn test_merge_keeps_highest_volume_board_per_day() {
        let page = parse_history_page(HISTORY_PAGE).unwrap();
        let merged = merge_daily_bars(page.bars, None);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].date, NaiveDate::from_ymd_opt(2020, 2, 3).unwrap());
        assert_eq!(merged[0].close, dec!(590.7));
        assert_eq!(merged[1].close, dec!(595));
    }

    #[test]
    fn test_merge_prefers_primary_board() {
        let page = parse_history_page(HISTORY_PAGE).unwrap();
        let merged = merge_daily_bars(page.bars, Some("SMAL"));
        assert_eq!(merged[0].close, dec!(591.1));
    }

    #[test]
    fn test_missing_history_block_is_parse_error() {
        let err = parse_history_page(r#"{"other": {"columns": [], "data": []}}"#).unwrap_err();
        assert!(matches!(err, MarketDataError::ParseFailed { .. }));
    }

    const SEARCH: &str = r#"{
        "securities": {
            "columns": ["secid", "shortname", "isin", "is_traded", "primary_boardid"],
            "data": [
                ["FXGDX", "Other fund", "XX0000000001", 0, "TQTF"],
                ["FXGD", "FinEx Gold", "IE00B8XB7377", 1, "TQTF"]
            ]
        }
    }"#;

    #[test]
    fn test_search_matches_ticker_exactly() {
        let profile = parse_search(SEARCH, "fxgd").unwrap();
        assert_eq!(profile.ticker, "FXGD");
        assert_eq!(profile.isin.as_deref(), Some("IE00B8XB7377"));
        assert_eq!(profile.primary_board.as_deref(), Some("TQTF"));
    }

    #[test]
    fn test_search_matches_isin() {
        let profile = parse_search(SEARCH, "IE00B8XB7377").unwrap();
        assert_eq!(profile.ticker, "FXGD");
        assert_eq!(profile.name.as_deref(), Some("FinEx Gold"));
    }

    #[test]
    fn test_search_with_no_rows_is_not_found() {
        let body = r#"{"securities": {"columns": ["secid"], "data": []}}"#;
        let err = parse_search(body, "NOPE").unwrap_err();
        assert!(matches!(err, MarketDataError::SymbolNotFound(ref s) if s == "NOPE"));
    }
}
