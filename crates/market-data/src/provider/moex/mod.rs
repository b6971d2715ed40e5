//! Moscow Exchange (MOEX) ISS market data provider.
//!
//! This module provides market data from the public ISS API:
//! - Daily bars via `/history/engines/stock/markets/shares/securities/{ticker}.json`
//! - Instrument lookup via `/securities.json?q=...`
//!
//! ISS pages history responses (100 rows per page); the `history.cursor`
//! block tells where the next page starts.
//! API documentation: https://iss.moex.com/iss/reference/

mod models;

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::errors::MarketDataError;
use crate::models::{InstrumentProfile, PriceBar};
use crate::provider::{MarketDataProvider, ProviderCapabilities, RateLimit};

use models::{merge_daily_bars, parse_history_page, parse_search};

pub const DEFAULT_BASE_URL: &str = "https://iss.moex.com/iss";
const PROVIDER_ID: &str = "MOEX";

/// Upper bound on history pages fetched for a single request.
const MAX_PAGES: usize = 50;

/// MOEX ISS market data provider.
pub struct MoexProvider {
    client: Client,
    base_url: String,
    preferred_board: Option<String>,
}

impl MoexProvider {
    /// Create a provider against the given ISS base URL (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            preferred_board: None,
        }
    }

    /// Keep this board's bar when a day is reported on several boards.
    pub fn with_preferred_board(mut self, board: impl Into<String>) -> Self {
        self.preferred_board = Some(board.into());
        self
    }

    fn merge_bars(&self, raw: Vec<PriceBar>) -> Vec<PriceBar> {
        merge_daily_bars(raw, self.preferred_board.as_deref())
    }

    async fn get_text(&self, url: &str, query: &[(&str, String)]) -> Result<String, MarketDataError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MarketDataError::Timeout {
                        provider: PROVIDER_ID.to_string(),
                    }
                } else {
                    MarketDataError::Network(e)
                }
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }
        if !status.is_success() {
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP {} for {}", status, url),
            });
        }

        Ok(response.text().await?)
    }

    async fn fetch_history(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, MarketDataError> {
        let url = format!(
            "{}/history/engines/stock/markets/shares/securities/{}.json",
            self.base_url, ticker
        );

        let mut bars = Vec::new();
        let mut offset: u64 = 0;
        for _ in 0..MAX_PAGES {
            let query = [
                ("iss.meta", "off".to_string()),
                ("iss.only", "history,history.cursor".to_string()),
                ("history.columns", "BOARDID,TRADEDATE,CLOSE,VOLUME".to_string()),
                ("from", start.format("%Y-%m-%d").to_string()),
                ("till", end.format("%Y-%m-%d").to_string()),
                ("start", offset.to_string()),
            ];
            let body = self.get_text(&url, &query).await?;
            let page = parse_history_page(&body)?;
            let page_len = page.bars.len();
            bars.extend(page.bars);

            match page.cursor.and_then(|c| c.next_start()) {
                Some(next) => offset = next,
                None => break,
            }
            if page_len == 0 {
                break;
            }
        }
        Ok(bars)
    }
}

impl Default for MoexProvider {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl MarketDataProvider for MoexProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            supports_historical: true,
            supports_search: true,
        }
    }

    fn rate_limit(&self) -> RateLimit {
        RateLimit {
            requests_per_minute: 120,
            min_delay: Duration::from_millis(250),
            backoff: Duration::from_secs(5),
        }
    }

    async fn get_historical_prices(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, MarketDataError> {
        if start > end {
            return Err(MarketDataError::NoDataForRange);
        }
        debug!("Fetching MOEX history for {} from {} to {}", ticker, start, end);

        let raw = self.fetch_history(ticker, start, end).await?;
        if raw.is_empty() {
            warn!("MOEX returned no history for {} in {}..{}", ticker, start, end);
            return Err(MarketDataError::NoDataForRange);
        }
        Ok(self.merge_bars(raw))
    }

    async fn find_instrument(&self, query: &str) -> Result<InstrumentProfile, MarketDataError> {
        let url = format!("{}/securities.json", self.base_url);
        let params = [
            ("q", query.to_string()),
            ("iss.meta", "off".to_string()),
            ("iss.only", "securities".to_string()),
            (
                "securities.columns",
                "secid,shortname,isin,is_traded,primary_boardid".to_string(),
            ),
        ];
        let body = self.get_text(&url, &params).await?;
        parse_search(&body, query)
    }
}
