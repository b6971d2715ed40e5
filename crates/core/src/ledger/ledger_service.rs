use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use log::debug;
use rust_decimal::Decimal;

use super::balance_aggregator::BalanceAggregator;
use super::ledger_traits::LedgerServiceTrait;
use super::lot_queue::FifoCostMatcher;
use super::position_valuer::{window_start, Holdings, PositionValuer};
use super::positions_model::PositionValuation;
use crate::instruments::InstrumentRepositoryTrait;
use crate::operations::{
    sort_chronologically, Currency, InstrumentId, Operation, OperationQuery,
    OperationRepositoryTrait,
};
use crate::prices::{PricePoint, PriceRepositoryTrait};
use crate::Result;

/// Fetches collaborator data and runs the pure ledger engine over it.
pub struct LedgerService {
    operation_repository: Arc<dyn OperationRepositoryTrait>,
    price_repository: Arc<dyn PriceRepositoryTrait>,
    instrument_repository: Arc<dyn InstrumentRepositoryTrait>,
}

impl LedgerService {
    pub fn new(
        operation_repository: Arc<dyn OperationRepositoryTrait>,
        price_repository: Arc<dyn PriceRepositoryTrait>,
        instrument_repository: Arc<dyn InstrumentRepositoryTrait>,
    ) -> Self {
        Self {
            operation_repository,
            price_repository,
            instrument_repository,
        }
    }

    fn load_operations(&self, portfolio_id: &str, query: &OperationQuery) -> Result<Vec<Operation>> {
        let mut operations = self.operation_repository.get_operations(portfolio_id, query)?;
        sort_chronologically(&mut operations);
        Ok(operations)
    }

    async fn load_prices(
        &self,
        instrument_id: InstrumentId,
        date: DateTime<Utc>,
    ) -> Result<(InstrumentId, Vec<PricePoint>)> {
        let points =
            self.price_repository
                .get_prices(&instrument_id, Some(window_start(date)), Some(date))?;
        Ok((instrument_id, points))
    }

    fn load_tickers<'a, I>(&self, instrument_ids: I) -> Result<HashMap<InstrumentId, String>>
    where
        I: IntoIterator<Item = &'a InstrumentId>,
    {
        let mut tickers = HashMap::new();
        for id in instrument_ids {
            if let Some(instrument) = self.instrument_repository.get_instrument(id)? {
                tickers.insert(id.clone(), instrument.display_ticker().to_string());
            }
        }
        Ok(tickers)
    }
}

#[async_trait]
impl LedgerServiceTrait for LedgerService {
    async fn balance(
        &self,
        portfolio_id: &str,
        currency: Option<Currency>,
        instrument_id: Option<&InstrumentId>,
    ) -> Result<Decimal> {
        let query = OperationQuery {
            instrument_id: instrument_id.cloned(),
            currency,
            ..Default::default()
        };
        let operations = self.load_operations(portfolio_id, &query)?;
        Ok(BalanceAggregator::aggregate(&operations))
    }

    async fn average_price(
        &self,
        portfolio_id: &str,
        instrument_id: &InstrumentId,
    ) -> Result<Decimal> {
        let query = OperationQuery::for_instrument(instrument_id.clone());
        let operations = self.load_operations(portfolio_id, &query)?;
        let matcher = FifoCostMatcher::match_all(
            operations
                .iter()
                .filter(|op| op.operation_type.is_lot_event()),
        );
        debug!(
            "{} in {}: {} open lots, {} discarded",
            instrument_id,
            portfolio_id,
            matcher.open_lots().len(),
            matcher.discarded_volume()
        );
        Ok(matcher.average_price())
    }

    async fn positions(
        &self,
        portfolio_id: &str,
        date: Option<DateTime<Utc>>,
    ) -> Result<Vec<PositionValuation>> {
        let date = date.unwrap_or_else(Utc::now);
        let operations = self.load_operations(portfolio_id, &OperationQuery::up_to(date))?;

        let held: Vec<InstrumentId> = Holdings::from_operations(&operations, date)
            .held()
            .map(|(id, _)| id.clone())
            .collect();
        let prices: HashMap<_, _> =
            try_join_all(held.iter().cloned().map(|id| self.load_prices(id, date)))
                .await?
                .into_iter()
                .collect();
        let tickers = self.load_tickers(&held)?;

        Ok(PositionValuer::new(&prices, &tickers).value(&operations, date))
    }
}
