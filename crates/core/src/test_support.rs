//! In-memory repository mocks shared by the service tests.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::errors::{DatabaseError, Result};
use crate::instruments::{Instrument, InstrumentRepositoryTrait};
use crate::operations::{
    sort_chronologically, InstrumentId, Operation, OperationQuery, OperationRepositoryTrait,
};
use crate::portfolios::{Portfolio, PortfolioRepositoryTrait};
use crate::prices::{PricePoint, PriceRepositoryTrait};

#[derive(Default)]
pub struct MockOperationRepository {
    pub operations: RwLock<Vec<Operation>>,
}

impl MockOperationRepository {
    pub fn with(operations: Vec<Operation>) -> Self {
        Self {
            operations: RwLock::new(operations),
        }
    }
}

#[async_trait]
impl OperationRepositoryTrait for MockOperationRepository {
    fn get_operation(&self, operation_id: &str) -> Result<Operation> {
        self.operations
            .read()
            .unwrap()
            .iter()
            .find(|op| op.id == operation_id)
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound(operation_id.to_string()).into())
    }

    fn get_operations(&self, portfolio_id: &str, query: &OperationQuery) -> Result<Vec<Operation>> {
        let mut ops: Vec<_> = self
            .operations
            .read()
            .unwrap()
            .iter()
            .filter(|op| op.portfolio_id == portfolio_id && query.matches(op))
            .cloned()
            .collect();
        sort_chronologically(&mut ops);
        Ok(ops)
    }

    fn list_instrument_ids(&self) -> Result<Vec<InstrumentId>> {
        let mut ids: Vec<_> = self
            .operations
            .read()
            .unwrap()
            .iter()
            .map(|op| op.instrument_id.clone())
            .collect();
        ids.sort();
        ids.dedup();
        Ok(ids)
    }

    async fn create_operations(&self, operations: Vec<Operation>) -> Result<usize> {
        let count = operations.len();
        self.operations.write().unwrap().extend(operations);
        Ok(count)
    }

    async fn delete_operation(&self, operation_id: &str) -> Result<Operation> {
        let mut ops = self.operations.write().unwrap();
        let index = ops
            .iter()
            .position(|op| op.id == operation_id)
            .ok_or_else(|| DatabaseError::NotFound(operation_id.to_string()))?;
        Ok(ops.remove(index))
    }

    async fn delete_portfolio_operations(&self, portfolio_id: &str) -> Result<usize> {
        let mut ops = self.operations.write().unwrap();
        let before = ops.len();
        ops.retain(|op| op.portfolio_id != portfolio_id);
        Ok(before - ops.len())
    }
}

#[derive(Default)]
pub struct MockPortfolioRepository {
    pub portfolios: RwLock<Vec<Portfolio>>,
}

impl MockPortfolioRepository {
    pub fn with_ids(ids: &[&str]) -> Self {
        let portfolios = ids
            .iter()
            .map(|id| Portfolio {
                id: id.to_string(),
                name: format!("Portfolio {}", id),
                created_at: chrono::Utc::now(),
            })
            .collect();
        Self {
            portfolios: RwLock::new(portfolios),
        }
    }
}

#[async_trait]
impl PortfolioRepositoryTrait for MockPortfolioRepository {
    fn get_portfolio(&self, portfolio_id: &str) -> Result<Portfolio> {
        self.portfolios
            .read()
            .unwrap()
            .iter()
            .find(|p| p.id == portfolio_id)
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound(portfolio_id.to_string()).into())
    }

    fn list_portfolios(&self) -> Result<Vec<Portfolio>> {
        Ok(self.portfolios.read().unwrap().clone())
    }

    async fn create_portfolio(&self, portfolio: Portfolio) -> Result<Portfolio> {
        self.portfolios.write().unwrap().push(portfolio.clone());
        Ok(portfolio)
    }

    async fn delete_portfolio(&self, portfolio_id: &str) -> Result<()> {
        self.portfolios
            .write()
            .unwrap()
            .retain(|p| p.id != portfolio_id);
        Ok(())
    }
}

#[derive(Default)]
pub struct MockPriceRepository {
    pub prices: RwLock<HashMap<String, PricePoint>>,
}

impl MockPriceRepository {
    pub fn with(points: Vec<PricePoint>) -> Self {
        Self {
            prices: RwLock::new(points.into_iter().map(|p| (p.id.clone(), p)).collect()),
        }
    }
}

#[async_trait]
impl PriceRepositoryTrait for MockPriceRepository {
    fn get_prices(
        &self,
        instrument_id: &InstrumentId,
        from: Option<chrono::DateTime<chrono::Utc>>,
        to: Option<chrono::DateTime<chrono::Utc>>,
    ) -> Result<Vec<PricePoint>> {
        Ok(self
            .prices
            .read()
            .unwrap()
            .values()
            .filter(|p| &p.instrument_id == instrument_id)
            .filter(|p| from.map_or(true, |f| p.timestamp >= f))
            .filter(|p| to.map_or(true, |t| p.timestamp <= t))
            .cloned()
            .collect())
    }

    fn latest_price(&self, instrument_id: &InstrumentId) -> Result<Option<PricePoint>> {
        Ok(self
            .prices
            .read()
            .unwrap()
            .values()
            .filter(|p| &p.instrument_id == instrument_id)
            .max_by_key(|p| p.timestamp)
            .cloned())
    }

    async fn upsert_prices(&self, prices: Vec<PricePoint>) -> Result<usize> {
        let count = prices.len();
        let mut store = self.prices.write().unwrap();
        for point in prices {
            store.insert(point.id.clone(), point);
        }
        Ok(count)
    }
}

#[derive(Default)]
pub struct MockInstrumentRepository {
    pub instruments: RwLock<HashMap<InstrumentId, Instrument>>,
}

impl MockInstrumentRepository {
    pub fn with_tickers(entries: &[(&str, &str)]) -> Self {
        let instruments = entries
            .iter()
            .map(|(id, ticker)| {
                let id = InstrumentId::new(*id);
                (
                    id.clone(),
                    Instrument {
                        id,
                        ticker: Some(ticker.to_string()),
                        isin: None,
                        figi: None,
                        name: None,
                        currency: None,
                        updated_at: chrono::Utc::now(),
                    },
                )
            })
            .collect();
        Self {
            instruments: RwLock::new(instruments),
        }
    }
}

#[async_trait]
impl InstrumentRepositoryTrait for MockInstrumentRepository {
    fn get_instrument(&self, instrument_id: &InstrumentId) -> Result<Option<Instrument>> {
        Ok(self.instruments.read().unwrap().get(instrument_id).cloned())
    }

    fn list_instruments(&self) -> Result<Vec<Instrument>> {
        let mut list: Vec<_> = self.instruments.read().unwrap().values().cloned().collect();
        list.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(list)
    }

    async fn upsert_instrument(&self, instrument: Instrument) -> Result<Instrument> {
        self.instruments
            .write()
            .unwrap()
            .insert(instrument.id.clone(), instrument.clone());
        Ok(instrument)
    }
}
