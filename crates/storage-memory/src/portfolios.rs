use std::sync::RwLock;

use async_trait::async_trait;
use folioledger_core::errors::DatabaseError;
use folioledger_core::portfolios::{Portfolio, PortfolioRepositoryTrait};
use folioledger_core::Result;

use crate::poisoned;

#[derive(Default)]
pub struct InMemoryPortfolioRepository {
    portfolios: RwLock<Vec<Portfolio>>,
}

impl InMemoryPortfolioRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PortfolioRepositoryTrait for InMemoryPortfolioRepository {
    fn get_portfolio(&self, portfolio_id: &str) -> Result<Portfolio> {
        self.portfolios
            .read()
            .map_err(poisoned)?
            .iter()
            .find(|p| p.id == portfolio_id)
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound(format!("portfolio {}", portfolio_id)).into())
    }

    fn list_portfolios(&self) -> Result<Vec<Portfolio>> {
        Ok(self.portfolios.read().map_err(poisoned)?.clone())
    }

    async fn create_portfolio(&self, portfolio: Portfolio) -> Result<Portfolio> {
        let mut store = self.portfolios.write().map_err(poisoned)?;
        if store.iter().any(|p| p.id == portfolio.id) {
            return Err(DatabaseError::UniqueViolation(format!("portfolio {}", portfolio.id)).into());
        }
        store.push(portfolio.clone());
        Ok(portfolio)
    }

    async fn delete_portfolio(&self, portfolio_id: &str) -> Result<()> {
        let mut store = self.portfolios.write().map_err(poisoned)?;
        let before = store.len();
        store.retain(|p| p.id != portfolio_id);
        if store.len() == before {
            return Err(DatabaseError::NotFound(format!("portfolio {}", portfolio_id)).into());
        }
        Ok(())
    }
}
