use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use uuid::Uuid;

use super::portfolios_model::{NewPortfolio, Portfolio};
use super::portfolios_traits::{PortfolioRepositoryTrait, PortfolioServiceTrait};
use crate::operations::OperationRepositoryTrait;
use crate::Result;

/// Service for managing portfolios
pub struct PortfolioService {
    repository: Arc<dyn PortfolioRepositoryTrait>,
    operation_repository: Arc<dyn OperationRepositoryTrait>,
}

impl PortfolioService {
    pub fn new(
        repository: Arc<dyn PortfolioRepositoryTrait>,
        operation_repository: Arc<dyn OperationRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            operation_repository,
        }
    }
}

#[async_trait]
impl PortfolioServiceTrait for PortfolioService {
    fn get_portfolio(&self, portfolio_id: &str) -> Result<Portfolio> {
        self.repository.get_portfolio(portfolio_id)
    }

    fn list_portfolios(&self) -> Result<Vec<Portfolio>> {
        self.repository.list_portfolios()
    }

    async fn create_portfolio(&self, new_portfolio: NewPortfolio) -> Result<Portfolio> {
        new_portfolio.validate()?;
        let portfolio = Portfolio {
            id: new_portfolio
                .id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            name: new_portfolio.name.trim().to_string(),
            created_at: Utc::now(),
        };
        debug!("Creating portfolio {} ({})", portfolio.id, portfolio.name);
        self.repository.create_portfolio(portfolio).await
    }

    /// Deletes the portfolio and its whole operation log.
    async fn delete_portfolio(&self, portfolio_id: &str) -> Result<()> {
        self.repository.get_portfolio(portfolio_id)?;
        let removed = self
            .operation_repository
            .delete_portfolio_operations(portfolio_id)
            .await?;
        self.repository.delete_portfolio(portfolio_id).await?;
        info!(
            "Deleted portfolio {} with {} operations",
            portfolio_id, removed
        );
        Ok(())
    }
}
