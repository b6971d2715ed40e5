use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use folioledger_core::errors::DatabaseError;
use folioledger_core::portfolios::{Portfolio, PortfolioRepositoryTrait};
use folioledger_core::Result;

use super::model::PortfolioDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::portfolios;

/// Repository for portfolios
pub struct PortfolioRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl PortfolioRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl PortfolioRepositoryTrait for PortfolioRepository {
    fn get_portfolio(&self, portfolio_id: &str) -> Result<Portfolio> {
        let mut conn = get_connection(&self.pool)?;
        let row = portfolios::table
            .find(portfolio_id)
            .select(PortfolioDB::as_select())
            .first::<PortfolioDB>(&mut conn)
            .optional()
            .into_core()?
            .ok_or_else(|| DatabaseError::NotFound(format!("portfolio {}", portfolio_id)))?;
        Portfolio::try_from(row).into_core()
    }

    fn list_portfolios(&self) -> Result<Vec<Portfolio>> {
        let mut conn = get_connection(&self.pool)?;
        portfolios::table
            .select(PortfolioDB::as_select())
            .order((portfolios::created_at.asc(), portfolios::id.asc()))
            .load::<PortfolioDB>(&mut conn)
            .into_core()?
            .into_iter()
            .map(|row| Portfolio::try_from(row).into_core())
            .collect()
    }

    async fn create_portfolio(&self, portfolio: Portfolio) -> Result<Portfolio> {
        let row = PortfolioDB::from(&portfolio);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Portfolio> {
                diesel::insert_into(portfolios::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(portfolio)
            })
            .await
    }

    async fn delete_portfolio(&self, portfolio_id: &str) -> Result<()> {
        let portfolio_id = portfolio_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                let removed = diesel::delete(portfolios::table.find(&portfolio_id))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if removed == 0 {
                    return Err(DatabaseError::NotFound(format!("portfolio {}", portfolio_id)).into());
                }
                Ok(())
            })
            .await
    }
}
