use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, warn};
use uuid::Uuid;

use super::operations_errors::OperationError;
use super::operations_model::{NewOperation, Operation, OperationQuery};
use super::operations_traits::{OperationRepositoryTrait, OperationServiceTrait};
use crate::errors::DatabaseError;
use crate::portfolios::PortfolioRepositoryTrait;
use crate::{Error, Result};

/// Service for recording and reading operations
pub struct OperationService {
    operation_repository: Arc<dyn OperationRepositoryTrait>,
    portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
}

impl OperationService {
    pub fn new(
        operation_repository: Arc<dyn OperationRepositoryTrait>,
        portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
    ) -> Self {
        Self {
            operation_repository,
            portfolio_repository,
        }
    }

    fn ensure_portfolio_exists(&self, portfolio_id: &str) -> Result<()> {
        match self.portfolio_repository.get_portfolio(portfolio_id) {
            Ok(_) => Ok(()),
            Err(Error::Database(DatabaseError::NotFound(_))) => {
                Err(OperationError::PortfolioNotFound(portfolio_id.to_string()).into())
            }
            Err(e) => Err(e),
        }
    }

    fn prepare(&self, new_operation: NewOperation) -> Result<Operation> {
        new_operation.validate()?;
        Ok(new_operation.into_operation(Uuid::new_v4().to_string(), Utc::now()))
    }
}

#[async_trait]
impl OperationServiceTrait for OperationService {
    fn get_operations(&self, portfolio_id: &str, query: &OperationQuery) -> Result<Vec<Operation>> {
        self.ensure_portfolio_exists(portfolio_id)?;
        self.operation_repository.get_operations(portfolio_id, query)
    }

    async fn create_operation(&self, new_operation: NewOperation) -> Result<Operation> {
        self.ensure_portfolio_exists(&new_operation.portfolio_id)?;
        let operation = self.prepare(new_operation)?;
        debug!(
            "Recording {} {} x{} @ {} in portfolio {}",
            operation.operation_type,
            operation.instrument_id,
            operation.volume,
            operation.unit_price,
            operation.portfolio_id
        );
        self.operation_repository
            .create_operations(vec![operation.clone()])
            .await?;
        Ok(operation)
    }

    /// Records a batch; the whole batch is rejected when any item is invalid.
    async fn create_operations(
        &self,
        portfolio_id: &str,
        new_operations: Vec<NewOperation>,
    ) -> Result<Vec<Operation>> {
        self.ensure_portfolio_exists(portfolio_id)?;
        let operations = new_operations
            .into_iter()
            .map(|mut new_operation| {
                new_operation.portfolio_id = portfolio_id.to_string();
                self.prepare(new_operation)
            })
            .collect::<Result<Vec<_>>>()?;

        if operations.is_empty() {
            return Ok(operations);
        }
        let inserted = self
            .operation_repository
            .create_operations(operations.clone())
            .await?;
        if inserted != operations.len() {
            warn!(
                "Expected to insert {} operations into {}, repository reported {}",
                operations.len(),
                portfolio_id,
                inserted
            );
        }
        Ok(operations)
    }

    async fn delete_operation(&self, portfolio_id: &str, operation_id: &str) -> Result<Operation> {
        let existing = match self.operation_repository.get_operation(operation_id) {
            Ok(op) => op,
            Err(Error::Database(DatabaseError::NotFound(_))) => {
                return Err(OperationError::NotFound(operation_id.to_string()).into())
            }
            Err(e) => return Err(e),
        };
        if existing.portfolio_id != portfolio_id {
            return Err(OperationError::PortfolioMismatch {
                operation_id: operation_id.to_string(),
                portfolio_id: portfolio_id.to_string(),
            }
            .into());
        }
        self.operation_repository.delete_operation(operation_id).await
    }
}
