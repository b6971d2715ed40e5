use super::operations_model::*;
use crate::Result;
use async_trait::async_trait;

/// Storage contract for the operation log (the ledger's Operation Source).
///
/// Reads return operations ordered by ascending timestamp; operations sharing a
/// timestamp come back in insertion order. A query that matches nothing yields
/// an empty list, not an error.
#[async_trait]
pub trait OperationRepositoryTrait: Send + Sync {
    fn get_operation(&self, operation_id: &str) -> Result<Operation>;
    fn get_operations(&self, portfolio_id: &str, query: &OperationQuery) -> Result<Vec<Operation>>;
    /// Distinct instrument keys referenced by any operation, sorted.
    fn list_instrument_ids(&self) -> Result<Vec<InstrumentId>>;
    async fn create_operations(&self, operations: Vec<Operation>) -> Result<usize>;
    async fn delete_operation(&self, operation_id: &str) -> Result<Operation>;
    async fn delete_portfolio_operations(&self, portfolio_id: &str) -> Result<usize>;
}

/// Trait defining the contract for Operation service operations.
#[async_trait]
pub trait OperationServiceTrait: Send + Sync {
    fn get_operations(&self, portfolio_id: &str, query: &OperationQuery) -> Result<Vec<Operation>>;
    async fn create_operation(&self, new_operation: NewOperation) -> Result<Operation>;
    async fn create_operations(
        &self,
        portfolio_id: &str,
        new_operations: Vec<NewOperation>,
    ) -> Result<Vec<Operation>>;
    async fn delete_operation(&self, portfolio_id: &str, operation_id: &str) -> Result<Operation>;
}
