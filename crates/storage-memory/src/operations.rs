use std::sync::RwLock;

use async_trait::async_trait;
use folioledger_core::errors::DatabaseError;
use folioledger_core::operations::{
    InstrumentId, Operation, OperationQuery, OperationRepositoryTrait,
};
use folioledger_core::Result;

use crate::{poisoned, ReadResult, WriteResult};

/// Operation log kept in insertion order.
#[derive(Default)]
pub struct InMemoryOperationRepository {
    operations: RwLock<Vec<Operation>>,
}

impl InMemoryOperationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> ReadResult<'_, Vec<Operation>> {
        self.operations.read().map_err(poisoned)
    }

    fn write(&self) -> WriteResult<'_, Vec<Operation>> {
        self.operations.write().map_err(poisoned)
    }
}

#[async_trait]
impl OperationRepositoryTrait for InMemoryOperationRepository {
    fn get_operation(&self, operation_id: &str) -> Result<Operation> {
        self.read()?
            .iter()
            .find(|op| op.id == operation_id)
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound(format!("operation {}", operation_id)).into())
    }

    fn get_operations(&self, portfolio_id: &str, query: &OperationQuery) -> Result<Vec<Operation>> {
        let mut operations: Vec<Operation> = self
            .read()?
            .iter()
            .filter(|op| op.portfolio_id == portfolio_id && query.matches(op))
            .cloned()
            .collect();
        // Stable: ties stay in insertion order
        operations.sort_by_key(|op| op.timestamp);
        Ok(operations)
    }

    fn list_instrument_ids(&self) -> Result<Vec<InstrumentId>> {
        let mut ids: Vec<InstrumentId> = self
            .read()?
            .iter()
            .map(|op| op.instrument_id.clone())
            .collect();
        ids.sort();
        ids.dedup();
        Ok(ids)
    }

    async fn create_operations(&self, operations: Vec<Operation>) -> Result<usize> {
        let mut store = self.write()?;
        for op in &operations {
            if store.iter().any(|existing| existing.id == op.id)
                || operations.iter().filter(|other| other.id == op.id).count() > 1
            {
                return Err(DatabaseError::UniqueViolation(format!("operation {}", op.id)).into());
            }
        }
        let count = operations.len();
        store.extend(operations);
        Ok(count)
    }

    async fn delete_operation(&self, operation_id: &str) -> Result<Operation> {
        let mut store = self.write()?;
        let index = store
            .iter()
            .position(|op| op.id == operation_id)
            .ok_or_else(|| DatabaseError::NotFound(format!("operation {}", operation_id)))?;
        Ok(store.remove(index))
    }

    async fn delete_portfolio_operations(&self, portfolio_id: &str) -> Result<usize> {
        let mut store = self.write()?;
        let before = store.len();
        store.retain(|op| op.portfolio_id != portfolio_id);
        Ok(before - store.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use folioledger_core::operations::{Currency, OperationType};
    use rust_decimal_macros::dec;

    fn op(id: &str, hour: u32) -> Operation {
        let ts = Utc.with_ymd_and_hms(2020, 2, 3, hour, 0, 0).unwrap();
        Operation {
            id: id.to_string(),
            portfolio_id: "p1".to_string(),
            instrument_id: InstrumentId::new("FXGD"),
            currency: Currency::Rub,
            unit_price: dec!(1),
            volume: 1,
            timestamp: ts,
            operation_type: OperationType::Buy,
            created_at: ts,
        }
    }

    #[tokio::test]
    async fn test_ties_keep_insertion_order() {
        let repo = InMemoryOperationRepository::new();
        repo.create_operations(vec![op("late", 12), op("b", 10), op("a", 10)])
            .await
            .unwrap();
        let ids: Vec<_> = repo
            .get_operations("p1", &OperationQuery::default())
            .unwrap()
            .into_iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(ids, vec!["b", "a", "late"]);
    }

    #[tokio::test]
    async fn test_duplicate_ids_rejected_atomically() {
        let repo = InMemoryOperationRepository::new();
        repo.create_operations(vec![op("x", 10)]).await.unwrap();
        let err = repo
            .create_operations(vec![op("y", 10), op("x", 11)])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            folioledger_core::Error::Database(DatabaseError::UniqueViolation(_))
        ));
        assert_eq!(
            repo.get_operations("p1", &OperationQuery::default())
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = InMemoryOperationRepository::new();
        repo.create_operations(vec![op("x", 10), op("y", 11)])
            .await
            .unwrap();
        assert_eq!(repo.delete_operation("x").await.unwrap().id, "x");
        assert!(repo.get_operation("x").unwrap_err().is_not_found());
        assert_eq!(repo.delete_portfolio_operations("p1").await.unwrap(), 1);
    }
}
