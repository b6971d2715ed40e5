use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use log::debug;

use folioledger_core::errors::DatabaseError;
use folioledger_core::operations::{
    InstrumentId, Operation, OperationQuery, OperationRepositoryTrait,
};
use folioledger_core::Result;

use super::model::{NewOperationDB, OperationDB, NEW_OPERATION_COLUMNS};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::operations;
use crate::utils::{chunk_rows, format_timestamp};

fn into_operations(rows: Vec<OperationDB>) -> Result<Vec<Operation>> {
    rows.into_iter()
        .map(|row| Operation::try_from(row).into_core())
        .collect()
}

/// Repository for the operation log
pub struct OperationRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl OperationRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl OperationRepositoryTrait for OperationRepository {
    fn get_operation(&self, operation_id: &str) -> Result<Operation> {
        let mut conn = get_connection(&self.pool)?;
        let row = operations::table
            .filter(operations::id.eq(operation_id))
            .select(OperationDB::as_select())
            .first::<OperationDB>(&mut conn)
            .optional()
            .into_core()?
            .ok_or_else(|| DatabaseError::NotFound(format!("operation {}", operation_id)))?;
        Operation::try_from(row).into_core()
    }

    fn get_operations(&self, portfolio_id: &str, query: &OperationQuery) -> Result<Vec<Operation>> {
        let mut conn = get_connection(&self.pool)?;
        let mut sql = operations::table
            .filter(operations::portfolio_id.eq(portfolio_id))
            .select(OperationDB::as_select())
            .into_boxed();

        if let Some(instrument_id) = &query.instrument_id {
            sql = sql.filter(operations::instrument_id.eq(instrument_id.as_str().to_string()));
        }
        if let Some(currency) = query.currency {
            sql = sql.filter(operations::currency.eq(currency.as_str()));
        }
        if let Some(from) = query.from {
            sql = sql.filter(operations::executed_at.ge(format_timestamp(from)));
        }
        if let Some(to) = query.to {
            sql = sql.filter(operations::executed_at.le(format_timestamp(to)));
        }

        let rows = sql
            .order((operations::executed_at.asc(), operations::seq.asc()))
            .load::<OperationDB>(&mut conn)
            .into_core()?;
        into_operations(rows)
    }

    fn list_instrument_ids(&self) -> Result<Vec<InstrumentId>> {
        let mut conn = get_connection(&self.pool)?;
        let ids = operations::table
            .select(operations::instrument_id)
            .distinct()
            .order(operations::instrument_id.asc())
            .load::<String>(&mut conn)
            .into_core()?;
        Ok(ids.into_iter().map(InstrumentId::new).collect())
    }

    async fn create_operations(&self, new_operations: Vec<Operation>) -> Result<usize> {
        if new_operations.is_empty() {
            return Ok(0);
        }
        let rows: Vec<NewOperationDB> = new_operations.iter().map(NewOperationDB::from).collect();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut inserted = 0;
                for chunk in chunk_rows(&rows, NEW_OPERATION_COLUMNS) {
                    inserted += diesel::insert_into(operations::table)
                        .values(chunk)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                debug!("Inserted {} operations", inserted);
                Ok(inserted)
            })
            .await
    }

    async fn delete_operation(&self, operation_id: &str) -> Result<Operation> {
        let operation_id = operation_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Operation> {
                let row = operations::table
                    .filter(operations::id.eq(&operation_id))
                    .select(OperationDB::as_select())
                    .first::<OperationDB>(conn)
                    .optional()
                    .into_core()?
                    .ok_or_else(|| {
                        DatabaseError::NotFound(format!("operation {}", operation_id))
                    })?;
                diesel::delete(operations::table.filter(operations::id.eq(&operation_id)))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Operation::try_from(row).into_core()
            })
            .await
    }

    async fn delete_portfolio_operations(&self, portfolio_id: &str) -> Result<usize> {
        let portfolio_id = portfolio_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let removed =
                    diesel::delete(operations::table.filter(operations::portfolio_id.eq(&portfolio_id)))
                        .execute(conn)
                        .map_err(StorageError::from)?;
                Ok(removed)
            })
            .await
    }
}
