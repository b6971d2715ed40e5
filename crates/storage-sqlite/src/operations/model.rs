//! Database models for operations.

use std::str::FromStr;

use diesel::prelude::*;
use folioledger_core::operations::{Currency, InstrumentId, Operation, OperationType};

use crate::errors::StorageError;
use crate::utils::{format_timestamp, parse_decimal, parse_timestamp};

/// Stored operation row
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::operations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OperationDB {
    pub seq: i32,
    pub id: String,
    pub portfolio_id: String,
    pub instrument_id: String,
    pub currency: String,
    pub unit_price: String,
    pub volume: i64,
    pub executed_at: String,
    pub operation_type: String,
    pub created_at: String,
}

/// Insertable row; `seq` is assigned by SQLite
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::operations)]
pub struct NewOperationDB {
    pub id: String,
    pub portfolio_id: String,
    pub instrument_id: String,
    pub currency: String,
    pub unit_price: String,
    pub volume: i64,
    pub executed_at: String,
    pub operation_type: String,
    pub created_at: String,
}

/// Bound parameters per inserted row
pub const NEW_OPERATION_COLUMNS: usize = 9;

impl From<&Operation> for NewOperationDB {
    fn from(op: &Operation) -> Self {
        Self {
            id: op.id.clone(),
            portfolio_id: op.portfolio_id.clone(),
            instrument_id: op.instrument_id.to_string(),
            currency: op.currency.to_string(),
            unit_price: op.unit_price.to_string(),
            volume: op.volume,
            executed_at: format_timestamp(op.timestamp),
            operation_type: op.operation_type.to_string(),
            created_at: format_timestamp(op.created_at),
        }
    }
}

impl TryFrom<OperationDB> for Operation {
    type Error = StorageError;

    fn try_from(row: OperationDB) -> Result<Self, Self::Error> {
        let currency = Currency::from_str(&row.currency)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        // Unknown labels parse to OperationType::Unknown
        let operation_type =
            OperationType::from_str(&row.operation_type).unwrap_or(OperationType::Unknown);
        Ok(Operation {
            unit_price: parse_decimal(&row.unit_price, "unit_price")?,
            timestamp: parse_timestamp(&row.executed_at, "executed_at")?,
            created_at: parse_timestamp(&row.created_at, "created_at")?,
            id: row.id,
            portfolio_id: row.portfolio_id,
            instrument_id: InstrumentId::new(row.instrument_id),
            currency,
            volume: row.volume,
            operation_type,
        })
    }
}
