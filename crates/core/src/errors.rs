//! Core error types for the ledger.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage adapters.
//! The ledger engine itself never returns an error; these cover collaborators.

use thiserror::Error;

use crate::operations::OperationError;
use crate::sync::SyncError;
use folioledger_market_data::MarketDataError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the ledger.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Operation error: {0}")]
    Operation(#[from] OperationError),

    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    #[error("Market data operation failed: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// True when the error means "the requested record does not exist".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::Database(DatabaseError::NotFound(_))
                | Error::Operation(OperationError::NotFound(_))
                | Error::Operation(OperationError::PortfolioNotFound(_))
        )
    }
}

/// Database-agnostic error type for storage operations.
///
/// All details are strings so storage adapters can convert their own error
/// types into this one.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A unique constraint was violated (e.g., duplicate key).
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// A foreign key constraint was violated.
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Database migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Errors raised when validating input before it reaches storage.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Field {field} must not be negative (got {value})")]
    NegativeValue { field: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_detection() {
        let err: Error = DatabaseError::NotFound("portfolio p1".to_string()).into();
        assert!(err.is_not_found());

        let err: Error = OperationError::PortfolioNotFound("p1".to_string()).into();
        assert!(err.is_not_found());

        let err: Error = ValidationError::MissingField("name".to_string()).into();
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_validation_message() {
        let err = ValidationError::NegativeValue {
            field: "volume".to_string(),
            value: "-3".to_string(),
        };
        assert_eq!(err.to_string(), "Field volume must not be negative (got -3)");
    }
}
