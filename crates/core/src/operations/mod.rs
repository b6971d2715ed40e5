//! Operations module - the per-portfolio event log the ledger is computed from.

mod operations_errors;
mod operations_model;
mod operations_service;
mod operations_traits;


#[cfg(test)]
mod operations_service_tests;

pub use operations_errors::OperationError;
pub use operations_model::{
    sort_chronologically, Currency, InstrumentId, InstrumentKind, NewOperation, Operation,
    OperationQuery, OperationType,
};
pub use operations_service::OperationService;
pub use operations_traits::{OperationRepositoryTrait, OperationServiceTrait};
