//! SQLite storage implementation for operations.

mod model;
mod repository;

pub use model::{NewOperationDB, OperationDB};
pub use repository::OperationRepository;
