use thiserror::Error;

#[derive(Error, Debug)]
pub enum OperationError {
    #[error("Operation not found: {0}")]
    NotFound(String),
    #[error("Portfolio not found: {0}")]
    PortfolioNotFound(String),
    #[error("Operation {operation_id} does not belong to portfolio {portfolio_id}")]
    PortfolioMismatch {
        operation_id: String,
        portfolio_id: String,
    },
}
