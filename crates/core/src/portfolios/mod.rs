//! Portfolios module - owners of operation logs.

mod portfolios_model;
mod portfolios_service;
mod portfolios_traits;

pub use portfolios_model::{NewPortfolio, Portfolio};
pub use portfolios_service::PortfolioService;
pub use portfolios_traits::{PortfolioRepositoryTrait, PortfolioServiceTrait};
