//! Prices module - instrument price points used for valuation.

mod prices_model;
mod prices_service;
mod prices_traits;

pub use prices_model::{price_point_id, NewPricePoint, PricePoint, PRICE_SOURCE_MANUAL};
pub use prices_service::PriceService;
pub use prices_traits::{PriceRepositoryTrait, PriceServiceTrait};
