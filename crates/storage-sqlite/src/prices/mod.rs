//! SQLite storage implementation for price points.

mod model;
mod repository;

pub use model::PricePointDB;
pub use repository::PriceRepository;
