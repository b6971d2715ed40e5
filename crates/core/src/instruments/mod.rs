//! Instrument directory - maps instrument keys to tickers and names.

mod instruments_model;
mod instruments_service;
mod instruments_traits;

pub use instruments_model::{Instrument, InstrumentInput};
pub use instruments_service::InstrumentService;
pub use instruments_traits::{InstrumentRepositoryTrait, InstrumentServiceTrait};
