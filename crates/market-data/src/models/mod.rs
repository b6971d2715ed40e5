//! Market data models
//!
//! - `bar` - Daily price bars returned by historical endpoints (PriceBar)
//! - `instrument` - Listed instrument profile returned by search (InstrumentProfile)

mod bar;
mod instrument;

pub use bar::PriceBar;
pub use instrument::InstrumentProfile;
