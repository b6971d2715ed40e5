//! SQLite storage implementation for the instrument directory.

mod model;
mod repository;

pub use model::InstrumentDB;
pub use repository::InstrumentRepository;
