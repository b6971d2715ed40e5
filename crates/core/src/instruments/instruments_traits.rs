use super::instruments_model::{Instrument, InstrumentInput};
use crate::operations::InstrumentId;
use crate::Result;
use async_trait::async_trait;

/// Storage contract for the instrument directory.
#[async_trait]
pub trait InstrumentRepositoryTrait: Send + Sync {
    fn get_instrument(&self, instrument_id: &InstrumentId) -> Result<Option<Instrument>>;
    fn list_instruments(&self) -> Result<Vec<Instrument>>;
    async fn upsert_instrument(&self, instrument: Instrument) -> Result<Instrument>;
}

/// Trait defining the contract for Instrument service operations.
#[async_trait]
pub trait InstrumentServiceTrait: Send + Sync {
    fn get_instrument(&self, instrument_id: &InstrumentId) -> Result<Instrument>;
    fn list_instruments(&self) -> Result<Vec<Instrument>>;
    async fn upsert_instrument(&self, input: InstrumentInput) -> Result<Instrument>;
}
