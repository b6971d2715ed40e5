use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use folioledger_core::instruments::{Instrument, InstrumentRepositoryTrait};
use folioledger_core::operations::InstrumentId;
use folioledger_core::Result;

use crate::poisoned;

#[derive(Default)]
pub struct InMemoryInstrumentRepository {
    instruments: RwLock<BTreeMap<InstrumentId, Instrument>>,
}

impl InMemoryInstrumentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InstrumentRepositoryTrait for InMemoryInstrumentRepository {
    fn get_instrument(&self, instrument_id: &InstrumentId) -> Result<Option<Instrument>> {
        Ok(self
            .instruments
            .read()
            .map_err(poisoned)?
            .get(instrument_id)
            .cloned())
    }

    fn list_instruments(&self) -> Result<Vec<Instrument>> {
        Ok(self
            .instruments
            .read()
            .map_err(poisoned)?
            .values()
            .cloned()
            .collect())
    }

    async fn upsert_instrument(&self, instrument: Instrument) -> Result<Instrument> {
        self.instruments
            .write()
            .map_err(poisoned)?
            .insert(instrument.id.clone(), instrument.clone());
        Ok(instrument)
    }
}
