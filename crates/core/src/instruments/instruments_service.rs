use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use super::instruments_model::{Instrument, InstrumentInput};
use super::instruments_traits::{InstrumentRepositoryTrait, InstrumentServiceTrait};
use crate::errors::DatabaseError;
use crate::operations::InstrumentId;
use crate::Result;

pub struct InstrumentService {
    repository: Arc<dyn InstrumentRepositoryTrait>,
}

impl InstrumentService {
    pub fn new(repository: Arc<dyn InstrumentRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl InstrumentServiceTrait for InstrumentService {
    fn get_instrument(&self, instrument_id: &InstrumentId) -> Result<Instrument> {
        self.repository
            .get_instrument(instrument_id)?
            .ok_or_else(|| DatabaseError::NotFound(format!("instrument {}", instrument_id)).into())
    }

    fn list_instruments(&self) -> Result<Vec<Instrument>> {
        self.repository.list_instruments()
    }

    async fn upsert_instrument(&self, input: InstrumentInput) -> Result<Instrument> {
        let instrument = input.into_instrument(Utc::now())?;
        self.repository.upsert_instrument(instrument).await
    }
}
