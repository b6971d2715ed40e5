use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use folioledger_core::instruments::{Instrument, InstrumentRepositoryTrait};
use folioledger_core::operations::InstrumentId;
use folioledger_core::Result;

use super::model::InstrumentDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::instruments;

/// Repository for the instrument directory
pub struct InstrumentRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl InstrumentRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl InstrumentRepositoryTrait for InstrumentRepository {
    fn get_instrument(&self, instrument_id: &InstrumentId) -> Result<Option<Instrument>> {
        let mut conn = get_connection(&self.pool)?;
        instruments::table
            .find(instrument_id.as_str())
            .select(InstrumentDB::as_select())
            .first::<InstrumentDB>(&mut conn)
            .optional()
            .into_core()?
            .map(|row| Instrument::try_from(row).into_core())
            .transpose()
    }

    fn list_instruments(&self) -> Result<Vec<Instrument>> {
        let mut conn = get_connection(&self.pool)?;
        instruments::table
            .select(InstrumentDB::as_select())
            .order(instruments::id.asc())
            .load::<InstrumentDB>(&mut conn)
            .into_core()?
            .into_iter()
            .map(|row| Instrument::try_from(row).into_core())
            .collect()
    }

    async fn upsert_instrument(&self, instrument: Instrument) -> Result<Instrument> {
        let row = InstrumentDB::from(&instrument);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Instrument> {
                diesel::insert_into(instruments::table)
                    .values(&row)
                    .on_conflict(instruments::id)
                    .do_update()
                    .set(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(instrument)
            })
            .await
    }
}
