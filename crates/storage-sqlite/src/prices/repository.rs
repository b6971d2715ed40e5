use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use log::debug;

use folioledger_core::operations::InstrumentId;
use folioledger_core::prices::{PricePoint, PriceRepositoryTrait};
use folioledger_core::Result;

use super::model::{PricePointDB, PRICE_POINT_COLUMNS};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::price_points;
use crate::utils::{chunk_rows, format_timestamp};

/// Repository for the price time series
pub struct PriceRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl PriceRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl PriceRepositoryTrait for PriceRepository {
    fn get_prices(
        &self,
        instrument_id: &InstrumentId,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<PricePoint>> {
        let mut conn = get_connection(&self.pool)?;
        let mut sql = price_points::table
            .filter(price_points::instrument_id.eq(instrument_id.as_str()))
            .select(PricePointDB::as_select())
            .into_boxed();
        if let Some(from) = from {
            sql = sql.filter(price_points::priced_at.ge(format_timestamp(from)));
        }
        if let Some(to) = to {
            sql = sql.filter(price_points::priced_at.le(format_timestamp(to)));
        }
        sql.order(price_points::priced_at.asc())
            .load::<PricePointDB>(&mut conn)
            .into_core()?
            .into_iter()
            .map(|row| PricePoint::try_from(row).into_core())
            .collect()
    }

    fn latest_price(&self, instrument_id: &InstrumentId) -> Result<Option<PricePoint>> {
        let mut conn = get_connection(&self.pool)?;
        price_points::table
            .filter(price_points::instrument_id.eq(instrument_id.as_str()))
            .select(PricePointDB::as_select())
            .order(price_points::priced_at.desc())
            .first::<PricePointDB>(&mut conn)
            .optional()
            .into_core()?
            .map(|row| PricePoint::try_from(row).into_core())
            .transpose()
    }

    async fn upsert_prices(&self, prices: Vec<PricePoint>) -> Result<usize> {
        if prices.is_empty() {
            return Ok(0);
        }
        let rows: Vec<PricePointDB> = prices.iter().map(PricePointDB::from).collect();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut written = 0;
                for chunk in chunk_rows(&rows, PRICE_POINT_COLUMNS) {
                    written += diesel::replace_into(price_points::table)
                        .values(chunk)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                debug!("Upserted {} price points", written);
                Ok(written)
            })
            .await
    }
}
