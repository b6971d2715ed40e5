use std::str::FromStr;

use diesel::prelude::*;
use folioledger_core::instruments::Instrument;
use folioledger_core::operations::{Currency, InstrumentId};
use log::warn;

use crate::errors::StorageError;
use crate::utils::{format_timestamp, parse_timestamp};

#[derive(Queryable, Selectable, Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::instruments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct InstrumentDB {
    pub id: String,
    pub ticker: Option<String>,
    pub isin: Option<String>,
    pub figi: Option<String>,
    pub name: Option<String>,
    pub currency: Option<String>,
    pub updated_at: String,
}

impl From<&Instrument> for InstrumentDB {
    fn from(i: &Instrument) -> Self {
        Self {
            id: i.id.to_string(),
            ticker: i.ticker.clone(),
            isin: i.isin.clone(),
            figi: i.figi.clone(),
            name: i.name.clone(),
            currency: i.currency.map(|c| c.to_string()),
            updated_at: format_timestamp(i.updated_at),
        }
    }
}

impl TryFrom<InstrumentDB> for Instrument {
    type Error = StorageError;

    fn try_from(row: InstrumentDB) -> Result<Self, Self::Error> {
        let currency = row.currency.as_deref().and_then(|c| match Currency::from_str(c) {
            Ok(currency) => Some(currency),
            Err(e) => {
                warn!("Ignoring currency of instrument {}: {}", row.id, e);
                None
            }
        });
        Ok(Instrument {
            updated_at: parse_timestamp(&row.updated_at, "updated_at")?,
            id: InstrumentId::new(row.id),
            ticker: row.ticker,
            isin: row.isin,
            figi: row.figi,
            name: row.name,
            currency,
        })
    }
}
