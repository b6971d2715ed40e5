use diesel::prelude::*;
use folioledger_core::portfolios::Portfolio;

use crate::errors::StorageError;
use crate::utils::{format_timestamp, parse_timestamp};

#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::portfolios)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PortfolioDB {
    pub id: String,
    pub name: String,
    pub created_at: String,
}

impl From<&Portfolio> for PortfolioDB {
    fn from(p: &Portfolio) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            created_at: format_timestamp(p.created_at),
        }
    }
}

impl TryFrom<PortfolioDB> for Portfolio {
    type Error = StorageError;

    fn try_from(row: PortfolioDB) -> Result<Self, Self::Error> {
        Ok(Portfolio {
            created_at: parse_timestamp(&row.created_at, "created_at")?,
            id: row.id,
            name: row.name,
        })
    }
}
