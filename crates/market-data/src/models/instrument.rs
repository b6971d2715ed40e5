use serde::{Deserialize, Serialize};

/// Provider-sourced identity of a listed instrument.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentProfile {
    /// Exchange ticker (MOEX `SECID`)
    pub ticker: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub isin: Option<String>,

    /// Short display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Main trading board, used to prefer one board's bars over others
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_board: Option<String>,
}
