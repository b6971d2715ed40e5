//! Operation domain models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::CASH_INSTRUMENT_ID;
use crate::errors::ValidationError;
use crate::money::Money;
use crate::Result;

/// Kind of financial event recorded in the log.
///
/// Labels that are not recognised deserialize to `Unknown`, which the
/// balance rules treat like any other debit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationType {
    Buy,
    Sell,
    BrokerageFee,
    ExchangeFee,
    PayIn,
    PayOut,
    Coupon,
    AccruedInterestBuy,
    AccruedInterestSell,
    Buyback,
    #[serde(other)]
    Unknown,
}

impl OperationType {
    pub const ALL: [OperationType; 11] = [
        OperationType::Buy,
        OperationType::Sell,
        OperationType::BrokerageFee,
        OperationType::ExchangeFee,
        OperationType::PayIn,
        OperationType::PayOut,
        OperationType::Coupon,
        OperationType::AccruedInterestBuy,
        OperationType::AccruedInterestSell,
        OperationType::Buyback,
        OperationType::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Buy => "Buy",
            OperationType::Sell => "Sell",
            OperationType::BrokerageFee => "BrokerageFee",
            OperationType::ExchangeFee => "ExchangeFee",
            OperationType::PayIn => "PayIn",
            OperationType::PayOut => "PayOut",
            OperationType::Coupon => "Coupon",
            OperationType::AccruedInterestBuy => "AccruedInterestBuy",
            OperationType::AccruedInterestSell => "AccruedInterestSell",
            OperationType::Buyback => "Buyback",
            OperationType::Unknown => "Unknown",
        }
    }

    /// Whether the amount of this operation is credited to the balance.
    ///
    /// Everything else, including `Coupon` and `PayOut`, is debited.
    pub fn increases_balance(&self) -> bool {
        matches!(
            self,
            OperationType::PayIn
                | OperationType::Sell
                | OperationType::Buyback
                | OperationType::AccruedInterestSell
        )
    }

    /// Whether this operation opens a new lot.
    pub fn opens_lot(&self) -> bool {
        matches!(self, OperationType::Buy)
    }

    /// Whether this operation consumes open lots (oldest first).
    pub fn consumes_lots(&self) -> bool {
        matches!(self, OperationType::Sell | OperationType::Buyback)
    }

    /// Buy, Sell and Buyback change the held volume; nothing else does.
    pub fn is_lot_event(&self) -> bool {
        self.opens_lot() || self.consumes_lots()
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(OperationType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .unwrap_or(OperationType::Unknown))
    }
}

/// Currency an operation is denominated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Rub,
    Usd,
    Eur,
    Gbp,
    Hkd,
    Chf,
    Jpy,
    Cny,
    Try,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Rub => "RUB",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Hkd => "HKD",
            Currency::Chf => "CHF",
            Currency::Jpy => "JPY",
            Currency::Cny => "CNY",
            Currency::Try => "TRY",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RUB" => Ok(Currency::Rub),
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "GBP" => Ok(Currency::Gbp),
            "HKD" => Ok(Currency::Hkd),
            "CHF" => Ok(Currency::Chf),
            "JPY" => Ok(Currency::Jpy),
            "CNY" => Ok(Currency::Cny),
            "TRY" => Ok(Currency::Try),
            other => Err(ValidationError::InvalidInput(format!(
                "Unsupported currency '{}'",
                other
            ))),
        }
    }
}

/// What kind of identifier an instrument key holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstrumentKind {
    Isin,
    Figi,
    Ticker,
    Cash,
}

/// Instrument key: an ISIN, a FIGI, a ticker, or the cash sentinel.
///
/// Examples: "IE00BD3QJ757", "BBG005HLSZ23", "FXGD", "RUB/cash"
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstrumentId(String);

impl InstrumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().trim().to_string())
    }

    /// The sentinel instrument cash operations are booked against.
    pub fn cash() -> Self {
        Self(CASH_INSTRUMENT_ID.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_cash(&self) -> bool {
        self.0 == CASH_INSTRUMENT_ID
    }

    pub fn kind(&self) -> InstrumentKind {
        let id = self.0.as_str();
        if self.is_cash() {
            InstrumentKind::Cash
        } else if is_figi(id) {
            InstrumentKind::Figi
        } else if is_isin(id) {
            InstrumentKind::Isin
        } else {
            InstrumentKind::Ticker
        }
    }
}

fn is_figi(id: &str) -> bool {
    id.len() == 12 && id.starts_with("BBG") && id.chars().all(|c| c.is_ascii_alphanumeric())
}

fn is_isin(id: &str) -> bool {
    let bytes = id.as_bytes();
    bytes.len() == 12
        && bytes[..2].iter().all(u8::is_ascii_uppercase)
        && bytes[2..11].iter().all(u8::is_ascii_alphanumeric)
        && bytes[11].is_ascii_digit()
}

impl fmt::Display for InstrumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InstrumentId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for InstrumentId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for InstrumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// An immutable financial event belonging to one portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub id: String,
    pub portfolio_id: String,
    pub instrument_id: InstrumentId,
    pub currency: Currency,
    pub unit_price: Decimal,
    pub volume: i64,
    pub timestamp: DateTime<Utc>,
    pub operation_type: OperationType,
    pub created_at: DateTime<Utc>,
}

impl Operation {
    /// `unit_price * volume` in fixed point.
    pub fn amount(&self) -> Money {
        Money::from_price_and_volume(self.unit_price, self.volume)
    }
}

/// Input model for recording a new operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOperation {
    pub id: Option<String>,
    #[serde(default)]
    pub portfolio_id: String,
    pub instrument_id: String,
    #[serde(default)]
    pub currency: Currency,
    pub unit_price: Decimal,
    pub volume: i64,
    pub timestamp: DateTime<Utc>,
    pub operation_type: OperationType,
}

impl NewOperation {
    /// Validates the input fields.
    pub fn validate(&self) -> Result<()> {
        if self.portfolio_id.trim().is_empty() {
            return Err(ValidationError::MissingField("portfolioId".to_string()).into());
        }
        if self.instrument_id.trim().is_empty() {
            return Err(ValidationError::MissingField("instrumentId".to_string()).into());
        }
        if self.unit_price.is_sign_negative() && !self.unit_price.is_zero() {
            return Err(ValidationError::NegativeValue {
                field: "unitPrice".to_string(),
                value: self.unit_price.to_string(),
            }
            .into());
        }
        if self.volume < 0 {
            return Err(ValidationError::NegativeValue {
                field: "volume".to_string(),
                value: self.volume.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Builds the stored operation, assigning `id` when the input has none.
    pub fn into_operation(self, id: String, created_at: DateTime<Utc>) -> Operation {
        Operation {
            id: self.id.filter(|s| !s.trim().is_empty()).unwrap_or(id),
            portfolio_id: self.portfolio_id,
            instrument_id: InstrumentId::new(self.instrument_id),
            currency: self.currency,
            unit_price: self.unit_price,
            volume: self.volume,
            timestamp: self.timestamp,
            operation_type: self.operation_type,
            created_at,
        }
    }
}

/// Filter applied when reading a portfolio's operation log.
///
/// Both date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationQuery {
    pub instrument_id: Option<InstrumentId>,
    pub currency: Option<Currency>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl OperationQuery {
    pub fn for_instrument(instrument_id: InstrumentId) -> Self {
        Self {
            instrument_id: Some(instrument_id),
            ..Default::default()
        }
    }

    pub fn up_to(to: DateTime<Utc>) -> Self {
        Self {
            to: Some(to),
            ..Default::default()
        }
    }

    pub fn matches(&self, operation: &Operation) -> bool {
        self.instrument_id
            .as_ref()
            .map_or(true, |id| &operation.instrument_id == id)
            && self.currency.map_or(true, |c| operation.currency == c)
            && self.from.map_or(true, |from| operation.timestamp >= from)
            && self.to.map_or(true, |to| operation.timestamp <= to)
    }
}

/// Stable sort by timestamp; operations sharing a timestamp keep their order.
pub fn sort_chronologically(operations: &mut [Operation]) {
    operations.sort_by_key(|op| op.timestamp);
}
