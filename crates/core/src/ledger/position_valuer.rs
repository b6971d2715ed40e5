//! As-of-date holdings joined with nearest-prior prices.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use super::balance_aggregator::signed_amount;
use super::positions_model::PositionValuation;
use crate::constants::{CASH_TICKER, PRICE_LOOKBACK_DAYS};
use crate::money::Money;
use crate::operations::{InstrumentId, Operation};
use crate::prices::PricePoint;

/// Start of the price lookback window ending at `date`.
pub fn window_start(date: DateTime<Utc>) -> DateTime<Utc> {
    date - Duration::days(PRICE_LOOKBACK_DAYS)
}

/// Latest point in `[date - lookback, date]`. On an exact timestamp tie the
/// first point encountered wins.
pub fn select_price<'a, I>(prices: I, date: DateTime<Utc>) -> Option<&'a PricePoint>
where
    I: IntoIterator<Item = &'a PricePoint>,
{
    let start = window_start(date);
    prices
        .into_iter()
        .filter(|p| p.timestamp >= start && p.timestamp <= date)
        .fold(None, |best: Option<&PricePoint>, p| match best {
            Some(b) if b.timestamp >= p.timestamp => Some(b),
            _ => Some(p),
        })
}

/// Net volume per instrument in order of first appearance, plus the cash total.
#[derive(Debug, Clone, Default)]
pub struct Holdings {
    order: Vec<InstrumentId>,
    volumes: HashMap<InstrumentId, i64>,
    cash: Money,
}

impl Holdings {
    pub fn from_operations<'a, I>(operations: I, date: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = &'a Operation>,
    {
        let mut holdings = Self::default();
        for operation in operations.into_iter().filter(|op| op.timestamp <= date) {
            holdings.apply(operation);
        }
        holdings
    }

    fn apply(&mut self, operation: &Operation) {
        let operation_type = operation.operation_type;
        self.cash += signed_amount(operation_type, operation.amount());

        if operation.instrument_id.is_cash() {
            return;
        }
        if !self.volumes.contains_key(&operation.instrument_id) {
            self.order.push(operation.instrument_id.clone());
        }
        let volume = self
            .volumes
            .entry(operation.instrument_id.clone())
            .or_insert(0);
        if operation_type.opens_lot() {
            *volume = volume.saturating_add(operation.volume);
        } else if operation_type.consumes_lots() {
            *volume = volume.saturating_sub(operation.volume);
        }
    }

    /// Instruments with nonzero net volume, in order of first appearance.
    pub fn held(&self) -> impl Iterator<Item = (&InstrumentId, i64)> {
        self.order.iter().filter_map(|id| {
            let volume = self.volumes.get(id).copied().unwrap_or_default();
            (volume != 0).then_some((id, volume))
        })
    }

    pub fn cash(&self) -> Money {
        self.cash
    }
}

/// Builds valued positions from pre-fetched collaborator data.
pub struct PositionValuer<'a> {
    prices: &'a HashMap<InstrumentId, Vec<PricePoint>>,
    tickers: &'a HashMap<InstrumentId, String>,
}

impl<'a> PositionValuer<'a> {
    pub fn new(
        prices: &'a HashMap<InstrumentId, Vec<PricePoint>>,
        tickers: &'a HashMap<InstrumentId, String>,
    ) -> Self {
        Self { prices, tickers }
    }

    pub fn value(&self, operations: &[Operation], date: DateTime<Utc>) -> Vec<PositionValuation> {
        let holdings = Holdings::from_operations(operations, date);
        let mut positions: Vec<PositionValuation> = holdings
            .held()
            .map(|(id, volume)| PositionValuation {
                instrument_id: id.clone(),
                ticker: self.tickers.get(id).cloned().unwrap_or_default(),
                volume,
                valuation_date: date,
                valuation_price: self.price_of(id, date),
            })
            .collect();

        let cash = holdings.cash().to_cents();
        if !cash.is_zero() {
            positions.push(PositionValuation {
                instrument_id: InstrumentId::cash(),
                ticker: CASH_TICKER.to_string(),
                volume: 0,
                valuation_date: date,
                valuation_price: cash,
            });
        }
        positions
    }

    fn price_of(&self, instrument_id: &InstrumentId, date: DateTime<Utc>) -> Decimal {
        self.prices
            .get(instrument_id)
            .and_then(|points| select_price(points, date))
            .map(|p| p.price)
            .unwrap_or(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::test_fixtures::{at, day, op};
    use crate::operations::OperationType;
    use rust_decimal_macros::dec;

    fn point(id: &str, ts: DateTime<Utc>, price: Decimal) -> PricePoint {
        PricePoint::new(id.into(), ts, price, 0, "TEST")
    }

    #[test]
    fn test_select_price_prefers_latest_in_window() {
        let date = day(20);
        let points = vec![
            point("FXGD", day(9), dec!(1)),
            point("FXGD", day(12), dec!(2)),
            point("FXGD", day(18), dec!(3)),
            point("FXGD", day(21), dec!(4)),
        ];
        assert_eq!(select_price(&points, date).map(|p| p.price), Some(dec!(3)));
    }

    #[test]
    fn test_select_price_window_bounds_are_inclusive() {
        let date = day(20);
        let points = vec![point("FXGD", window_start(date), dec!(7))];
        assert_eq!(select_price(&points, date).map(|p| p.price), Some(dec!(7)));

        let points = vec![point("FXGD", window_start(date) - Duration::seconds(1), dec!(7))];
        assert!(select_price(&points, date).is_none());
    }

    #[test]
    fn test_select_price_tie_keeps_first() {
        let date = day(20);
        let points = vec![
            point("FXGD", day(19), dec!(1)),
            point("FXGD", day(19), dec!(2)),
        ];
        assert_eq!(select_price(&points, date).map(|p| p.price), Some(dec!(1)));
    }

    #[test]
    fn test_window_miss_values_at_zero() {
        let ops = vec![op(1, "FXGD", OperationType::Buy, dec!(600), 3)];
        let prices = HashMap::from([(
            InstrumentId::new("FXGD"),
            vec![point("FXGD", day(1), dec!(610))],
        )]);
        let tickers = HashMap::new();
        let positions = PositionValuer::new(&prices, &tickers).value(&ops, day(25));

        assert_eq!(positions.len(), 2);
        assert_eq!(positions[0].volume, 3);
        assert_eq!(positions[0].valuation_price, Decimal::ZERO);
        assert_eq!(positions[0].ticker, "");
        assert!(positions[1].is_cash());
        assert_eq!(positions[1].valuation_price, dec!(-1800));
    }

    #[test]
    fn test_empty_history_yields_no_positions() {
        let prices = HashMap::new();
        let tickers = HashMap::new();
        assert!(PositionValuer::new(&prices, &tickers)
            .value(&[], day(1))
            .is_empty());
    }

    #[test]
    fn test_operations_after_date_are_ignored() {
        let ops = vec![
            op(1, "RUB/cash", OperationType::PayIn, dec!(1), 100),
            op(5, "FXGD", OperationType::Buy, dec!(100), 1),
        ];
        let prices = HashMap::new();
        let tickers = HashMap::new();
        let positions = PositionValuer::new(&prices, &tickers).value(&ops, at(3, 0));
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].ticker, CASH_TICKER);
        assert_eq!(positions[0].valuation_price, dec!(100));
    }

    #[test]
    fn test_holdings_volume_saturates() {
        let ops = vec![
            op(1, "FXGD", OperationType::Buy, dec!(0), i64::MAX),
            op(2, "FXGD", OperationType::Buy, dec!(0), i64::MAX),
            op(3, "FXIT", OperationType::Sell, dec!(0), i64::MAX),
            op(4, "FXIT", OperationType::Buyback, dec!(0), i64::MAX),
        ];
        let holdings = Holdings::from_operations(&ops, day(10));
        let held: Vec<_> = holdings.held().map(|(id, v)| (id.as_str(), v)).collect();
        assert_eq!(held, vec![("FXGD", i64::MAX), ("FXIT", i64::MIN)]);
    }

    #[test]
    fn test_end_to_end_scenario() {
        let ops = vec![
            op(1, "RUB/cash", OperationType::PayIn, dec!(1), 100000),
            op(2, "FXIT", OperationType::Buy, dec!(4195), 1),
            op(3, "FXGD", OperationType::Buy, dec!(590.7), 40),
            op(4, "FXGD", OperationType::Sell, dec!(595), 20),
            op(5, "FXIT", OperationType::Sell, dec!(4230), 1),
            op(6, "FXGD", OperationType::Sell, dec!(604.9), 10),
        ];
        let prices = HashMap::from([
            (
                InstrumentId::new("FXIT"),
                vec![point("FXIT", day(6), dec!(4240)), point("FXIT", day(7), dec!(4251))],
            ),
            (
                InstrumentId::new("FXGD"),
                vec![
                    point("FXGD", day(6), dec!(605.1)),
                    point("FXGD", day(7), dec!(606.4)),
                    point("FXGD", day(9), dec!(611)),
                ],
            ),
        ]);
        let tickers = HashMap::from([
            (InstrumentId::new("FXIT"), "FXIT".to_string()),
            (InstrumentId::new("FXGD"), "FXGD".to_string()),
        ]);
        let date = day(8);

        let valuer = PositionValuer::new(&prices, &tickers);
        let positions = valuer.value(&ops, date);

        assert_eq!(positions.len(), 2);
        assert_eq!(positions[0].instrument_id.as_str(), "FXGD");
        assert_eq!(positions[0].ticker, "FXGD");
        assert_eq!(positions[0].volume, 10);
        assert_eq!(positions[0].valuation_price, dec!(606.4));
        assert_eq!(positions[0].valuation_date, date);

        assert!(positions[1].is_cash());
        assert_eq!(positions[1].ticker, "RUB");
        assert_eq!(positions[1].volume, 0);
        assert_eq!(positions[1].valuation_price, dec!(94356));

        assert_eq!(valuer.value(&ops, date), positions);
    }
}
