//! FIFO lot matching.

use std::collections::VecDeque;

use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::DECIMAL_PRECISION;
use crate::money::{round_half_away, Money};
use crate::operations::Operation;

/// An open quantity acquired at one price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lot {
    pub unit_price: Decimal,
    pub volume: i64,
}

impl Lot {
    pub fn cost(&self) -> Money {
        Money::from_price_and_volume(self.unit_price, self.volume)
    }
}

/// Open lots, oldest at the front.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LotQueue {
    lots: VecDeque<Lot>,
}

impl LotQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, lot: Lot) {
        if lot.volume <= 0 {
            return;
        }
        self.lots.push_back(lot);
    }

    /// Consumes `volume` from the oldest lots and returns the part that could
    /// not be matched.
    pub fn consume(&mut self, volume: i64) -> i64 {
        let mut remaining = volume;
        while remaining > 0 {
            let Some(front) = self.lots.front_mut() else {
                break;
            };
            if front.volume <= remaining {
                remaining -= front.volume;
                self.lots.pop_front();
            } else {
                front.volume -= remaining;
                remaining = 0;
            }
        }
        remaining
    }

    pub fn is_empty(&self) -> bool {
        self.lots.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lots.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Lot> {
        self.lots.iter()
    }

    pub fn total_volume(&self) -> i64 {
        self.lots
            .iter()
            .fold(0i64, |total, lot| total.saturating_add(lot.volume))
    }

    /// Volume-weighted average price of the open lots, six decimals.
    pub fn average_price(&self) -> Decimal {
        let volume = self.total_volume();
        if volume == 0 {
            return Decimal::ZERO;
        }
        let cost: Money = self.lots.iter().map(Lot::cost).sum();
        cost.to_decimal()
            .checked_div(Decimal::from(volume))
            .map(|avg| round_half_away(avg, DECIMAL_PRECISION))
            .unwrap_or(Decimal::ZERO)
    }

    pub fn into_lots(self) -> Vec<Lot> {
        self.lots.into()
    }
}

/// Replays one instrument's operations through a [`LotQueue`].
#[derive(Debug, Clone, Default)]
pub struct FifoCostMatcher {
    queue: LotQueue,
    discarded_volume: i64,
}

impl FifoCostMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, operation: &Operation) {
        let operation_type = operation.operation_type;
        if operation_type.opens_lot() {
            self.queue.push(Lot {
                unit_price: operation.unit_price,
                volume: operation.volume,
            });
        } else if operation_type.consumes_lots() {
            let excess = self.queue.consume(operation.volume);
            if excess > 0 {
                debug!(
                    "{} {} of {} exceeds open lots by {}, discarding excess",
                    operation_type, operation.volume, operation.instrument_id, excess
                );
                self.discarded_volume = self.discarded_volume.saturating_add(excess);
            }
        }
    }

    pub fn match_all<'a, I>(operations: I) -> Self
    where
        I: IntoIterator<Item = &'a Operation>,
    {
        let mut matcher = Self::new();
        for operation in operations {
            matcher.apply(operation);
        }
        matcher
    }

    pub fn open_lots(&self) -> &LotQueue {
        &self.queue
    }

    /// Consumed volume that found no open lot.
    pub fn discarded_volume(&self) -> i64 {
        self.discarded_volume
    }

    pub fn average_price(&self) -> Decimal {
        self.queue.average_price()
    }
}
