use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub};

use log::warn;
use num_traits::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::constants::{DISPLAY_DECIMAL_PRECISION, MONEY_SCALE};

const MICROS_PER_UNIT: i128 = 1_000_000;

/// Monetary amount stored as an integer count of micro-units (10^-6).
///
/// Conversions to and from `Decimal` happen only at the edges; every sum in
/// between is exact integer arithmetic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i128);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn from_micros(micros: i128) -> Self {
        Money(micros)
    }

    pub fn micros(&self) -> i128 {
        self.0
    }

    /// Converts a decimal amount, rounding half away from zero at the sixth decimal.
    pub fn from_decimal(amount: Decimal) -> Self {
        let scaled = match amount.checked_mul(Decimal::from(MICROS_PER_UNIT as i64)) {
            Some(v) => v,
            None => {
                warn!("Amount {} overflows fixed-point range, saturating", amount);
                return if amount.is_sign_negative() {
                    Money(i128::MIN)
                } else {
                    Money(i128::MAX)
                };
            }
        };
        let rounded = scaled.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        Money(rounded.to_i128().unwrap_or_default())
    }

    /// `unit_price * volume`, rounding the unit price first.
    pub fn from_price_and_volume(unit_price: Decimal, volume: i64) -> Self {
        Money::from_decimal(unit_price).times(volume)
    }

    pub fn times(self, factor: i64) -> Self {
        Money(self.0.saturating_mul(factor as i128))
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Exact decimal value with six fractional digits.
    pub fn to_decimal(self) -> Decimal {
        match Decimal::try_from_i128_with_scale(self.0, MONEY_SCALE) {
            Ok(d) => d,
            Err(_) => {
                warn!("Fixed-point amount {} micros exceeds decimal range, saturating", self.0);
                if self.0 < 0 {
                    Decimal::MIN
                } else {
                    Decimal::MAX
                }
            }
        }
    }

    /// Decimal value rounded to cents, half away from zero.
    pub fn to_cents(self) -> Decimal {
        round_half_away(self.to_decimal(), DISPLAY_DECIMAL_PRECISION)
    }
}

/// Rounds to `dp` decimal places, half away from zero.
pub fn round_half_away(value: Decimal, dp: u32) -> Decimal {
    value
        .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(self.0.saturating_neg())
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money::from_decimal(amount)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}
