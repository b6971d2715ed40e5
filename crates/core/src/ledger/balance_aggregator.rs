//! Signed cash-flow summation over an operation set.

use rust_decimal::Decimal;

use crate::money::Money;
use crate::operations::{Operation, OperationType};

/// Signed contribution of a single operation to the balance.
pub fn signed_amount(operation_type: OperationType, amount: Money) -> Money {
    if operation_type.increases_balance() {
        amount
    } else {
        -amount
    }
}

/// Sums operation amounts in fixed point.
#[derive(Debug, Clone, Copy, Default)]
pub struct BalanceAggregator {
    total: Money,
}

impl BalanceAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, operation: &Operation) {
        self.total += signed_amount(operation.operation_type, operation.amount());
    }

    pub fn total(&self) -> Money {
        self.total
    }

    /// Balance rounded to cents.
    pub fn balance(&self) -> Decimal {
        self.total.to_cents()
    }

    /// Balance of `operations`; zero when empty.
    pub fn aggregate<'a, I>(operations: I) -> Decimal
    where
        I: IntoIterator<Item = &'a Operation>,
    {
        let mut aggregator = Self::new();
        for operation in operations {
            aggregator.apply(operation);
        }
        aggregator.balance()
    }
}
