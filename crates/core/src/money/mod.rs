//! Fixed-point money used by every ledger summation.

mod fixed_point;

pub use fixed_point::{round_half_away, Money};
