//! Monetary amounts.
//!
//! All monetary quantities are signed 64-bit integers of the asset's
//! smallest unit. Consensus arithmetic uses the checked operations; plain
//! operators exist for test convenience and panic on overflow like any
//! other integer arithmetic in debug builds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// 100% expressed in hundredths of a percent.
pub const FULL_PERCENT: u32 = 10_000;

/// A signed amount of some asset's smallest unit.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Self = Self(0);
    pub const MAX: Self = Self(i64::MAX);

    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn raw(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn checked_mul(self, factor: i64) -> Option<Self> {
        self.0.checked_mul(factor).map(Self)
    }

    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// The amount as unsigned stake weight; negative amounts weigh nothing.
    pub fn positive_u64(&self) -> u64 {
        if self.0 > 0 {
            self.0 as u64
        } else {
            0
        }
    }
}

/// `floor(amount * pct / 100%)` computed in 128-bit arithmetic.
pub fn percent_floor(amount: Amount, pct: u32) -> Amount {
    let wide = i128::from(amount.raw()) * i128::from(pct) / i128::from(FULL_PERCENT);
    Amount::new(wide as i64)
}

impl Add for Amount {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Amount {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Amount {
    type Output = Self;
    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, a| acc + a)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_ops_detect_overflow() {
        assert_eq!(Amount::MAX.checked_add(Amount::new(1)), None);
        assert_eq!(
            Amount::new(10).checked_sub(Amount::new(3)),
            Some(Amount::new(7))
        );
    }

    #[test]
    fn positive_u64_clamps_negatives() {
        assert_eq!(Amount::new(-5).positive_u64(), 0);
        assert_eq!(Amount::new(5).positive_u64(), 5);
    }

    #[test]
    fn percent_floor_rounds_down() {
        // 1000 * 33.33% = 333.3 -> 333
        assert_eq!(percent_floor(Amount::new(1000), 3_333), Amount::new(333));
        assert_eq!(percent_floor(Amount::new(1000), FULL_PERCENT), Amount::new(1000));
    }
}
