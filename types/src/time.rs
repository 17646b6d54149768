//! Timestamp type used throughout the protocol.
//!
//! Timestamps are Unix epoch seconds (UTC). Consensus code never reads the
//! system clock; every timestamp comes from a block header.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const HOUR_SECS: u64 = 3_600;
pub const DAY_SECS: u64 = 86_400;

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch (time zero). Doubles as "never set".
    pub const EPOCH: Self = Self(0);
    /// The far future. Doubles as "never expires".
    pub const MAX: Self = Self(u64::MAX);

    pub const fn new(secs: u64) -> Self {
        Self(secs)
    }

    pub const fn as_secs(&self) -> u64 {
        self.0
    }

    pub fn is_epoch(&self) -> bool {
        self.0 == 0
    }

    pub fn saturating_add_secs(&self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }

    pub fn saturating_sub_secs(&self, secs: u64) -> Self {
        Self(self.0.saturating_sub(secs))
    }

    /// Signed distance in seconds from `self` to `later`.
    pub fn delta_secs(&self, later: Timestamp) -> i64 {
        let wide = i128::from(later.0) - i128::from(self.0);
        wide.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
    }

    /// Seconds elapsed since this timestamp, zero if it lies in the future.
    pub fn elapsed_since(&self, now: Timestamp) -> u64 {
        now.0.saturating_sub(self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_is_signed() {
        let a = Timestamp::new(100);
        let b = Timestamp::new(40);
        assert_eq!(a.delta_secs(b), -60);
        assert_eq!(b.delta_secs(a), 60);
    }

    #[test]
    fn elapsed_clamps_future() {
        let later = Timestamp::new(500);
        assert_eq!(later.elapsed_since(Timestamp::new(100)), 0);
        assert_eq!(Timestamp::new(100).elapsed_since(later), 400);
    }
}
