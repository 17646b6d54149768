//! Weight compression for rebuilt authorities.
//!
//! Raw vote totals are 64-bit; authority weights are 16-bit. The counter
//! takes candidates in non-increasing vote order, derives the shift from
//! the first (largest) weight so the most significant 16 bits survive,
//! folds duplicate accounts, and finalizes the threshold in one step.

use meridian_types::{AccountId, Authority};
use std::collections::BTreeMap;

/// Bits to drop so `v` fits in 16 bits.
pub(crate) fn bits_to_drop(v: u64) -> u32 {
    if v == 0 {
        0
    } else {
        (63 - v.leading_zeros()).saturating_sub(15)
    }
}

/// Accumulates compressed account weights and finalizes an authority.
#[derive(Debug, Default)]
pub struct VoteCounter {
    bitshift: Option<u32>,
    last_votes: u64,
    total: u32,
    weights: BTreeMap<AccountId, u16>,
}

impl VoteCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a candidate's weight. Zero weights are skipped entirely.
    /// Callers must feed weights in non-increasing order.
    pub fn add(&mut self, who: AccountId, votes: u64) {
        if votes == 0 {
            return;
        }
        debug_assert!(
            self.bitshift.is_none() || votes <= self.last_votes,
            "weights must be non-increasing"
        );
        self.last_votes = votes;
        let shift = *self.bitshift.get_or_insert_with(|| bits_to_drop(votes));
        let scaled = (votes >> shift).max(1) as u16;
        let entry = self.weights.entry(who).or_insert(0);
        *entry = entry.saturating_add(scaled);
        self.total += u32::from(scaled);
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Overwrite `auth` with the accumulated weights and a majority
    /// threshold. An empty counter leaves the authority untouched.
    pub fn finish(self, auth: &mut Authority) {
        if self.weights.is_empty() {
            return;
        }
        auth.clear();
        auth.account_auths = self
            .weights
            .into_iter()
            .collect();
        auth.weight_threshold = self.total / 2 + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_weights_pass_through() {
        let mut vc = VoteCounter::new();
        vc.add(AccountId::new(1), 100);
        vc.add(AccountId::new(2), 50);

        let mut auth = Authority::new();
        vc.finish(&mut auth);
        assert_eq!(auth.account_auths[&AccountId::new(1)], 100);
        assert_eq!(auth.account_auths[&AccountId::new(2)], 50);
        assert_eq!(auth.weight_threshold, 150 / 2 + 1);
    }

    #[test]
    fn large_weights_are_compressed_to_16_bits() {
        let mut vc = VoteCounter::new();
        vc.add(AccountId::new(1), 1 << 40);
        vc.add(AccountId::new(2), 1 << 39);
        vc.add(AccountId::new(3), 1);

        let mut auth = Authority::new();
        vc.finish(&mut auth);
        assert_eq!(auth.account_auths[&AccountId::new(1)], 1 << 15);
        assert_eq!(auth.account_auths[&AccountId::new(2)], 1 << 14);
        // far below the quantum, but everyone keeps at least one vote
        assert_eq!(auth.account_auths[&AccountId::new(3)], 1);
    }

    #[test]
    fn duplicate_accounts_fold() {
        let mut vc = VoteCounter::new();
        vc.add(AccountId::new(7), 30);
        vc.add(AccountId::new(7), 20);

        let mut auth = Authority::new();
        vc.finish(&mut auth);
        assert_eq!(auth.account_auths.len(), 1);
        assert_eq!(auth.account_auths[&AccountId::new(7)], 50);
    }

    #[test]
    fn empty_counter_keeps_previous_authority() {
        let mut vc = VoteCounter::new();
        vc.add(AccountId::new(1), 0);
        assert!(vc.is_empty());

        let mut auth = Authority::new();
        auth.weight_threshold = 42;
        auth.add_account_weight(AccountId::new(9), 3);
        vc.finish(&mut auth);
        assert_eq!(auth.weight_threshold, 42);
        assert_eq!(auth.account_auths.len(), 1);
    }

    #[test]
    fn bits_to_drop_of_zero_is_zero() {
        assert_eq!(bits_to_drop(0), 0);
        assert_eq!(bits_to_drop(0xFFFF), 0);
        assert_eq!(bits_to_drop(0x1_0000), 1);
    }
}
