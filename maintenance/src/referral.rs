//! The referral tree.
//!
//! Edges are the accounts' referrer links; a node's weight is its
//! bonus-eligible balance. The tree is rebuilt from scratch every bonus
//! pass, scanned once, and discarded. A referrer's rank follows from its
//! direct-partner count and subtree sum, and decides the percentage of
//! the subtree sum it is awarded.

use meridian_store::operations::{ChildBalance, ReferralRank};
use meridian_store::Account;
use meridian_types::{AccountId, Amount};
use std::collections::{BTreeMap, BTreeSet};

/// Rank table, strongest first: (min direct partners, min subtree sum in
/// whole units, rank, award in hundredths of a percent).
const RANK_TABLE: [(usize, i64, ReferralRank, u32); 4] = [
    (25, 100_000, ReferralRank::A, 500),
    (10, 10_000, ReferralRank::B, 300),
    (5, 1_000, ReferralRank::C, 200),
    (2, 100, ReferralRank::D, 100),
];

fn rank_for(direct_partners: usize, subtree_units: i64) -> Option<(ReferralRank, u32)> {
    RANK_TABLE
        .iter()
        .find(|(partners, units, _, _)| direct_partners >= *partners && subtree_units >= *units)
        .map(|(_, _, rank, pct)| (*rank, *pct))
}

/// A bonus owed to one referrer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferralAward {
    pub to: AccountId,
    pub amount: Amount,
    pub rank: ReferralRank,
    pub history: Vec<ChildBalance>,
}

/// A freshly built referral tree.
pub struct ReferralTree {
    children: BTreeMap<AccountId, Vec<AccountId>>,
    balances: BTreeMap<AccountId, Amount>,
}

impl ReferralTree {
    /// Build the tree from the full account set. `accounts` must be in id
    /// order; self-referrals contribute no edge.
    pub fn build(
        accounts: &[Account],
        mut balance_of: impl FnMut(AccountId) -> Amount,
    ) -> Self {
        let mut children: BTreeMap<AccountId, Vec<AccountId>> = BTreeMap::new();
        let mut balances = BTreeMap::new();
        for account in accounts {
            balances.insert(account.id, balance_of(account.id));
            if account.referrer != account.id {
                children.entry(account.referrer).or_default().push(account.id);
            }
        }
        Self { children, balances }
    }

    fn balance(&self, account: AccountId) -> Amount {
        self.balances.get(&account).copied().unwrap_or(Amount::ZERO)
    }

    /// Sum of all descendants' balances. Defensive against cycles.
    fn subtree_sum(&self, root: AccountId) -> Amount {
        let mut sum = Amount::ZERO;
        let mut visited = BTreeSet::new();
        visited.insert(root);
        let mut stack: Vec<AccountId> = self
            .children
            .get(&root)
            .map(|kids| kids.clone())
            .unwrap_or_default();
        while let Some(node) = stack.pop() {
            if !visited.insert(node) {
                continue;
            }
            sum = sum.saturating_add(self.balance(node));
            if let Some(kids) = self.children.get(&node) {
                stack.extend(kids.iter().copied());
            }
        }
        sum
    }

    /// Decide every referrer's award. `whole_unit` converts the rank
    /// thresholds into smallest units of the bonus asset.
    pub fn scan(&self, whole_unit: i64) -> Vec<ReferralAward> {
        let mut awards = Vec::new();
        for (&referrer, kids) in &self.children {
            let subtree = self.subtree_sum(referrer);
            let subtree_units = if whole_unit > 0 {
                subtree.raw() / whole_unit
            } else {
                subtree.raw()
            };
            let Some((rank, pct)) = rank_for(kids.len(), subtree_units) else {
                continue;
            };
            let amount = meridian_types::percent_floor(subtree, pct);
            if amount.raw() < 1 {
                continue;
            }
            let history = kids
                .iter()
                .map(|&kid| ChildBalance {
                    account: kid,
                    balance: self.balance(kid),
                })
                .collect();
            awards.push(ReferralAward {
                to: referrer,
                amount,
                rank,
                history,
            });
        }
        awards
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_types::{Authority, SpecialAuthority, Timestamp};

    fn account(id: u64, referrer: u64) -> Account {
        Account {
            id: AccountId::new(id),
            name: format!("acct{id}"),
            membership_expiration_date: Timestamp::MAX,
            registrar: AccountId::new(referrer),
            referrer: AccountId::new(referrer),
            owner: Authority::new(),
            active: Authority::new(),
            options: Default::default(),
            cashback_vb: None,
            blacklisted_accounts: Default::default(),
            owner_special_authority: SpecialAuthority::None,
            active_special_authority: SpecialAuthority::None,
            top_n_control_flags: 0,
            allowed_assets: None,
            burning_mode_enabled: false,
            deposits_autorenewal_enabled: true,
        }
    }

    #[test]
    fn rank_requires_both_thresholds() {
        assert_eq!(rank_for(2, 100), Some((ReferralRank::D, 100)));
        assert_eq!(rank_for(1, 1_000_000), None);
        assert_eq!(rank_for(30, 50), None);
        assert_eq!(rank_for(25, 100_000), Some((ReferralRank::A, 500)));
    }

    #[test]
    fn scan_awards_percent_of_subtree() {
        // referrer 1 with direct referees 2 and 3, and a grandchild 4
        let accounts = vec![account(1, 1), account(2, 1), account(3, 1), account(4, 2)];
        let tree = ReferralTree::build(&accounts, |id| match id.instance() {
            2 => Amount::new(60_000),
            3 => Amount::new(40_000),
            4 => Amount::new(10_000),
            _ => Amount::ZERO,
        });

        let awards = tree.scan(100);
        // subtree of 1: 110_000 raw = 1_100 units with 2 direct partners
        // -> rank D at 1%
        let award_1 = awards.iter().find(|a| a.to == AccountId::new(1)).unwrap();
        assert_eq!(award_1.rank, ReferralRank::D);
        assert_eq!(award_1.amount, Amount::new(1_100));
        assert_eq!(award_1.history.len(), 2);

        // account 2 has one direct partner only: below every rank
        assert!(awards.iter().all(|a| a.to != AccountId::new(2)));
    }

    #[test]
    fn mutual_referral_does_not_loop() {
        let accounts = vec![account(1, 2), account(2, 1), account(3, 1), account(4, 1)];
        let tree = ReferralTree::build(&accounts, |_| Amount::new(10_000));
        // termination is the point; awards only need to be well-formed
        let awards = tree.scan(100);
        for award in awards {
            assert!(award.amount.raw() > 0);
        }
    }
}
