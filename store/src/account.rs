//! Accounts, balances and their storage traits.

use crate::StoreError;
use meridian_types::{
    AccountId, Amount, AssetId, Authority, SpecialAuthority, Timestamp, VestingBalanceId, VoteId,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Voting preferences and committee-size opinions of an account.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountOptions {
    /// The account whose opinions this stake follows.
    /// [`AccountId::PROXY_TO_SELF`] means the stake account itself.
    pub voting_account: AccountId,
    /// Preferred number of elected witnesses.
    pub num_witness: u16,
    /// Preferred committee size.
    pub num_committee: u16,
    /// The vote slots this account approves, ordered by vote id.
    pub votes: BTreeSet<VoteId>,
}

/// An account on the ledger.
///
/// Only the fields the maintenance procedure reads or writes are modeled;
/// keys and addresses live with the signature-validation layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    /// Unique name; account iteration at maintenance is in name order.
    pub name: String,
    /// Past = basic account, `Timestamp::MAX` = lifetime member,
    /// anything else in the future = annual member.
    pub membership_expiration_date: Timestamp,
    /// The account that registered this one.
    pub registrar: AccountId,
    /// The referral-tree parent.
    pub referrer: AccountId,
    pub owner: Authority,
    pub active: Authority,
    pub options: AccountOptions,
    /// Vesting balance receiving fee cashback, when one exists.
    pub cashback_vb: Option<VestingBalanceId>,
    pub blacklisted_accounts: BTreeSet<AccountId>,
    pub owner_special_authority: SpecialAuthority,
    pub active_special_authority: SpecialAuthority,
    /// Bits recording that the top-holders refresh owns an authority.
    pub top_n_control_flags: u8,
    /// Assets a buyback account is allowed to hold; `None` for ordinary
    /// accounts.
    pub allowed_assets: Option<BTreeSet<AssetId>>,
    /// Transfers into this account are treated as reserved; such balances
    /// earn no bonus.
    pub burning_mode_enabled: bool,
    /// Fund deposits of this account renew instead of paying out.
    pub deposits_autorenewal_enabled: bool,
}

impl Account {
    pub fn is_lifetime_member(&self) -> bool {
        self.membership_expiration_date == Timestamp::MAX
    }

    pub fn is_basic_account(&self, now: Timestamp) -> bool {
        now > self.membership_expiration_date
    }

    /// Annual member: unexpired, but not lifetime.
    pub fn is_annual_member(&self, now: Timestamp) -> bool {
        !self.is_lifetime_member() && !self.is_basic_account(now)
    }

    pub fn is_member(&self, now: Timestamp) -> bool {
        !self.is_basic_account(now)
    }
}

/// Frequently updated statistics, kept apart from the mostly-static
/// account record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountStatistics {
    pub owner: AccountId,
    /// Newest entry of the account's history chain.
    pub most_recent_op: Option<meridian_types::HistoryEntryId>,
    pub total_ops: u32,
    /// Core locked in open orders; counts toward voting stake.
    pub total_core_in_orders: Amount,
    pub lifetime_fees_paid: Amount,
    /// Fees awaiting payout as vesting cashback.
    pub pending_fees: Amount,
    /// Fees awaiting payout as immediately withdrawable cashback.
    pub pending_vested_fees: Amount,
}

/// A vesting balance; the vesting policy itself is evaluated elsewhere.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingBalance {
    pub id: VestingBalanceId,
    pub owner: AccountId,
    pub balance: Amount,
}

/// The balance of a single (account, asset) pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub owner: AccountId,
    pub asset: AssetId,
    pub balance: Amount,
}

/// One interval of mature-balance history.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatureBalanceEntry {
    pub real_balance: Amount,
    pub balance: Amount,
}

/// The bonus-eligible portion of an (account, asset) balance.
///
/// Per-block accruals land in `pending_accrual` during the interval and
/// are folded into `balance` by the daily issuance pass; pruning rebases
/// the record to the real balance.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatureBalance {
    pub owner: AccountId,
    pub asset: AssetId,
    pub balance: Amount,
    pub pending_accrual: Amount,
    pub history: Vec<MatureBalanceEntry>,
}

/// Bonus credits accrued on one calendar day.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusEntry {
    /// Start of the day the credits belong to.
    pub bonus_time: Timestamp,
    pub balances: BTreeMap<AssetId, Amount>,
    /// Deferred referral award, denominated in the bonus asset.
    pub referral: Amount,
}

impl BonusEntry {
    pub fn is_empty(&self) -> bool {
        self.balances.is_empty() && self.referral.is_zero()
    }
}

/// Deferred bonus credits awaiting materialization, grouped by day.
///
/// Credits earned today stay deferred until a later maintenance call
/// materializes them into real balances.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusBalance {
    pub owner: AccountId,
    /// Ordered by `bonus_time`, oldest first.
    pub entries: Vec<BonusEntry>,
}

impl BonusBalance {
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(BonusEntry::is_empty)
    }

    /// The entry for a given day, created on demand.
    pub fn entry_for(&mut self, day_start: Timestamp) -> &mut BonusEntry {
        if let Some(pos) = self.entries.iter().position(|e| e.bonus_time == day_start) {
            &mut self.entries[pos]
        } else {
            let pos = self
                .entries
                .iter()
                .position(|e| e.bonus_time > day_start)
                .unwrap_or(self.entries.len());
            self.entries.insert(
                pos,
                BonusEntry {
                    bonus_time: day_start,
                    ..Default::default()
                },
            );
            &mut self.entries[pos]
        }
    }
}

/// Account records, statistics, vesting balances, and the online-minutes
/// singleton.
pub trait AccountStore {
    /// All accounts ordered by name.
    fn accounts_by_name(&self) -> Result<Vec<Account>, StoreError>;

    /// All accounts ordered by id.
    fn accounts_by_id(&self) -> Result<Vec<Account>, StoreError>;

    fn get_account(&self, id: AccountId) -> Result<Account, StoreError>;

    fn put_account(&self, account: &Account) -> Result<(), StoreError>;

    fn account_statistics(&self, id: AccountId) -> Result<AccountStatistics, StoreError>;

    fn put_account_statistics(&self, stats: &AccountStatistics) -> Result<(), StoreError>;

    fn vesting_balance(&self, id: VestingBalanceId) -> Result<VestingBalance, StoreError>;

    fn put_vesting_balance(&self, vb: &VestingBalance) -> Result<(), StoreError>;

    /// Ids of accounts carrying a special authority, ordered by id.
    fn accounts_with_special_authority(&self) -> Result<Vec<AccountId>, StoreError>;

    /// Minutes-online-today per account (singleton map).
    fn online_minutes(&self) -> Result<BTreeMap<AccountId, u16>, StoreError>;

    fn put_online_minutes(&self, map: &BTreeMap<AccountId, u16>) -> Result<(), StoreError>;
}

/// Real, mature, and deferred-bonus balances.
pub trait BalanceStore {
    /// Balance of an (account, asset) pair; zero when no record exists.
    fn balance(&self, account: AccountId, asset: AssetId) -> Result<Amount, StoreError>;

    /// Credit or debit a balance.
    fn adjust_balance(
        &self,
        account: AccountId,
        asset: AssetId,
        delta: Amount,
    ) -> Result<(), StoreError>;

    /// The account's first balance record with `asset >= start`, in
    /// ascending asset order. Cursor primitive for sweeps that mutate
    /// balances while iterating.
    fn first_balance_at_or_after(
        &self,
        account: AccountId,
        start: AssetId,
    ) -> Result<Option<AccountBalance>, StoreError>;

    /// Holders of an asset ordered by (balance desc, owner asc).
    fn holders_by_balance(&self, asset: AssetId) -> Result<Vec<AccountBalance>, StoreError>;

    fn mature_balance(
        &self,
        account: AccountId,
        asset: AssetId,
    ) -> Result<Option<MatureBalance>, StoreError>;

    /// Every mature-balance record, ordered by (owner, asset).
    fn mature_balances(&self) -> Result<Vec<MatureBalance>, StoreError>;

    fn put_mature_balance(&self, mb: &MatureBalance) -> Result<(), StoreError>;

    fn bonus_balance(&self, account: AccountId) -> Result<Option<BonusBalance>, StoreError>;

    fn put_bonus_balance(&self, bb: &BonusBalance) -> Result<(), StoreError>;
}
