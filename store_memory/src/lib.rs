//! Deterministic in-memory storage backend.
//!
//! Every table is an ordered map guarded by a `Mutex`, so iteration order
//! is the index key order the consensus code expects, and two runs over
//! the same contents observe identical sequences. This backend backs the
//! consensus test suites; production nodes plug a persistent object store
//! into the same traits.

mod accounts;
mod assets;
mod funds;
mod global;
mod history;
mod market;
mod producers;

use meridian_store::{
    Account, AccountHistoryEntry, AccountStatistics, Asset, AssetDynamicData, BitassetData,
    BonusBalance, Cheque, CommitteeMember, DynamicGlobalProperties, FbaAccumulator, Fund,
    FundDeposit, FundHistoryEntry, GlobalProperties, MatureBalance, OperationHistory,
    VestingBalance, Witness, Worker,
};
use meridian_types::{
    AccountId, AssetId, Amount, BudgetRecordId, ChequeId, CommitteeMemberId, FbaAccumulatorId,
    FundDepositId, FundId, HistoryEntryId, LimitOrderId, OperationHistoryId, Timestamp,
    VestingBalanceId, VoteId, VoteKind, WitnessId, WorkerId,
};
use meridian_store::global::BudgetRecord;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

#[derive(Default)]
pub(crate) struct AccountTables {
    pub accounts: BTreeMap<AccountId, Account>,
    pub by_name: BTreeMap<String, AccountId>,
    pub statistics: BTreeMap<AccountId, AccountStatistics>,
    pub vesting: BTreeMap<VestingBalanceId, VestingBalance>,
    pub online: BTreeMap<AccountId, u16>,
    pub balances: BTreeMap<(AccountId, AssetId), Amount>,
    pub mature: BTreeMap<(AccountId, AssetId), MatureBalance>,
    pub bonus: BTreeMap<AccountId, BonusBalance>,
}

#[derive(Default)]
pub(crate) struct AssetTables {
    pub assets: BTreeMap<AssetId, Asset>,
    pub by_symbol: BTreeMap<String, AssetId>,
    pub dynamic: BTreeMap<AssetId, AssetDynamicData>,
    pub bitassets: BTreeMap<AssetId, BitassetData>,
    pub fba: BTreeMap<FbaAccumulatorId, FbaAccumulator>,
}

#[derive(Default)]
pub(crate) struct ProducerTables {
    pub witnesses: BTreeMap<WitnessId, Witness>,
    pub committee: BTreeMap<CommitteeMemberId, CommitteeMember>,
    pub workers: BTreeMap<WorkerId, Worker>,
}

#[derive(Default)]
pub(crate) struct FundTables {
    pub funds: BTreeMap<FundId, Fund>,
    pub deposits: BTreeMap<FundDepositId, FundDeposit>,
    pub cheques: BTreeMap<ChequeId, Cheque>,
}

#[derive(Default)]
pub(crate) struct HistoryTables {
    pub ops: BTreeMap<OperationHistoryId, OperationHistory>,
    pub next_op: u64,
    pub account_entries: BTreeMap<HistoryEntryId, AccountHistoryEntry>,
    pub fund_entries: BTreeMap<HistoryEntryId, FundHistoryEntry>,
    pub next_entry: u64,
}

pub(crate) struct GlobalTables {
    pub global: GlobalProperties,
    pub dynamic: DynamicGlobalProperties,
    pub budget_records: BTreeMap<BudgetRecordId, (Timestamp, BudgetRecord)>,
    pub next_budget_record: u64,
}

impl Default for GlobalTables {
    fn default() -> Self {
        Self {
            global: GlobalProperties::default(),
            dynamic: DynamicGlobalProperties::default(),
            budget_records: BTreeMap::new(),
            next_budget_record: 0,
        }
    }
}

#[derive(Default)]
pub(crate) struct MarketTables {
    pub live_orders: BTreeSet<LimitOrderId>,
    pub next_order: u64,
    pub buyback_targets: BTreeSet<AssetId>,
}

/// In-memory object store.
pub struct MemoryStore {
    pub(crate) accounts: Mutex<AccountTables>,
    pub(crate) assets: Mutex<AssetTables>,
    pub(crate) producers: Mutex<ProducerTables>,
    pub(crate) funds: Mutex<FundTables>,
    pub(crate) history: Mutex<HistoryTables>,
    pub(crate) global: Mutex<GlobalTables>,
    pub(crate) market: Mutex<MarketTables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(AccountTables::default()),
            assets: Mutex::new(AssetTables::default()),
            producers: Mutex::new(ProducerTables::default()),
            funds: Mutex::new(FundTables::default()),
            history: Mutex::new(HistoryTables::default()),
            global: Mutex::new(GlobalTables::default()),
            market: Mutex::new(MarketTables::default()),
        }
    }

    /// Allocate the next vote id of a kind, advancing the global allocator.
    pub fn allocate_vote_id(&self, kind: VoteKind) -> VoteId {
        let mut tables = self.global.lock().unwrap();
        let instance = tables.global.next_available_vote_id;
        tables.global.next_available_vote_id += 1;
        VoteId::new(kind, instance)
    }

    /// Overwrite an (account, asset) balance directly.
    pub fn set_balance(&self, account: AccountId, asset: AssetId, amount: Amount) {
        self.accounts
            .lock()
            .unwrap()
            .balances
            .insert((account, asset), amount);
    }

    /// Open a limit order; returns its id. Used by operation evaluators.
    pub fn insert_limit_order(&self) -> LimitOrderId {
        let mut tables = self.market.lock().unwrap();
        let id = LimitOrderId::new(tables.next_order);
        tables.next_order += 1;
        tables.live_orders.insert(id);
        id
    }

    /// Close a limit order (filled or cancelled).
    pub fn remove_limit_order(&self, id: LimitOrderId) {
        self.market.lock().unwrap().live_orders.remove(&id);
    }

    /// Register an asset as a buyback target.
    pub fn add_buyback_target(&self, asset: AssetId) {
        self.market.lock().unwrap().buyback_targets.insert(asset);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}
