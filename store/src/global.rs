//! Chain-wide singletons and budget records.

use crate::StoreError;
use meridian_types::{
    Amount, BudgetRecordId, ChainParameters, CommitteeMemberId, HardforkSchedule,
    ImmutableParameters, Timestamp, WitnessId,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Chain parameters and the currently elected producer sets.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalProperties {
    pub parameters: ChainParameters,
    /// Applied atomically at the next maintenance.
    pub pending_parameters: Option<ChainParameters>,
    pub immutable_parameters: ImmutableParameters,
    pub hardforks: HardforkSchedule,
    pub active_witnesses: BTreeSet<WitnessId>,
    pub active_committee_members: BTreeSet<CommitteeMemberId>,
    /// Monotonic allocator for vote-id instances; also the tally-buffer
    /// size at maintenance entry.
    pub next_available_vote_id: u32,
}

/// Per-block chain state read and advanced by maintenance.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicGlobalProperties {
    pub head_block_time: Timestamp,
    pub head_block_num: u64,
    pub next_maintenance_time: Timestamp,
    pub last_budget_time: Timestamp,
    /// Witness pay left over from the previous interval; burns into the
    /// reserve at the start of the next budget.
    pub witness_budget: Amount,
    pub accounts_registered_this_interval: u32,
}

/// Every component of one maintenance budget, for audit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetRecord {
    pub time_since_last_budget: u64,
    pub from_initial_reserve: Amount,
    pub from_accumulated_fees: Amount,
    pub from_unused_witness_budget: Amount,
    pub requested_witness_budget: Amount,
    pub total_budget: Amount,
    pub witness_budget: Amount,
    pub worker_budget: Amount,
    pub leftover_worker_funds: Amount,
    pub supply_delta: Amount,
}

/// Singletons and budget records.
pub trait GlobalStore {
    fn global_properties(&self) -> Result<GlobalProperties, StoreError>;

    fn put_global_properties(&self, gp: &GlobalProperties) -> Result<(), StoreError>;

    fn dynamic_properties(&self) -> Result<DynamicGlobalProperties, StoreError>;

    fn put_dynamic_properties(&self, dp: &DynamicGlobalProperties) -> Result<(), StoreError>;

    /// Persist the budget record of one maintenance call.
    fn create_budget_record(
        &self,
        time: Timestamp,
        record: &BudgetRecord,
    ) -> Result<BudgetRecordId, StoreError>;

    /// All budget records ordered by id.
    fn budget_records(&self) -> Result<Vec<(BudgetRecordId, Timestamp, BudgetRecord)>, StoreError>;
}
