//! Applied-operation history and per-entity history chains.

use crate::operations::Operation;
use crate::StoreError;
use meridian_types::{AccountId, FundId, HistoryEntryId, OperationHistoryId, Timestamp};
use serde::{Deserialize, Serialize};

/// One applied operation in the global history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationHistory {
    pub id: OperationHistoryId,
    pub op: Operation,
    pub block_time: Timestamp,
    pub block_num: u64,
}

/// A link in an account's newest-first history chain.
///
/// The account's statistics point at the newest entry; `next` points at
/// the older neighbor. Pruning may remove the tail, so a dangling `next`
/// is treated as end-of-chain by walkers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountHistoryEntry {
    pub id: HistoryEntryId,
    pub account: AccountId,
    pub operation: OperationHistoryId,
    pub block_time: Timestamp,
    pub next: Option<HistoryEntryId>,
}

/// A fund-payment history marker, kept only for retention-window pruning.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundHistoryEntry {
    pub id: HistoryEntryId,
    pub fund: FundId,
    pub block_time: Timestamp,
}

/// Applied operations and the time-indexed history kinds.
pub trait HistoryStore {
    /// Append an applied operation to the block's history.
    fn push_applied_operation(
        &self,
        op: Operation,
        block_time: Timestamp,
        block_num: u64,
    ) -> Result<OperationHistoryId, StoreError>;

    fn operation(&self, id: OperationHistoryId) -> Result<OperationHistory, StoreError>;

    /// Operations with `block_time` strictly before `cutoff`, oldest first.
    fn operations_before(&self, cutoff: Timestamp)
        -> Result<Vec<OperationHistoryId>, StoreError>;

    fn remove_operation(&self, id: OperationHistoryId) -> Result<(), StoreError>;

    /// Prepend an entry to an account's history chain and update the
    /// account's statistics to point at it.
    fn append_account_history(
        &self,
        account: AccountId,
        operation: OperationHistoryId,
        block_time: Timestamp,
    ) -> Result<HistoryEntryId, StoreError>;

    /// `Ok(None)` when the entry was pruned.
    fn account_history_entry(
        &self,
        id: HistoryEntryId,
    ) -> Result<Option<AccountHistoryEntry>, StoreError>;

    fn account_history_before(&self, cutoff: Timestamp)
        -> Result<Vec<HistoryEntryId>, StoreError>;

    fn remove_account_history(&self, id: HistoryEntryId) -> Result<(), StoreError>;

    fn append_fund_history(
        &self,
        fund: FundId,
        block_time: Timestamp,
    ) -> Result<HistoryEntryId, StoreError>;

    fn fund_history_before(&self, cutoff: Timestamp) -> Result<Vec<HistoryEntryId>, StoreError>;

    fn remove_fund_history(&self, id: HistoryEntryId) -> Result<(), StoreError>;
}
