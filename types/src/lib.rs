//! Fundamental types for the Meridian ledger.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: typed object ids, vote ids, monetary amounts, timestamps,
//! authorities, and chain parameters.

pub mod amount;
pub mod authority;
pub mod ids;
pub mod params;
pub mod time;

pub use amount::{percent_floor, Amount, FULL_PERCENT};
pub use authority::{Authority, SpecialAuthority, TOP_N_CONTROL_ACTIVE, TOP_N_CONTROL_OWNER};
pub use ids::{
    AccountId, AssetId, BudgetRecordId, ChequeId, CommitteeMemberId, FbaAccumulatorId,
    FundDepositId, FundId, HistoryEntryId, LimitOrderId, OperationHistoryId, VestingBalanceId,
    VoteId, VoteKind, WitnessId, WorkerId,
};
pub use params::{
    ChainParameters, FeeSchedule, HardforkSchedule, ImmutableParameters, CORE_ASSET_CYCLE_RATE,
    CORE_ASSET_CYCLE_RATE_BITS,
};
pub use time::{Timestamp, DAY_SECS, HOUR_SECS};
