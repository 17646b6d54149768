//! Chain parameters and the hardfork schedule.
//!
//! `ChainParameters` are governable and roll over atomically at maintenance
//! when a pending set exists. `ImmutableParameters` are fixed at genesis.
//! The hardfork schedule gates behavior changes on block time; a field set
//! to `Timestamp::MAX` never activates.

use crate::amount::Amount;
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};

/// Inflation trickle rate of the core asset: the fraction of the remaining
/// reserve released per second is `CYCLE_RATE / 2^CYCLE_RATE_BITS`.
pub const CORE_ASSET_CYCLE_RATE: u64 = 17;
pub const CORE_ASSET_CYCLE_RATE_BITS: u32 = 32;

/// Fees charged by the chain. Only the entries maintenance touches are
/// modeled; the full schedule lives with the operation evaluators.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Base fee for registering an account. Scaled up by the registration
    /// surge logic during the interval and unscaled at maintenance.
    pub account_create_basic_fee: Amount,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            account_create_basic_fee: Amount::new(5_000),
        }
    }
}

/// Governable consensus parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainParameters {
    /// Seconds between blocks.
    pub block_interval: u32,
    /// Seconds between maintenance runs.
    pub maintenance_interval: u32,
    /// Upper bound on the elected witness count.
    pub maximum_witness_count: u16,
    /// Upper bound on the elected committee size.
    pub maximum_committee_count: u16,
    /// Pay per produced block, funded from the witness budget.
    pub witness_pay_per_block: Amount,
    /// Daily budget shared by approved worker proposals.
    pub worker_budget_per_day: Amount,
    /// Whether non-member accounts' stake is tallied.
    pub count_non_member_votes: bool,
    /// Registrations per step of account-creation fee scaling.
    pub accounts_per_fee_scale: u32,
    /// Bit shift applied per fee-scaling step.
    pub account_fee_scale_bitshifts: u32,
    /// History retention in days; zero disables pruning.
    pub history_retention_days: u32,
    /// Symbol of the asset paying legacy and referral bonuses.
    pub bonus_asset_symbol: String,
    pub fee_schedule: FeeSchedule,
}

impl Default for ChainParameters {
    fn default() -> Self {
        Self {
            block_interval: 5,
            maintenance_interval: DAY,
            maximum_witness_count: 1001,
            maximum_committee_count: 1001,
            witness_pay_per_block: Amount::new(1_000),
            worker_budget_per_day: Amount::new(50_000_000),
            count_non_member_votes: false,
            accounts_per_fee_scale: 1_000,
            account_fee_scale_bitshifts: 4,
            history_retention_days: 30,
            bonus_asset_symbol: "MRD".to_string(),
            fee_schedule: FeeSchedule::default(),
        }
    }
}

const DAY: u32 = 86_400;

/// Parameters fixed at genesis.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImmutableParameters {
    pub min_witness_count: u16,
    pub min_committee_member_count: u16,
}

impl Default for ImmutableParameters {
    fn default() -> Self {
        Self {
            min_witness_count: 11,
            min_committee_member_count: 11,
        }
    }
}

/// Consensus behavior switches keyed on block time.
///
/// A boundary with `Timestamp::EPOCH` has always been active; one with
/// `Timestamp::MAX` never activates. `maintenance_shift_time` matches a
/// single exact block timestamp, not a range.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardforkSchedule {
    /// From here the producer-account authorities are built by the
    /// compressing vote counter instead of the legacy raw-weight builder.
    pub compact_authority_time: Timestamp,
    /// From here workers' against-votes are written back as zero.
    pub worker_vote_cleanup_time: Timestamp,
    /// Crossing this boundary upgrades every annual member to lifetime.
    pub lifetime_upgrade_time: Timestamp,
    /// The single block at which the maintenance boundary advances by
    /// three eighths of an interval instead of a whole one.
    pub maintenance_shift_time: Timestamp,
    /// From here the legacy bonus regime runs.
    pub bonus_start_time: Timestamp,
    /// From here the transfer-activity-gated bonus regime runs.
    pub activity_gated_bonus_time: Timestamp,
    /// Start of the online-minutes bonus gating window; also enables the
    /// end-of-maintenance online-map reset.
    pub online_tracking_time: Timestamp,
    /// End of the online-minutes gating window.
    pub online_tracking_end_time: Timestamp,
    /// From here the current bonus regime (per-asset, maturing balances)
    /// runs.
    pub maturing_bonus_time: Timestamp,
    /// From here funds are advanced at maintenance.
    pub fund_processing_time: Timestamp,
}

impl Default for HardforkSchedule {
    fn default() -> Self {
        Self::modern()
    }
}

impl HardforkSchedule {
    /// Every fork active since genesis; the shift block and the
    /// online-gating window never occur. The configuration of a chain
    /// started on the current consensus rules.
    pub fn modern() -> Self {
        Self {
            compact_authority_time: Timestamp::EPOCH,
            worker_vote_cleanup_time: Timestamp::EPOCH,
            lifetime_upgrade_time: Timestamp::EPOCH,
            maintenance_shift_time: Timestamp::MAX,
            bonus_start_time: Timestamp::EPOCH,
            activity_gated_bonus_time: Timestamp::EPOCH,
            online_tracking_time: Timestamp::EPOCH,
            online_tracking_end_time: Timestamp::EPOCH,
            maturing_bonus_time: Timestamp::EPOCH,
            fund_processing_time: Timestamp::EPOCH,
        }
    }

    /// No fork ever activates. The configuration of the original consensus
    /// rules, useful for exercising legacy paths in tests.
    pub fn legacy() -> Self {
        Self {
            compact_authority_time: Timestamp::MAX,
            worker_vote_cleanup_time: Timestamp::MAX,
            lifetime_upgrade_time: Timestamp::MAX,
            maintenance_shift_time: Timestamp::MAX,
            bonus_start_time: Timestamp::MAX,
            activity_gated_bonus_time: Timestamp::MAX,
            online_tracking_time: Timestamp::MAX,
            online_tracking_end_time: Timestamp::MAX,
            maturing_bonus_time: Timestamp::MAX,
            fund_processing_time: Timestamp::MAX,
        }
    }
}
