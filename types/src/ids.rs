//! Typed object ids.
//!
//! Every persistent entity is addressed by a typed id wrapping its serial
//! instance number. Ids of different entity kinds are distinct types, so a
//! `WitnessId` can never be passed where an `AccountId` is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! object_id {
    ($(#[$meta:meta])* $name:ident, $tag:literal) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash,
            Serialize, Deserialize,
        )]
        pub struct $name(u64);

        impl $name {
            pub const fn new(instance: u64) -> Self {
                Self(instance)
            }

            pub const fn instance(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($tag, ".{}"), self.0)
            }
        }
    };
}

object_id!(
    /// An account on the ledger.
    AccountId, "1.2");
object_id!(
    /// An asset registered on the ledger.
    AssetId, "1.3");
object_id!(
    /// A block-producer candidate record.
    WitnessId, "1.6");
object_id!(
    /// A committee-member candidate record.
    CommitteeMemberId, "1.5");
object_id!(
    /// A funded worker proposal.
    WorkerId, "1.14");
object_id!(
    /// A vesting balance (cashback target).
    VestingBalanceId, "1.13");
object_id!(
    /// An open limit order on the market.
    LimitOrderId, "1.7");
object_id!(
    /// An investment fund.
    FundId, "1.21");
object_id!(
    /// A deposit held inside a fund.
    FundDepositId, "1.22");
object_id!(
    /// A cheque drawn against an account.
    ChequeId, "1.23");
object_id!(
    /// A per-maintenance budget record.
    BudgetRecordId, "2.13");
object_id!(
    /// An entry in the global operation history.
    OperationHistoryId, "1.11");
object_id!(
    /// An entry in a per-account or per-fund history chain.
    HistoryEntryId, "2.9");

impl AccountId {
    /// Sentinel in `AccountOptions::voting_account` meaning "no proxy; my own
    /// votes count".
    pub const PROXY_TO_SELF: AccountId = AccountId(u64::MAX);

    /// The account whose active authority mirrors the elected committee.
    pub const COMMITTEE: AccountId = AccountId(0);
    /// The account whose active authority mirrors the elected witnesses.
    pub const WITNESS: AccountId = AccountId(1);
    /// Secondary committee account with the same authority but relaxed
    /// review requirements.
    pub const RELAXED_COMMITTEE: AccountId = AccountId(2);
    /// Network oversight account; its blacklist gates bonus issuance
    /// chain-wide.
    pub const OVERSIGHT: AccountId = AccountId(3);
}

impl AssetId {
    /// The core asset of the chain.
    pub const CORE: AssetId = AssetId(0);
}

/// Fixed fee-by-asset accumulator slots, one per confidential operation
/// class.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum FbaAccumulatorId {
    ConfidentialDeposit = 0,
    ConfidentialTransfer = 1,
    ConfidentialWithdraw = 2,
}

impl FbaAccumulatorId {
    pub const ALL: [FbaAccumulatorId; 3] = [
        FbaAccumulatorId::ConfidentialDeposit,
        FbaAccumulatorId::ConfidentialTransfer,
        FbaAccumulatorId::ConfidentialWithdraw,
    ];
}

impl fmt::Display for FbaAccumulatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "2.16.{}", *self as u8)
    }
}

/// The kind of object a vote id refers to.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum VoteKind {
    Committee = 0,
    Witness = 1,
    Worker = 2,
}

/// A globally unique 32-bit vote identifier.
///
/// The low 8 bits carry the [`VoteKind`], the high 24 bits the instance
/// number. The instance indexes directly into the per-maintenance tally
/// buffer, so instances are allocated monotonically and never reused.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct VoteId(u32);

impl VoteId {
    pub const MAX_INSTANCE: u32 = (1 << 24) - 1;

    pub fn new(kind: VoteKind, instance: u32) -> Self {
        debug_assert!(instance <= Self::MAX_INSTANCE);
        Self((kind as u32) | (instance << 8))
    }

    pub fn kind(&self) -> VoteKind {
        match self.0 & 0xff {
            0 => VoteKind::Committee,
            1 => VoteKind::Witness,
            _ => VoteKind::Worker,
        }
    }

    /// The instance number, i.e. the tally-buffer slot this vote occupies.
    pub fn instance(&self) -> u32 {
        self.0 >> 8
    }
}

impl fmt::Debug for VoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.0 & 0xff, self.instance())
    }
}

impl fmt::Display for VoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}
