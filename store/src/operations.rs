//! Ledger operations appearing in history.
//!
//! Maintenance synthesizes the virtual subset (everything except
//! `Transfer`) and hands each by value to the operation evaluator or
//! appends it directly to the applied history.

use meridian_types::{AccountId, Amount, AssetId, ChequeId, FbaAccumulatorId, LimitOrderId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An amount of a specific asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetAmount {
    pub asset: AssetId,
    pub amount: Amount,
}

impl AssetAmount {
    pub fn new(asset: AssetId, amount: Amount) -> Self {
        Self { asset, amount }
    }

    pub fn core(amount: Amount) -> Self {
        Self {
            asset: AssetId::CORE,
            amount,
        }
    }
}

/// Referral rank of a referrer, decided by the rank table each bonus pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReferralRank {
    D,
    C,
    B,
    A,
}

impl fmt::Display for ReferralRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReferralRank::D => "D",
            ReferralRank::C => "C",
            ReferralRank::B => "B",
            ReferralRank::A => "A",
        };
        f.write_str(s)
    }
}

/// A referee's contribution recorded in a referral-issue operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildBalance {
    pub account: AccountId,
    pub balance: Amount,
}

/// The operations the maintenance core reads from or appends to history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// User transfer; never synthesized, but read by the legacy bonus
    /// regime's activity walk.
    Transfer {
        from: AccountId,
        to: AccountId,
        amount: AssetAmount,
    },
    LimitOrderCreate {
        seller: AccountId,
        amount_to_sell: AssetAmount,
        min_to_receive: AssetAmount,
        expiration: Timestamp,
        fill_or_kill: bool,
    },
    LimitOrderCancel {
        order: LimitOrderId,
        fee_paying_account: AccountId,
    },
    /// Share of a fee accumulator credited to an account.
    FbaDistribute {
        account: AccountId,
        accumulator: FbaAccumulatorId,
        amount: Amount,
    },
    /// Daily bonus issued straight to a holder.
    DailyIssue {
        issuer: AccountId,
        asset_to_issue: AssetAmount,
        issue_to_account: AccountId,
        /// The holder's real balance at issue time, for audit.
        account_balance: Amount,
    },
    /// Referral bonus issued to a referrer.
    ReferralIssue {
        issuer: AccountId,
        asset_to_issue: AssetAmount,
        issue_to_account: AccountId,
        account_balance: Amount,
        rank: ReferralRank,
        history: Vec<ChildBalance>,
    },
    /// Expired cheque remainder returned to the drawer.
    ChequeReverse {
        cheque: ChequeId,
        account: AccountId,
        amount: AssetAmount,
    },
    AccountUpgrade {
        account_to_upgrade: AccountId,
        upgrade_to_lifetime_member: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_bincode_roundtrip() {
        let op = Operation::FbaDistribute {
            account: AccountId::new(4),
            accumulator: FbaAccumulatorId::ConfidentialTransfer,
            amount: Amount::new(600),
        };
        let bytes = bincode::serialize(&op).unwrap();
        let back: Operation = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, op);
    }
}
