//! Account authorities.
//!
//! An authority is a weight threshold plus per-account weights. It is
//! satisfied when the weights of the approving accounts sum to at least the
//! threshold. Maintenance rebuilds the producer-account authorities from
//! election results and top-holder authorities from balance snapshots.

use crate::ids::{AccountId, AssetId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Set when the top-holders refresh controls the owner authority.
pub const TOP_N_CONTROL_OWNER: u8 = 1;
/// Set when the top-holders refresh controls the active authority.
pub const TOP_N_CONTROL_ACTIVE: u8 = 2;

/// A weighted multi-account authority.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authority {
    pub weight_threshold: u32,
    /// Per-account weights, ordered by account id.
    pub account_auths: BTreeMap<AccountId, u16>,
}

impl Authority {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all weights and zero the threshold.
    pub fn clear(&mut self) {
        self.weight_threshold = 0;
        self.account_auths.clear();
    }

    /// Add weight for an account, folding duplicates.
    pub fn add_account_weight(&mut self, account: AccountId, weight: u16) {
        let entry = self.account_auths.entry(account).or_insert(0);
        *entry = entry.saturating_add(weight);
    }

    pub fn is_empty(&self) -> bool {
        self.account_auths.is_empty()
    }
}

/// A special authority replacing the plain weighted one at maintenance time.
///
/// Closed variant: either nothing, or "the top N holders of asset X".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecialAuthority {
    #[default]
    None,
    TopHolders {
        asset: AssetId,
        num_top_holders: u8,
    },
}

impl SpecialAuthority {
    pub fn is_none(&self) -> bool {
        matches!(self, SpecialAuthority::None)
    }
}
