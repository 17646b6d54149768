//! Assets, their dynamic data, and the fee accumulators.

use crate::StoreError;
use meridian_types::{AccountId, Amount, AssetId, FbaAccumulatorId};
use serde::{Deserialize, Serialize};

/// Issuer-chosen asset parameters read by the daily issuance pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetParams {
    /// Whether holders earn a daily bonus.
    pub daily_bonus: bool,
    /// Bonus rate in hundredths of a percent of the eligible balance.
    pub bonus_percent: u32,
    /// Bonuses accrue into deferred balances instead of being issued
    /// directly.
    pub maturing_bonus_balance: bool,
}

/// An asset registered on the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub symbol: String,
    /// Number of decimal places; one whole unit is `10^precision`.
    pub precision: u8,
    pub issuer: AccountId,
    pub max_supply: Amount,
    pub params: AssetParams,
    /// Account accumulating balances to be converted into this asset.
    pub buyback_account: Option<AccountId>,
}

impl Asset {
    /// One whole unit in smallest-unit terms.
    pub fn whole_unit(&self) -> i64 {
        10i64.pow(u32::from(self.precision))
    }

    /// Supply not yet in circulation.
    pub fn reserved(&self, dynamic: &AssetDynamicData) -> Amount {
        self.max_supply.saturating_sub(dynamic.current_supply)
    }
}

/// The frequently changing counters of an asset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDynamicData {
    pub asset: AssetId,
    pub current_supply: Amount,
    /// Fees collected since the last maintenance, consumed by the budget.
    pub accumulated_fees: Amount,
}

/// Market-pegged asset state; only the field maintenance resets is modeled.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitassetData {
    pub asset: AssetId,
    pub force_settled_volume: Amount,
}

/// A fee-by-asset accumulator awaiting periodic distribution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FbaAccumulator {
    pub id: FbaAccumulatorId,
    pub accumulated_fba_fees: Amount,
    /// The asset whose buyback account and issuer receive shares of the
    /// split. Unset means the accumulator is not configured and its
    /// balance burns entirely.
    pub designated_asset: Option<AssetId>,
}

/// Asset records, dynamic data, bitasset state, and fee accumulators.
pub trait AssetStore {
    /// All assets ordered by id.
    fn assets(&self) -> Result<Vec<Asset>, StoreError>;

    fn get_asset(&self, id: AssetId) -> Result<Asset, StoreError>;

    fn put_asset(&self, asset: &Asset) -> Result<(), StoreError>;

    fn asset_by_symbol(&self, symbol: &str) -> Result<Option<Asset>, StoreError>;

    fn asset_dynamic_data(&self, id: AssetId) -> Result<AssetDynamicData, StoreError>;

    fn put_asset_dynamic_data(&self, data: &AssetDynamicData) -> Result<(), StoreError>;

    /// All bitasset records ordered by asset id.
    fn bitassets(&self) -> Result<Vec<BitassetData>, StoreError>;

    fn put_bitasset(&self, data: &BitassetData) -> Result<(), StoreError>;

    fn fba_accumulator(&self, id: FbaAccumulatorId) -> Result<FbaAccumulator, StoreError>;

    fn put_fba_accumulator(&self, fba: &FbaAccumulator) -> Result<(), StoreError>;
}
