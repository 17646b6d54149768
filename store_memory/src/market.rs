//! Market-view implementations.

use crate::MemoryStore;
use meridian_store::{MarketStore, StoreError};
use meridian_types::{AssetId, LimitOrderId};

impl MarketStore for MemoryStore {
    fn limit_order_exists(&self, id: LimitOrderId) -> Result<bool, StoreError> {
        Ok(self.market.lock().unwrap().live_orders.contains(&id))
    }

    fn buyback_targets(&self) -> Result<Vec<AssetId>, StoreError> {
        Ok(self.market.lock().unwrap().buyback_targets.iter().copied().collect())
    }
}
