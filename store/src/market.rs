//! The slice of the market the maintenance core observes.

use crate::StoreError;
use meridian_types::{AssetId, LimitOrderId};

/// Limit-order existence and buyback targets.
///
/// Order books themselves belong to the matching engine; maintenance only
/// needs to know whether a freshly placed order survived matching, and
/// which assets have buyback programs.
pub trait MarketStore {
    /// Whether an order is still open after matching.
    fn limit_order_exists(&self, id: LimitOrderId) -> Result<bool, StoreError>;

    /// Assets with a buyback program, ordered by id.
    fn buyback_targets(&self) -> Result<Vec<AssetId>, StoreError>;
}
