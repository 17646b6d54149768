//! Asset table implementations.

use crate::MemoryStore;
use meridian_store::{
    Asset, AssetDynamicData, AssetStore, BitassetData, FbaAccumulator, StoreError,
};
use meridian_types::{AssetId, FbaAccumulatorId};

impl AssetStore for MemoryStore {
    fn assets(&self) -> Result<Vec<Asset>, StoreError> {
        Ok(self.assets.lock().unwrap().assets.values().cloned().collect())
    }

    fn get_asset(&self, id: AssetId) -> Result<Asset, StoreError> {
        self.assets
            .lock()
            .unwrap()
            .assets
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn put_asset(&self, asset: &Asset) -> Result<(), StoreError> {
        let mut tables = self.assets.lock().unwrap();
        let tables = &mut *tables;
        if let Some(old) = tables.assets.get(&asset.id) {
            if old.symbol != asset.symbol {
                tables.by_symbol.remove(&old.symbol);
            }
        }
        tables.by_symbol.insert(asset.symbol.clone(), asset.id);
        tables.assets.insert(asset.id, asset.clone());
        tables.dynamic.entry(asset.id).or_insert_with(|| AssetDynamicData {
            asset: asset.id,
            ..Default::default()
        });
        Ok(())
    }

    fn asset_by_symbol(&self, symbol: &str) -> Result<Option<Asset>, StoreError> {
        let tables = self.assets.lock().unwrap();
        Ok(tables
            .by_symbol
            .get(symbol)
            .and_then(|id| tables.assets.get(id))
            .cloned())
    }

    fn asset_dynamic_data(&self, id: AssetId) -> Result<AssetDynamicData, StoreError> {
        self.assets
            .lock()
            .unwrap()
            .dynamic
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("dynamic data of {id}")))
    }

    fn put_asset_dynamic_data(&self, data: &AssetDynamicData) -> Result<(), StoreError> {
        self.assets.lock().unwrap().dynamic.insert(data.asset, data.clone());
        Ok(())
    }

    fn bitassets(&self) -> Result<Vec<BitassetData>, StoreError> {
        Ok(self.assets.lock().unwrap().bitassets.values().cloned().collect())
    }

    fn put_bitasset(&self, data: &BitassetData) -> Result<(), StoreError> {
        self.assets.lock().unwrap().bitassets.insert(data.asset, data.clone());
        Ok(())
    }

    fn fba_accumulator(&self, id: FbaAccumulatorId) -> Result<FbaAccumulator, StoreError> {
        Ok(self
            .assets
            .lock()
            .unwrap()
            .fba
            .get(&id)
            .cloned()
            .unwrap_or(FbaAccumulator {
                id,
                accumulated_fba_fees: meridian_types::Amount::ZERO,
                designated_asset: None,
            }))
    }

    fn put_fba_accumulator(&self, fba: &FbaAccumulator) -> Result<(), StoreError> {
        self.assets.lock().unwrap().fba.insert(fba.id, fba.clone());
        Ok(())
    }
}
