//! Singleton and budget-record implementations.

use crate::MemoryStore;
use meridian_store::global::BudgetRecord;
use meridian_store::{DynamicGlobalProperties, GlobalProperties, GlobalStore, StoreError};
use meridian_types::{BudgetRecordId, Timestamp};

impl GlobalStore for MemoryStore {
    fn global_properties(&self) -> Result<GlobalProperties, StoreError> {
        Ok(self.global.lock().unwrap().global.clone())
    }

    fn put_global_properties(&self, gp: &GlobalProperties) -> Result<(), StoreError> {
        self.global.lock().unwrap().global = gp.clone();
        Ok(())
    }

    fn dynamic_properties(&self) -> Result<DynamicGlobalProperties, StoreError> {
        Ok(self.global.lock().unwrap().dynamic.clone())
    }

    fn put_dynamic_properties(&self, dp: &DynamicGlobalProperties) -> Result<(), StoreError> {
        self.global.lock().unwrap().dynamic = dp.clone();
        Ok(())
    }

    fn create_budget_record(
        &self,
        time: Timestamp,
        record: &BudgetRecord,
    ) -> Result<BudgetRecordId, StoreError> {
        let mut tables = self.global.lock().unwrap();
        let id = BudgetRecordId::new(tables.next_budget_record);
        tables.next_budget_record += 1;
        tables.budget_records.insert(id, (time, record.clone()));
        Ok(id)
    }

    fn budget_records(
        &self,
    ) -> Result<Vec<(BudgetRecordId, Timestamp, BudgetRecord)>, StoreError> {
        Ok(self
            .global
            .lock()
            .unwrap()
            .budget_records
            .iter()
            .map(|(id, (time, rec))| (*id, *time, rec.clone()))
            .collect())
    }
}
