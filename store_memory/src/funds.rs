//! Fund and cheque table implementations.

use crate::MemoryStore;
use meridian_store::{Cheque, ChequeStore, Fund, FundDeposit, FundStore, StoreError};
use meridian_types::{ChequeId, FundId, Timestamp};

impl FundStore for MemoryStore {
    fn funds(&self) -> Result<Vec<Fund>, StoreError> {
        Ok(self.funds.lock().unwrap().funds.values().cloned().collect())
    }

    fn get_fund(&self, id: FundId) -> Result<Fund, StoreError> {
        self.funds
            .lock()
            .unwrap()
            .funds
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn put_fund(&self, fund: &Fund) -> Result<(), StoreError> {
        self.funds.lock().unwrap().funds.insert(fund.id, fund.clone());
        Ok(())
    }

    fn deposits_of_fund(&self, fund: FundId) -> Result<Vec<FundDeposit>, StoreError> {
        Ok(self
            .funds
            .lock()
            .unwrap()
            .deposits
            .values()
            .filter(|d| d.fund == fund)
            .cloned()
            .collect())
    }

    fn put_fund_deposit(&self, deposit: &FundDeposit) -> Result<(), StoreError> {
        self.funds
            .lock()
            .unwrap()
            .deposits
            .insert(deposit.id, deposit.clone());
        Ok(())
    }
}

impl ChequeStore for MemoryStore {
    fn cheques(&self) -> Result<Vec<Cheque>, StoreError> {
        Ok(self.funds.lock().unwrap().cheques.values().cloned().collect())
    }

    fn get_cheque(&self, id: ChequeId) -> Result<Cheque, StoreError> {
        self.funds
            .lock()
            .unwrap()
            .cheques
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn put_cheque(&self, cheque: &Cheque) -> Result<(), StoreError> {
        self.funds.lock().unwrap().cheques.insert(cheque.id, cheque.clone());
        Ok(())
    }

    fn remove_cheque(&self, id: ChequeId) -> Result<(), StoreError> {
        self.funds.lock().unwrap().cheques.remove(&id);
        Ok(())
    }

    fn cheques_created_before(&self, cutoff: Timestamp) -> Result<Vec<ChequeId>, StoreError> {
        let tables = self.funds.lock().unwrap();
        let mut old: Vec<(Timestamp, ChequeId)> = tables
            .cheques
            .values()
            .filter(|c| c.datetime_creation < cutoff)
            .map(|c| (c.datetime_creation, c.id))
            .collect();
        old.sort();
        Ok(old.into_iter().map(|(_, id)| id).collect())
    }
}
