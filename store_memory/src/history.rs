//! History table implementations.

use crate::MemoryStore;
use meridian_store::{
    AccountHistoryEntry, FundHistoryEntry, HistoryStore, Operation, OperationHistory, StoreError,
};
use meridian_types::{AccountId, FundId, HistoryEntryId, OperationHistoryId, Timestamp};

impl HistoryStore for MemoryStore {
    fn push_applied_operation(
        &self,
        op: Operation,
        block_time: Timestamp,
        block_num: u64,
    ) -> Result<OperationHistoryId, StoreError> {
        let mut tables = self.history.lock().unwrap();
        let id = OperationHistoryId::new(tables.next_op);
        tables.next_op += 1;
        tables.ops.insert(
            id,
            OperationHistory {
                id,
                op,
                block_time,
                block_num,
            },
        );
        Ok(id)
    }

    fn operation(&self, id: OperationHistoryId) -> Result<OperationHistory, StoreError> {
        self.history
            .lock()
            .unwrap()
            .ops
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn operations_before(
        &self,
        cutoff: Timestamp,
    ) -> Result<Vec<OperationHistoryId>, StoreError> {
        let tables = self.history.lock().unwrap();
        let mut old: Vec<(Timestamp, OperationHistoryId)> = tables
            .ops
            .values()
            .filter(|o| o.block_time < cutoff)
            .map(|o| (o.block_time, o.id))
            .collect();
        old.sort();
        Ok(old.into_iter().map(|(_, id)| id).collect())
    }

    fn remove_operation(&self, id: OperationHistoryId) -> Result<(), StoreError> {
        self.history.lock().unwrap().ops.remove(&id);
        Ok(())
    }

    fn append_account_history(
        &self,
        account: AccountId,
        operation: OperationHistoryId,
        block_time: Timestamp,
    ) -> Result<HistoryEntryId, StoreError> {
        // statistics row first so the chain head stays consistent
        let mut accounts = self.accounts.lock().unwrap();
        let stats = accounts
            .statistics
            .get_mut(&account)
            .ok_or_else(|| StoreError::NotFound(format!("statistics of {account}")))?;

        let mut history = self.history.lock().unwrap();
        let id = HistoryEntryId::new(history.next_entry);
        history.next_entry += 1;
        history.account_entries.insert(
            id,
            AccountHistoryEntry {
                id,
                account,
                operation,
                block_time,
                next: stats.most_recent_op,
            },
        );
        stats.most_recent_op = Some(id);
        stats.total_ops += 1;
        Ok(id)
    }

    fn account_history_entry(
        &self,
        id: HistoryEntryId,
    ) -> Result<Option<AccountHistoryEntry>, StoreError> {
        Ok(self.history.lock().unwrap().account_entries.get(&id).cloned())
    }

    fn account_history_before(
        &self,
        cutoff: Timestamp,
    ) -> Result<Vec<HistoryEntryId>, StoreError> {
        let tables = self.history.lock().unwrap();
        let mut old: Vec<(Timestamp, HistoryEntryId)> = tables
            .account_entries
            .values()
            .filter(|e| e.block_time < cutoff)
            .map(|e| (e.block_time, e.id))
            .collect();
        old.sort();
        Ok(old.into_iter().map(|(_, id)| id).collect())
    }

    fn remove_account_history(&self, id: HistoryEntryId) -> Result<(), StoreError> {
        self.history.lock().unwrap().account_entries.remove(&id);
        Ok(())
    }

    fn append_fund_history(
        &self,
        fund: FundId,
        block_time: Timestamp,
    ) -> Result<HistoryEntryId, StoreError> {
        let mut tables = self.history.lock().unwrap();
        let id = HistoryEntryId::new(tables.next_entry);
        tables.next_entry += 1;
        tables.fund_entries.insert(
            id,
            FundHistoryEntry {
                id,
                fund,
                block_time,
            },
        );
        Ok(id)
    }

    fn fund_history_before(&self, cutoff: Timestamp) -> Result<Vec<HistoryEntryId>, StoreError> {
        let tables = self.history.lock().unwrap();
        let mut old: Vec<(Timestamp, HistoryEntryId)> = tables
            .fund_entries
            .values()
            .filter(|e| e.block_time < cutoff)
            .map(|e| (e.block_time, e.id))
            .collect();
        old.sort();
        Ok(old.into_iter().map(|(_, id)| id).collect())
    }

    fn remove_fund_history(&self, id: HistoryEntryId) -> Result<(), StoreError> {
        self.history.lock().unwrap().fund_entries.remove(&id);
        Ok(())
    }
}
