//! Account, statistics, and balance table implementations.

use crate::MemoryStore;
use meridian_store::{
    Account, AccountBalance, AccountStatistics, AccountStore, BalanceStore, BonusBalance,
    MatureBalance, StoreError, VestingBalance,
};
use meridian_types::{AccountId, Amount, AssetId, VestingBalanceId};
use std::collections::BTreeMap;

impl AccountStore for MemoryStore {
    fn accounts_by_name(&self) -> Result<Vec<Account>, StoreError> {
        let tables = self.accounts.lock().unwrap();
        Ok(tables
            .by_name
            .values()
            .filter_map(|id| tables.accounts.get(id).cloned())
            .collect())
    }

    fn accounts_by_id(&self) -> Result<Vec<Account>, StoreError> {
        Ok(self.accounts.lock().unwrap().accounts.values().cloned().collect())
    }

    fn get_account(&self, id: AccountId) -> Result<Account, StoreError> {
        self.accounts
            .lock()
            .unwrap()
            .accounts
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn put_account(&self, account: &Account) -> Result<(), StoreError> {
        let mut tables = self.accounts.lock().unwrap();
        let tables = &mut *tables;
        if let Some(old) = tables.accounts.get(&account.id) {
            if old.name != account.name {
                tables.by_name.remove(&old.name);
            }
        }
        tables.by_name.insert(account.name.clone(), account.id);
        tables.accounts.insert(account.id, account.clone());
        // every account has a statistics row
        tables
            .statistics
            .entry(account.id)
            .or_insert_with(|| AccountStatistics {
                owner: account.id,
                ..Default::default()
            });
        Ok(())
    }

    fn account_statistics(&self, id: AccountId) -> Result<AccountStatistics, StoreError> {
        self.accounts
            .lock()
            .unwrap()
            .statistics
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("statistics of {id}")))
    }

    fn put_account_statistics(&self, stats: &AccountStatistics) -> Result<(), StoreError> {
        self.accounts
            .lock()
            .unwrap()
            .statistics
            .insert(stats.owner, stats.clone());
        Ok(())
    }

    fn vesting_balance(&self, id: VestingBalanceId) -> Result<VestingBalance, StoreError> {
        self.accounts
            .lock()
            .unwrap()
            .vesting
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn put_vesting_balance(&self, vb: &VestingBalance) -> Result<(), StoreError> {
        self.accounts.lock().unwrap().vesting.insert(vb.id, vb.clone());
        Ok(())
    }

    fn accounts_with_special_authority(&self) -> Result<Vec<AccountId>, StoreError> {
        let tables = self.accounts.lock().unwrap();
        Ok(tables
            .accounts
            .values()
            .filter(|a| {
                !a.owner_special_authority.is_none() || !a.active_special_authority.is_none()
            })
            .map(|a| a.id)
            .collect())
    }

    fn online_minutes(&self) -> Result<BTreeMap<AccountId, u16>, StoreError> {
        Ok(self.accounts.lock().unwrap().online.clone())
    }

    fn put_online_minutes(&self, map: &BTreeMap<AccountId, u16>) -> Result<(), StoreError> {
        self.accounts.lock().unwrap().online = map.clone();
        Ok(())
    }
}

impl BalanceStore for MemoryStore {
    fn balance(&self, account: AccountId, asset: AssetId) -> Result<Amount, StoreError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .balances
            .get(&(account, asset))
            .copied()
            .unwrap_or(Amount::ZERO))
    }

    fn adjust_balance(
        &self,
        account: AccountId,
        asset: AssetId,
        delta: Amount,
    ) -> Result<(), StoreError> {
        let mut tables = self.accounts.lock().unwrap();
        let entry = tables.balances.entry((account, asset)).or_insert(Amount::ZERO);
        *entry = entry
            .checked_add(delta)
            .ok_or_else(|| StoreError::Backend(format!("balance overflow for {account}")))?;
        Ok(())
    }

    fn first_balance_at_or_after(
        &self,
        account: AccountId,
        start: AssetId,
    ) -> Result<Option<AccountBalance>, StoreError> {
        let tables = self.accounts.lock().unwrap();
        Ok(tables
            .balances
            .range((account, start)..)
            .take_while(|((owner, _), _)| *owner == account)
            .next()
            .map(|((owner, asset), balance)| AccountBalance {
                owner: *owner,
                asset: *asset,
                balance: *balance,
            }))
    }

    fn holders_by_balance(&self, asset: AssetId) -> Result<Vec<AccountBalance>, StoreError> {
        let tables = self.accounts.lock().unwrap();
        let mut holders: Vec<AccountBalance> = tables
            .balances
            .iter()
            .filter(|((_, a), _)| *a == asset)
            .map(|((owner, a), balance)| AccountBalance {
                owner: *owner,
                asset: *a,
                balance: *balance,
            })
            .collect();
        holders.sort_by(|a, b| b.balance.cmp(&a.balance).then(a.owner.cmp(&b.owner)));
        Ok(holders)
    }

    fn mature_balance(
        &self,
        account: AccountId,
        asset: AssetId,
    ) -> Result<Option<MatureBalance>, StoreError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .mature
            .get(&(account, asset))
            .cloned())
    }

    fn mature_balances(&self) -> Result<Vec<MatureBalance>, StoreError> {
        Ok(self.accounts.lock().unwrap().mature.values().cloned().collect())
    }

    fn put_mature_balance(&self, mb: &MatureBalance) -> Result<(), StoreError> {
        self.accounts
            .lock()
            .unwrap()
            .mature
            .insert((mb.owner, mb.asset), mb.clone());
        Ok(())
    }

    fn bonus_balance(&self, account: AccountId) -> Result<Option<BonusBalance>, StoreError> {
        Ok(self.accounts.lock().unwrap().bonus.get(&account).cloned())
    }

    fn put_bonus_balance(&self, bb: &BonusBalance) -> Result<(), StoreError> {
        let mut tables = self.accounts.lock().unwrap();
        if bb.is_empty() {
            tables.bonus.remove(&bb.owner);
        } else {
            tables.bonus.insert(bb.owner, bb.clone());
        }
        Ok(())
    }
}
