//! Retention-window pruning.
//!
//! Old history is consensus-irrelevant once outside the retention window;
//! a removed entry is never referenced again. The same sweep rebases the
//! mature-balance records to the real balances and resets the online map.

use crate::error::MaintenanceError;
use meridian_store::{ChainStore, GlobalProperties, MatureBalanceEntry};
use meridian_types::{Amount, Timestamp, DAY_SECS};
use std::collections::BTreeMap;
use tracing::debug;

/// Drop everything older than the retention window.
pub fn clear_old_entities<S: ChainStore + ?Sized>(
    store: &S,
    now: Timestamp,
    gpo: &GlobalProperties,
) -> Result<(), MaintenanceError> {
    // skipped exactly at the single maintenance-shift block
    if now != gpo.hardforks.maintenance_shift_time {
        rebase_mature_balances(store)?;
    }

    let retention_days = gpo.parameters.history_retention_days;
    if retention_days > 0 {
        let cutoff = now.saturating_sub_secs(u64::from(retention_days) * DAY_SECS);
        let mut removed = 0usize;

        for id in store.operations_before(cutoff)? {
            store.remove_operation(id)?;
            removed += 1;
        }
        if now > gpo.hardforks.activity_gated_bonus_time {
            // the older bonus regime still walks these chains
            for id in store.account_history_before(cutoff)? {
                store.remove_account_history(id)?;
                removed += 1;
            }
        }
        for id in store.fund_history_before(cutoff)? {
            store.remove_fund_history(id)?;
            removed += 1;
        }
        for id in store.cheques_created_before(cutoff)? {
            store.remove_cheque(id)?;
            removed += 1;
        }
        debug!(removed, %cutoff, "pruned history");
    }

    if now > gpo.hardforks.online_tracking_time {
        store.put_online_minutes(&BTreeMap::new())?;
    }
    Ok(())
}

/// Reset every mature balance to the corresponding real balance with a
/// fresh single-entry history.
fn rebase_mature_balances<S: ChainStore + ?Sized>(store: &S) -> Result<(), MaintenanceError> {
    for mut mature in store.mature_balances()? {
        let real = store.balance(mature.owner, mature.asset)?;
        mature.balance = real;
        mature.pending_accrual = Amount::ZERO;
        mature.history = vec![MatureBalanceEntry {
            real_balance: real,
            balance: real,
        }];
        store.put_mature_balance(&mature)?;
    }
    Ok(())
}
