//! Fee-accumulator distribution.
//!
//! Each accumulator splits three ways: a network share that burns, a share
//! for the designated asset's buyback account, and a share for its issuer.
//! Shares are 128-bit floors; the rounding residue always falls to the
//! network bucket, so the split conserves the pre-split total exactly.

use crate::error::MaintenanceError;
use meridian_store::{ChainStore, Operation};
use meridian_types::{percent_floor, AccountId, AssetId, FbaAccumulatorId, Timestamp, FULL_PERCENT};
use tracing::info;

const NETWORK_PCT: u32 = 2_000;
const BUYBACK_PCT: u32 = 6_000;
const ISSUER_PCT: u32 = 2_000;

/// Distribute every fee accumulator.
pub fn distribute_fba_balances<S: ChainStore + ?Sized>(
    store: &S,
    now: Timestamp,
    block_num: u64,
) -> Result<(), MaintenanceError> {
    for id in FbaAccumulatorId::ALL {
        split_fba_balance(store, id, NETWORK_PCT, BUYBACK_PCT, ISSUER_PCT, now, block_num)?;
    }
    Ok(())
}

fn split_fba_balance<S: ChainStore + ?Sized>(
    store: &S,
    id: FbaAccumulatorId,
    network_pct: u32,
    buyback_pct: u32,
    issuer_pct: u32,
    now: Timestamp,
    block_num: u64,
) -> Result<(), MaintenanceError> {
    if network_pct + buyback_pct + issuer_pct != FULL_PERCENT {
        return Err(MaintenanceError::Invariant(
            "accumulator split percentages must sum to 100%",
        ));
    }

    let mut fba = store.fba_accumulator(id)?;
    if fba.accumulated_fba_fees.is_zero() {
        return Ok(());
    }
    let total = fba.accumulated_fba_fees;

    let designated = match fba.designated_asset {
        Some(asset_id) => Some(store.get_asset(asset_id)?),
        None => None,
    };
    let Some((designated, buyback_account)) =
        designated.and_then(|a| a.buyback_account.map(|b| (a, b)))
    else {
        info!(%total, accumulator = %id, block = block_num, "burning non-configured accumulator");
        let mut core_dd = store.asset_dynamic_data(AssetId::CORE)?;
        core_dd.current_supply = core_dd
            .current_supply
            .checked_sub(total)
            .ok_or(MaintenanceError::Overflow("accumulator burn"))?;
        store.put_asset_dynamic_data(&core_dd)?;
        fba.accumulated_fba_fees = meridian_types::Amount::ZERO;
        store.put_fba_accumulator(&fba)?;
        return Ok(());
    };

    let buyback_amount = percent_floor(total, buyback_pct);
    let issuer_amount = percent_floor(total, issuer_pct);
    let distributed = buyback_amount
        .checked_add(issuer_amount)
        .ok_or(MaintenanceError::Overflow("accumulator split"))?;
    if distributed > total {
        return Err(MaintenanceError::Invariant(
            "accumulator shares exceed the accumulated total",
        ));
    }
    let network_amount = total - distributed;

    if !network_amount.is_zero() {
        let mut core_dd = store.asset_dynamic_data(AssetId::CORE)?;
        core_dd.current_supply = core_dd
            .current_supply
            .checked_sub(network_amount)
            .ok_or(MaintenanceError::Overflow("network share burn"))?;
        store.put_asset_dynamic_data(&core_dd)?;
    }

    credit_share(store, buyback_account, id, buyback_amount, now, block_num)?;
    credit_share(store, designated.issuer, id, issuer_amount, now, block_num)?;

    // zero the accumulator last
    fba.accumulated_fba_fees = meridian_types::Amount::ZERO;
    store.put_fba_accumulator(&fba)?;
    Ok(())
}

/// Shares that round to zero transfer nothing and leave no history.
fn credit_share<S: ChainStore + ?Sized>(
    store: &S,
    account: AccountId,
    accumulator: FbaAccumulatorId,
    amount: meridian_types::Amount,
    now: Timestamp,
    block_num: u64,
) -> Result<(), MaintenanceError> {
    if amount.is_zero() {
        return Ok(());
    }
    store.adjust_balance(account, AssetId::CORE, amount)?;
    store.push_applied_operation(
        Operation::FbaDistribute {
            account,
            accumulator,
            amount,
        },
        now,
        block_num,
    )?;
    Ok(())
}
