//! The inflation budget.
//!
//! Once per maintenance the chain decides how much core to release from
//! the reserve: a time-proportional trickle capped by the reserve itself,
//! split between witness pay and worker pay, with the unspent remainder
//! evaporating back. The supply mutation reconciles every component and a
//! budget record captures them for audit.

use crate::error::MaintenanceError;
use crate::payroll::pay_workers;
use meridian_store::global::BudgetRecord;
use meridian_store::{Asset, AssetDynamicData, ChainStore, DynamicGlobalProperties};
use meridian_types::{
    Amount, AssetId, Timestamp, CORE_ASSET_CYCLE_RATE, CORE_ASSET_CYCLE_RATE_BITS, DAY_SECS,
};

/// Fill in the budget sources and the total for this interval.
///
/// The accumulated fees and the leftover witness budget are considered
/// returned to the reserve at the start of the interval, so they are
/// budgetable here even though the supply mutation happens only at the
/// end.
fn initialize_budget_record(
    core: &Asset,
    core_dd: &AssetDynamicData,
    dpo: &DynamicGlobalProperties,
    now: Timestamp,
) -> Result<BudgetRecord, MaintenanceError> {
    let mut rec = BudgetRecord {
        from_initial_reserve: core.reserved(core_dd),
        from_accumulated_fees: core_dd.accumulated_fees,
        from_unused_witness_budget: dpo.witness_budget,
        ..Default::default()
    };

    if dpo.last_budget_time.is_epoch() || now <= dpo.last_budget_time {
        rec.time_since_last_budget = 0;
        return Ok(rec);
    }
    let dt = dpo.last_budget_time.delta_secs(now) as u64;
    rec.time_since_last_budget = dt;

    let reserve = rec
        .from_initial_reserve
        .checked_add(core_dd.accumulated_fees)
        .and_then(|r| r.checked_add(dpo.witness_budget))
        .ok_or(MaintenanceError::Overflow("budget reserve"))?;
    let reserve_raw = u64::try_from(reserve.raw())
        .map_err(|_| MaintenanceError::Invariant("core reserve is negative"))?;

    // round up to the nearest satoshi so no part of the reserve is
    // untouchable forever
    let mut budget = u128::from(reserve_raw);
    budget *= u128::from(dt);
    budget *= u128::from(CORE_ASSET_CYCLE_RATE);
    budget += (1u128 << CORE_ASSET_CYCLE_RATE_BITS) - 1;
    budget >>= CORE_ASSET_CYCLE_RATE_BITS;

    rec.total_budget = if budget < u128::from(reserve_raw) {
        Amount::new(budget as i64)
    } else {
        reserve
    };
    Ok(rec)
}

/// Compute and disburse this interval's budget.
///
/// Runs after the maintenance time advance: the witness share is sized by
/// the blocks remaining until the *next* boundary.
pub fn process_budget<S: ChainStore + ?Sized>(
    store: &S,
    now: Timestamp,
) -> Result<(), MaintenanceError> {
    let gpo = store.global_properties()?;
    let dpo = store.dynamic_properties()?;
    let core = store.get_asset(AssetId::CORE)?;
    let core_dd = store.asset_dynamic_data(AssetId::CORE)?;

    let time_to_maint = now.delta_secs(dpo.next_maintenance_time);
    if time_to_maint <= 0 {
        return Err(MaintenanceError::Invariant(
            "next maintenance time must lie in the future",
        ));
    }
    if gpo.parameters.block_interval == 0 {
        return Err(MaintenanceError::Invariant("block interval must be positive"));
    }
    let interval = u64::from(gpo.parameters.block_interval);
    let blocks_to_maint = (time_to_maint as u64 + interval - 1) / interval;

    let mut rec = initialize_budget_record(&core, &core_dd, &dpo, now)?;
    let mut available = rec.total_budget;

    let requested_witness_budget = gpo
        .parameters
        .witness_pay_per_block
        .checked_mul(blocks_to_maint as i64)
        .ok_or(MaintenanceError::Overflow("witness budget"))?;
    rec.requested_witness_budget = requested_witness_budget;
    let witness_budget = requested_witness_budget.min(available);
    rec.witness_budget = witness_budget;
    available -= witness_budget;

    let dt = rec.time_since_last_budget;
    let worker_budget_wide = u128::from(gpo.parameters.worker_budget_per_day.positive_u64())
        * u128::from(dt)
        / u128::from(DAY_SECS);
    let worker_budget = if worker_budget_wide >= u128::from(available.positive_u64()) {
        available
    } else {
        Amount::new(worker_budget_wide as i64)
    };
    rec.worker_budget = worker_budget;

    let mut leftover_worker_funds = worker_budget;
    pay_workers(store, &mut leftover_worker_funds, now, dt)?;
    rec.leftover_worker_funds = leftover_worker_funds;
    // whatever remains unspent is money we could release but don't want
    // to; it evaporates back into the reserve

    rec.supply_delta = rec.witness_budget + rec.worker_budget
        - rec.leftover_worker_funds
        - rec.from_accumulated_fees
        - rec.from_unused_witness_budget;

    // re-read: worker payout variants may have burned supply already
    let mut core_dd = store.asset_dynamic_data(AssetId::CORE)?;
    let expected = witness_budget + worker_budget
        - leftover_worker_funds
        - core_dd.accumulated_fees
        - dpo.witness_budget;
    if rec.supply_delta != expected {
        return Err(MaintenanceError::Invariant("budget supply delta mismatch"));
    }
    core_dd.current_supply = core_dd
        .current_supply
        .checked_add(rec.supply_delta)
        .ok_or(MaintenanceError::Overflow("core supply"))?;
    core_dd.accumulated_fees = Amount::ZERO;
    store.put_asset_dynamic_data(&core_dd)?;

    let mut dpo = store.dynamic_properties()?;
    // the prior witness budget was rolled into the budget sources, so the
    // new share replaces it rather than adding
    dpo.witness_budget = witness_budget;
    dpo.last_budget_time = now;
    store.put_dynamic_properties(&dpo)?;

    store.create_budget_record(now, &rec)?;
    Ok(())
}
