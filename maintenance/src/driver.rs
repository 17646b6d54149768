//! The maintenance driver.
//!
//! Runs when an applied block crosses the scheduled boundary. Components
//! execute in a fixed order; each is a pure function of the store snapshot
//! plus the triggering block. A failure in a mandatory component aborts
//! the block; the enumerated best-effort loops catch their own failures.

use crate::bonus::{issue_bonuses, issue_bonuses_legacy, issue_bonuses_transitional};
use crate::budget::process_budget;
use crate::buffers::{BufferGuard, VoteBuffers};
use crate::buyback::create_buyback_orders;
use crate::cheques::process_cheques;
use crate::election::{update_active_committee_members, update_active_witnesses};
use crate::error::MaintenanceError;
use crate::evaluator::OperationEvaluator;
use crate::fba::distribute_fba_balances;
use crate::funds::process_funds;
use crate::payroll::update_worker_votes;
use crate::pruning::clear_old_entities;
use crate::tally::tally_votes_and_fees;
use crate::top_n::refresh_top_n_authorities;
use meridian_store::{ChainStore, Operation};
use meridian_types::{Amount, Timestamp};
use tracing::{info, warn};

/// The block that triggered maintenance. The block-application layer has
/// already advanced the head to it.
#[derive(Clone, Copy, Debug)]
pub struct MaintenanceBlock {
    pub timestamp: Timestamp,
    pub block_num: u64,
}

/// Run one full maintenance interval.
///
/// `buffers` is the per-call scratch state; it is cleared on every exit
/// path, including failure.
pub fn perform_chain_maintenance<S, E>(
    store: &S,
    evaluator: &E,
    buffers: &mut VoteBuffers,
    next_block: &MaintenanceBlock,
) -> Result<(), MaintenanceError>
where
    S: ChainStore + ?Sized,
    E: OperationEvaluator<S>,
{
    let gpo = store.global_properties()?;
    let now = next_block.timestamp;

    distribute_fba_balances(store, now, next_block.block_num)?;
    create_buyback_orders(store, evaluator, next_block.block_num)?;

    // scratch state lives to the end of this call, success or not
    let mut tally = BufferGuard::new(buffers);
    tally_votes_and_fees(store, &mut tally, &gpo, now)?;

    refresh_top_n_authorities(store)?;
    update_active_witnesses(store, &tally, &gpo, now)?;
    update_active_committee_members(store, &tally, &gpo, now)?;
    update_worker_votes(store, &tally, now, &gpo.hardforks)?;

    rollover_parameters(store)?;

    // the advance reads the parameters that just rolled over
    let gpo = store.global_properties()?;
    let dpo = store.dynamic_properties()?;
    let maintenance_interval = u64::from(gpo.parameters.maintenance_interval);
    let mut next_maintenance_time = dpo.next_maintenance_time;

    if next_maintenance_time <= next_block.timestamp {
        if next_block.block_num == 1 {
            // the first block anchors the schedule to the interval grid
            next_maintenance_time = Timestamp::new(
                (next_block.timestamp.as_secs() / maintenance_interval + 1)
                    * maintenance_interval,
            );
        } else {
            // the smallest k with next_maintenance_time + k * interval > now
            let k = now
                .as_secs()
                .saturating_sub(next_maintenance_time.as_secs())
                / maintenance_interval;
            let advance = if now == gpo.hardforks.maintenance_shift_time {
                // one-off shift: three eighths of an interval instead of
                // a whole one
                k * maintenance_interval + 3 * maintenance_interval / 8
            } else {
                (k + 1) * maintenance_interval
            };
            next_maintenance_time = next_maintenance_time.saturating_add_secs(advance);
        }
    }

    if dpo.next_maintenance_time < gpo.hardforks.lifetime_upgrade_time
        && next_maintenance_time >= gpo.hardforks.lifetime_upgrade_time
    {
        upgrade_annual_members(store, evaluator, now)?;
    }

    let mut dpo = store.dynamic_properties()?;
    dpo.next_maintenance_time = next_maintenance_time;
    dpo.accounts_registered_this_interval = 0;
    store.put_dynamic_properties(&dpo)?;

    for mut bitasset in store.bitassets()? {
        bitasset.force_settled_volume = Amount::ZERO;
        store.put_bitasset(&bitasset)?;
    }

    // runs last among the consensus components: the witness share is
    // sized by the boundary that was just scheduled
    process_budget(store, now)?;

    info!(head = %now, next = %next_maintenance_time, "maintenance interval complete");

    if now > gpo.hardforks.fund_processing_time {
        process_funds(store, now, next_maintenance_time, maintenance_interval)?;
    }
    process_cheques(store, evaluator, next_maintenance_time, maintenance_interval)?;

    if now > gpo.hardforks.maturing_bonus_time {
        issue_bonuses(store, evaluator, now)?;
    } else if now > gpo.hardforks.activity_gated_bonus_time {
        issue_bonuses_transitional(store, evaluator, now)?;
    } else if now > gpo.hardforks.bonus_start_time {
        issue_bonuses_legacy(store, evaluator, now)?;
    }

    clear_old_entities(store, now, &gpo)?;
    Ok(())
}

/// Unscale the account-creation fee and apply pending parameters.
fn rollover_parameters<S: ChainStore + ?Sized>(store: &S) -> Result<(), MaintenanceError> {
    let mut gpo = store.global_properties()?;
    let dpo = store.dynamic_properties()?;

    if gpo.parameters.accounts_per_fee_scale > 0 {
        let steps = dpo.accounts_registered_this_interval / gpo.parameters.accounts_per_fee_scale;
        let shift = gpo.parameters.account_fee_scale_bitshifts.saturating_mul(steps);
        let fee = &mut gpo.parameters.fee_schedule.account_create_basic_fee;
        *fee = Amount::new(fee.raw().checked_shr(shift).unwrap_or(0));
    }

    if let Some(pending) = gpo.pending_parameters.take() {
        gpo.parameters = pending;
    }
    store.put_global_properties(&gpo)?;
    Ok(())
}

/// Upgrade every annual member to lifetime, once, when the interval
/// crosses the sunset boundary. Best-effort per account.
fn upgrade_annual_members<S, E>(
    store: &S,
    evaluator: &E,
    now: Timestamp,
) -> Result<(), MaintenanceError>
where
    S: ChainStore + ?Sized,
    E: OperationEvaluator<S>,
{
    for account in store.accounts_by_id()? {
        if !account.is_annual_member(now) {
            continue;
        }
        let op = Operation::AccountUpgrade {
            account_to_upgrade: account.id,
            upgrade_to_lifetime_member: true,
        };
        if let Err(e) = evaluator.apply_operation(store, op) {
            warn!(account = %account.id, name = %account.name, error = %e,
                "annual member upgrade rejected");
        }
    }
    Ok(())
}
