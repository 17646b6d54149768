//! Worker vote write-back and payroll.

use crate::buffers::VoteBuffers;
use crate::error::MaintenanceError;
use meridian_store::{ChainStore, Worker, WorkerPayout};
use meridian_types::{Amount, AssetId, HardforkSchedule, Timestamp, DAY_SECS};

/// Write tallied worker votes back onto the worker records.
pub fn update_worker_votes<S: ChainStore + ?Sized>(
    store: &S,
    buffers: &VoteBuffers,
    now: Timestamp,
    hardforks: &HardforkSchedule,
) -> Result<(), MaintenanceError> {
    let allow_negative_votes = now < hardforks.worker_vote_cleanup_time;
    for mut worker in store.workers()? {
        worker.total_votes_for = buffered(buffers, worker.vote_for);
        worker.total_votes_against = if allow_negative_votes {
            buffered(buffers, worker.vote_against)
        } else {
            0
        };
        store.put_worker(&worker)?;
    }
    Ok(())
}

fn buffered(buffers: &VoteBuffers, vote_id: meridian_types::VoteId) -> u64 {
    buffers
        .vote_tally
        .get(vote_id.instance() as usize)
        .copied()
        .unwrap_or(0)
}

/// Pay active, approved workers out of `budget`, most-approved first,
/// until the budget runs dry. The unspent remainder stays in `budget`.
pub fn pay_workers<S: ChainStore + ?Sized>(
    store: &S,
    budget: &mut Amount,
    now: Timestamp,
    dt_secs: u64,
) -> Result<(), MaintenanceError> {
    let mut active_workers: Vec<Worker> = store
        .workers()?
        .into_iter()
        .filter(|w| w.is_active(now) && w.approving_stake() > 0)
        .collect();

    // more approval first; exact ties go to the lower id
    active_workers.sort_by(|a, b| {
        b.approving_stake()
            .cmp(&a.approving_stake())
            .then(a.id.cmp(&b.id))
    });

    for worker in &active_workers {
        if budget.raw() <= 0 {
            break;
        }
        let mut requested_pay = worker.daily_pay;
        if dt_secs != DAY_SECS {
            // scale the daily rate to the actual elapsed interval
            let wide = u128::from(worker.daily_pay.positive_u64()) * u128::from(dt_secs)
                / u128::from(DAY_SECS);
            requested_pay = Amount::new(wide as i64);
        }

        let actual_pay = requested_pay.min(*budget);
        pay_worker(store, worker, actual_pay)?;
        *budget -= actual_pay;
    }
    Ok(())
}

/// Apply one worker's payout variant.
fn pay_worker<S: ChainStore + ?Sized>(
    store: &S,
    worker: &Worker,
    pay: Amount,
) -> Result<(), MaintenanceError> {
    match worker.payout {
        WorkerPayout::Vesting => {
            store.adjust_balance(worker.worker_account, AssetId::CORE, pay)?;
        }
        WorkerPayout::Burn | WorkerPayout::Refund => {
            // both destroy their pay; the variant survives in the record
            let mut core_dd = store.asset_dynamic_data(AssetId::CORE)?;
            core_dd.current_supply = core_dd
                .current_supply
                .checked_sub(pay)
                .ok_or(MaintenanceError::Overflow("worker pay burn"))?;
            store.put_asset_dynamic_data(&core_dd)?;
        }
    }
    Ok(())
}
