//! Fund lifecycle.
//!
//! Enabled funds advance once per maintenance: each live deposit earns its
//! daily interest, deposits whose period ended renew or pay out, and funds
//! whose own schedule ran out wind down.

use crate::error::MaintenanceError;
use meridian_store::{ChainStore, Fund, FundDeposit};
use meridian_types::{Amount, FundId, Timestamp, DAY_SECS};
use tracing::debug;

/// Advance every live fund; wind down the ones that reached their end.
pub fn process_funds<S: ChainStore + ?Sized>(
    store: &S,
    now: Timestamp,
    next_maintenance_time: Timestamp,
    maintenance_interval: u64,
) -> Result<(), MaintenanceError> {
    for fund in store.funds()? {
        if !fund.enabled || fund.datetime_end < now {
            continue;
        }

        advance_fund(store, fund.id, now)?;

        // the boundary the rest of the lifecycle logic uses: the start of
        // the interval that just ended
        if next_maintenance_time.saturating_sub_secs(maintenance_interval) >= fund.datetime_end {
            finish_fund(store, fund.id)?;
        }
    }
    Ok(())
}

/// Pay one day of interest on every live deposit; renew or settle the
/// deposits whose period ended.
fn advance_fund<S: ChainStore + ?Sized>(
    store: &S,
    id: FundId,
    now: Timestamp,
) -> Result<(), MaintenanceError> {
    let mut fund = store.get_fund(id)?;
    for mut deposit in store.deposits_of_fund(id)? {
        if !deposit.enabled {
            continue;
        }

        if deposit.datetime_end <= now {
            let owner = store.get_account(deposit.owner)?;
            if owner.deposits_autorenewal_enabled {
                deposit.datetime_end = deposit
                    .datetime_end
                    .saturating_add_secs(u64::from(deposit.period_days) * DAY_SECS);
                store.put_fund_deposit(&deposit)?;
                debug!(deposit = %deposit.id, fund = %id, "deposit renewed");
            } else {
                settle_deposit(store, &mut fund, &mut deposit)?;
                continue;
            }
        }

        // a deposit without its own rate inherits the fund's current rate
        // for its period
        let percent = if deposit.percent > 0 {
            deposit.percent
        } else {
            fund.rate_for_period(deposit.period_days)
                .map(|r| r.percent)
                .unwrap_or(0)
        };
        let daily = daily_payment(deposit.amount, percent, deposit.period_days);
        if daily.raw() >= 1 {
            store.adjust_balance(deposit.owner, fund.asset, daily)?;
            store.append_fund_history(id, now)?;
        }
    }
    store.put_fund(&fund)?;
    Ok(())
}

/// `amount * percent / 100% / period_days`, floored, in 128-bit.
fn daily_payment(amount: Amount, percent: u32, period_days: u32) -> Amount {
    if period_days == 0 {
        return Amount::ZERO;
    }
    let wide = i128::from(amount.raw()) * i128::from(percent)
        / i128::from(meridian_types::FULL_PERCENT)
        / i128::from(period_days);
    Amount::new(wide as i64)
}

/// Disable the fund and settle every remaining deposit.
fn finish_fund<S: ChainStore + ?Sized>(store: &S, id: FundId) -> Result<(), MaintenanceError> {
    let mut fund = store.get_fund(id)?;
    for mut deposit in store.deposits_of_fund(id)? {
        if !deposit.enabled {
            continue;
        }
        settle_deposit(store, &mut fund, &mut deposit)?;
    }
    fund.enabled = false;
    store.put_fund(&fund)?;
    debug!(fund = %id, "fund wound down");
    Ok(())
}

/// Return a deposit's principal to its owner and shrink the fund.
fn settle_deposit<S: ChainStore + ?Sized>(
    store: &S,
    fund: &mut Fund,
    deposit: &mut FundDeposit,
) -> Result<(), MaintenanceError> {
    deposit.enabled = false;
    store.put_fund_deposit(deposit)?;
    store.adjust_balance(deposit.owner, fund.asset, deposit.amount)?;
    fund.balance = fund.balance.saturating_sub(deposit.amount);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_payment_floors() {
        // 10_000 at 10% over 30 days: 1000 / 30 = 33.3 -> 33
        assert_eq!(daily_payment(Amount::new(10_000), 1_000, 30), Amount::new(33));
        assert_eq!(daily_payment(Amount::new(10), 1, 30), Amount::ZERO);
        assert_eq!(daily_payment(Amount::new(10_000), 1_000, 0), Amount::ZERO);
    }
}
