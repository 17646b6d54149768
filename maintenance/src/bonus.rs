//! Daily issuance.
//!
//! Three regimes, selected by hardfork time in the driver:
//!
//! - **current** — every non-core asset with a bonus configured pays its
//!   holders daily; maturing assets defer the credit, others issue
//!   directly. Referral bonuses come from the referral tree.
//! - **transitional** — only the chain's designated bonus asset pays, at
//!   the flat legacy rate on mature balances, scaled by minutes online
//!   inside the tracking window.
//! - **legacy** — designated asset only, real balances, and a bonus is
//!   paid only to accounts that moved at least one whole unit of the
//!   asset within the last day.

use crate::error::MaintenanceError;
use crate::evaluator::OperationEvaluator;
use crate::referral::ReferralTree;
use meridian_store::operations::AssetAmount;
use meridian_store::{Account, Asset, BonusBalance, ChainStore, Operation};
use meridian_types::{
    percent_floor, AccountId, Amount, AssetId, ChainParameters, Timestamp, DAY_SECS,
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

const MINUTES_PER_DAY: u64 = 1_440;
/// Flat bonus rate of the older regimes: 0.65%.
const LEGACY_BONUS_PERCENT: u32 = 65;

fn day_start(now: Timestamp) -> Timestamp {
    Timestamp::new(now.as_secs() / DAY_SECS * DAY_SECS)
}

/// The chain-wide bonus blacklist, or `None` when the oversight account
/// does not exist (no bonuses are paid then).
fn oversight_blacklist<S: ChainStore + ?Sized>(
    store: &S,
) -> Result<Option<BTreeSet<AccountId>>, MaintenanceError> {
    match store.get_account(AccountId::OVERSIGHT) {
        Ok(account) => Ok(Some(account.blacklisted_accounts)),
        Err(meridian_store::StoreError::NotFound(_)) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// The balance a bonus is computed on: the mature portion when tracked,
/// nothing at all for burning-mode accounts.
fn bonus_eligible_balance<S: ChainStore + ?Sized>(
    store: &S,
    account: &Account,
    asset: &Asset,
) -> Result<Amount, MaintenanceError> {
    if account.burning_mode_enabled {
        return Ok(Amount::ZERO);
    }
    match store.mature_balance(account.id, asset.id)? {
        Some(mature) => Ok(mature.balance),
        None => Ok(store.balance(account.id, asset.id)?),
    }
}

/// Clamp an issuance so the asset's supply cannot exceed its maximum.
fn clamp_to_supply_headroom<S: ChainStore + ?Sized>(
    store: &S,
    asset: &Asset,
    quantity: Amount,
) -> Result<Amount, MaintenanceError> {
    let dd = store.asset_dynamic_data(asset.id)?;
    let headroom = asset.max_supply.saturating_sub(dd.current_supply);
    Ok(quantity.min(headroom.max(Amount::ZERO)))
}

/// Roll per-block mining accruals into the matured buckets.
pub fn mature_mining_accruals<S: ChainStore + ?Sized>(
    store: &S,
) -> Result<(), MaintenanceError> {
    for mut mature in store.mature_balances()? {
        if mature.pending_accrual.is_zero() {
            continue;
        }
        mature.balance = mature
            .balance
            .checked_add(mature.pending_accrual)
            .ok_or(MaintenanceError::Overflow("mature balance accrual"))?;
        mature.pending_accrual = Amount::ZERO;
        let real = store.balance(mature.owner, mature.asset)?;
        mature.history.push(meridian_store::MatureBalanceEntry {
            real_balance: real,
            balance: mature.balance,
        });
        store.put_mature_balance(&mature)?;
    }
    Ok(())
}

fn credit_bonus_balance<S: ChainStore + ?Sized>(
    store: &S,
    account: AccountId,
    asset: AssetId,
    amount: Amount,
    now: Timestamp,
) -> Result<(), MaintenanceError> {
    let mut bb = store.bonus_balance(account)?.unwrap_or(BonusBalance {
        owner: account,
        entries: Vec::new(),
    });
    let entry = bb.entry_for(day_start(now));
    let slot = entry.balances.entry(asset).or_insert(Amount::ZERO);
    *slot = slot
        .checked_add(amount)
        .ok_or(MaintenanceError::Overflow("deferred bonus balance"))?;
    store.put_bonus_balance(&bb)?;
    Ok(())
}

fn credit_referral_balance<S: ChainStore + ?Sized>(
    store: &S,
    account: AccountId,
    amount: Amount,
    now: Timestamp,
) -> Result<(), MaintenanceError> {
    let mut bb = store.bonus_balance(account)?.unwrap_or(BonusBalance {
        owner: account,
        entries: Vec::new(),
    });
    let entry = bb.entry_for(day_start(now));
    entry.referral = entry
        .referral
        .checked_add(amount)
        .ok_or(MaintenanceError::Overflow("deferred referral balance"))?;
    store.put_bonus_balance(&bb)?;
    Ok(())
}

/// Materialize an account's deferred bonuses from days before today.
pub fn process_bonus_balances<S: ChainStore + ?Sized>(
    store: &S,
    account: AccountId,
    params: &ChainParameters,
    now: Timestamp,
) -> Result<(), MaintenanceError> {
    let Some(mut bb) = store.bonus_balance(account)? else {
        return Ok(());
    };
    let today = day_start(now);
    let mut remaining = Vec::new();
    for entry in bb.entries.drain(..) {
        if entry.bonus_time >= today {
            remaining.push(entry);
            continue;
        }
        for (asset_id, amount) in &entry.balances {
            let asset = store.get_asset(*asset_id)?;
            let issue = clamp_to_supply_headroom(store, &asset, *amount)?;
            if issue.raw() < 1 {
                continue;
            }
            issue_into_balance(store, account, &asset, issue)?;
        }
        if entry.referral.raw() >= 1 {
            if let Some(asset) = store.asset_by_symbol(&params.bonus_asset_symbol)? {
                let issue = clamp_to_supply_headroom(store, &asset, entry.referral)?;
                if issue.raw() >= 1 {
                    issue_into_balance(store, account, &asset, issue)?;
                }
            }
        }
    }
    bb.entries = remaining;
    store.put_bonus_balance(&bb)?;
    Ok(())
}

/// Mint directly into a balance, bumping the asset's supply.
fn issue_into_balance<S: ChainStore + ?Sized>(
    store: &S,
    account: AccountId,
    asset: &Asset,
    amount: Amount,
) -> Result<(), MaintenanceError> {
    store.adjust_balance(account, asset.id, amount)?;
    let mut dd = store.asset_dynamic_data(asset.id)?;
    dd.current_supply = dd
        .current_supply
        .checked_add(amount)
        .ok_or(MaintenanceError::Overflow("bonus supply"))?;
    store.put_asset_dynamic_data(&dd)?;
    Ok(())
}

/// Current regime: per-asset daily bonuses, tree-based referral issuance,
/// then materialization of matured deferred credits.
pub fn issue_bonuses<S, E>(
    store: &S,
    evaluator: &E,
    now: Timestamp,
) -> Result<(), MaintenanceError>
where
    S: ChainStore + ?Sized,
    E: OperationEvaluator<S>,
{
    mature_mining_accruals(store)?;

    let Some(oversight_list) = oversight_blacklist(store)? else {
        return Ok(());
    };
    let gpo = store.global_properties()?;

    for asset in store.assets()? {
        if asset.id == AssetId::CORE {
            continue;
        }
        if !asset.params.daily_bonus || asset.params.bonus_percent == 0 {
            continue;
        }
        let issuer_list = store.get_account(asset.issuer)?.blacklisted_accounts;

        for account in store.accounts_by_id()? {
            let eligible = bonus_eligible_balance(store, &account, &asset)?;
            let quantity = percent_floor(eligible, asset.params.bonus_percent);
            if quantity.raw() < 1 {
                continue;
            }
            if oversight_list.contains(&account.id) || issuer_list.contains(&account.id) {
                continue;
            }

            let quantity = clamp_to_supply_headroom(store, &asset, quantity)?;
            if quantity.raw() < 1 {
                continue;
            }

            if asset.params.maturing_bonus_balance {
                credit_bonus_balance(store, account.id, asset.id, quantity, now)?;
            } else {
                let real_balance = store.balance(account.id, asset.id)?;
                let op = Operation::DailyIssue {
                    issuer: asset.issuer,
                    asset_to_issue: AssetAmount::new(asset.id, quantity),
                    issue_to_account: account.id,
                    account_balance: real_balance,
                };
                if let Err(e) = evaluator.apply_operation(store, op) {
                    debug!(account = %account.id, asset = %asset.id, error = %e,
                        "daily issue rejected");
                }
            }
        }
    }

    issue_referral(store, evaluator, &oversight_list, now)?;

    // apply whatever matured
    for account in store.accounts_by_id()? {
        process_bonus_balances(store, account.id, &gpo.parameters, now)?;
    }
    Ok(())
}

/// Referral issuance of the current regime.
fn issue_referral<S, E>(
    store: &S,
    evaluator: &E,
    oversight_list: &BTreeSet<AccountId>,
    now: Timestamp,
) -> Result<(), MaintenanceError>
where
    S: ChainStore + ?Sized,
    E: OperationEvaluator<S>,
{
    let gpo = store.global_properties()?;
    let Some(asset) = store.asset_by_symbol(&gpo.parameters.bonus_asset_symbol)? else {
        return Ok(());
    };
    let issuer_list = store.get_account(asset.issuer)?.blacklisted_accounts;

    let accounts = store.accounts_by_id()?;
    let mut balances: BTreeMap<AccountId, Amount> = BTreeMap::new();
    for account in &accounts {
        balances.insert(account.id, bonus_eligible_balance(store, account, &asset)?);
    }
    let tree = ReferralTree::build(&accounts, |id| {
        balances.get(&id).copied().unwrap_or(Amount::ZERO)
    });

    for award in tree.scan(asset.whole_unit()) {
        if oversight_list.contains(&award.to) || issuer_list.contains(&award.to) {
            continue;
        }
        if asset.params.maturing_bonus_balance {
            let amount = clamp_to_supply_headroom(store, &asset, award.amount)?;
            if amount.raw() >= 1 {
                credit_referral_balance(store, award.to, amount, now)?;
            }
        } else {
            let real_balance = store.balance(award.to, asset.id)?;
            let op = Operation::ReferralIssue {
                issuer: asset.issuer,
                asset_to_issue: AssetAmount::new(asset.id, award.amount),
                issue_to_account: award.to,
                account_balance: real_balance,
                rank: award.rank,
                history: award.history,
            };
            if let Err(e) = evaluator.apply_operation(store, op) {
                warn!(account = %award.to, error = %e, "referral issue rejected");
            }
        }
    }
    Ok(())
}

/// Transitional regime: designated asset only, mature balances, online
/// gating inside the tracking window.
pub fn issue_bonuses_transitional<S, E>(
    store: &S,
    evaluator: &E,
    now: Timestamp,
) -> Result<(), MaintenanceError>
where
    S: ChainStore + ?Sized,
    E: OperationEvaluator<S>,
{
    let gpo = store.global_properties()?;
    let hf = &gpo.hardforks;

    if now > hf.online_tracking_end_time {
        mature_mining_accruals(store)?;
    }

    let Some(asset) = store.asset_by_symbol(&gpo.parameters.bonus_asset_symbol)? else {
        return Ok(());
    };
    let Some(oversight_list) = oversight_blacklist(store)? else {
        return Ok(());
    };
    let issuer_list = store.get_account(asset.issuer)?.blacklisted_accounts;

    let online = store.online_minutes()?;
    let online_window = now > hf.online_tracking_time && now < hf.online_tracking_end_time;
    let minutes_of = |account: AccountId| -> u64 {
        if online.is_empty() {
            // no tracking data at all: everyone counts as a full day
            MINUTES_PER_DAY
        } else {
            u64::from(online.get(&account).copied().unwrap_or(0))
        }
    };

    let accounts = store.accounts_by_id()?;
    let mut balances: BTreeMap<AccountId, Amount> = BTreeMap::new();
    for account in &accounts {
        balances.insert(account.id, bonus_eligible_balance(store, account, &asset)?);
    }
    let tree = ReferralTree::build(&accounts, |id| {
        balances.get(&id).copied().unwrap_or(Amount::ZERO)
    });
    let awards = tree.scan(asset.whole_unit());

    for account in &accounts {
        process_bonus_balances(store, account.id, &gpo.parameters, now)?;

        let real_balance = store.balance(account.id, asset.id)?;
        let eligible = balances.get(&account.id).copied().unwrap_or(Amount::ZERO);
        let mut quantity = percent_floor(eligible, LEGACY_BONUS_PERCENT);
        if quantity.raw() < 1 {
            continue;
        }
        if oversight_list.contains(&account.id) || issuer_list.contains(&account.id) {
            continue;
        }

        let minutes = minutes_of(account.id);
        if online_window {
            quantity = scale_by_minutes(quantity, minutes);
            if quantity.raw() < 1 {
                continue;
            }
        }

        let op = Operation::DailyIssue {
            issuer: asset.issuer,
            asset_to_issue: AssetAmount::new(asset.id, quantity),
            issue_to_account: account.id,
            account_balance: real_balance,
        };
        if let Err(e) = evaluator.apply_operation(store, op) {
            debug!(account = %account.id, error = %e, "daily issue rejected");
        }

        let Some(award) = awards.iter().find(|a| a.to == account.id) else {
            continue;
        };
        let amount = if online_window {
            scale_by_minutes(award.amount, minutes)
        } else {
            award.amount
        };
        if amount.raw() < 1 {
            continue;
        }
        let op = Operation::ReferralIssue {
            issuer: asset.issuer,
            asset_to_issue: AssetAmount::new(asset.id, amount),
            issue_to_account: account.id,
            account_balance: real_balance,
            rank: award.rank,
            history: award.history.clone(),
        };
        if let Err(e) = evaluator.apply_operation(store, op) {
            warn!(account = %account.id, error = %e, "referral issue rejected");
        }
    }
    Ok(())
}

fn scale_by_minutes(quantity: Amount, minutes: u64) -> Amount {
    let wide = i128::from(quantity.raw()) * i128::from(minutes) / i128::from(MINUTES_PER_DAY);
    Amount::new(wide as i64)
}

/// Legacy regime: bonuses gated on recent transfer activity in the bonus
/// asset.
pub fn issue_bonuses_legacy<S, E>(
    store: &S,
    evaluator: &E,
    now: Timestamp,
) -> Result<(), MaintenanceError>
where
    S: ChainStore + ?Sized,
    E: OperationEvaluator<S>,
{
    let gpo = store.global_properties()?;
    let Some(asset) = store.asset_by_symbol(&gpo.parameters.bonus_asset_symbol)? else {
        return Ok(());
    };
    let Some(oversight_list) = oversight_blacklist(store)? else {
        return Ok(());
    };
    let issuer_list = store.get_account(asset.issuer)?.blacklisted_accounts;

    let accounts = store.accounts_by_id()?;
    let mut balances: BTreeMap<AccountId, Amount> = BTreeMap::new();
    for account in &accounts {
        balances.insert(account.id, store.balance(account.id, asset.id)?);
    }
    let tree = ReferralTree::build(&accounts, |id| {
        balances.get(&id).copied().unwrap_or(Amount::ZERO)
    });

    for award in tree.scan(asset.whole_unit()) {
        if oversight_list.contains(&award.to) || issuer_list.contains(&award.to) {
            continue;
        }
        if !transferred_recently(store, award.to, &asset, now)? {
            continue;
        }
        let real_balance = store.balance(award.to, asset.id)?;
        let op = Operation::ReferralIssue {
            issuer: asset.issuer,
            asset_to_issue: AssetAmount::new(asset.id, award.amount),
            issue_to_account: award.to,
            account_balance: real_balance,
            rank: award.rank,
            history: award.history,
        };
        if let Err(e) = evaluator.apply_operation(store, op) {
            debug!(account = %award.to, error = %e, "referral issue rejected");
        }
    }

    for account in &accounts {
        if oversight_list.contains(&account.id) || issuer_list.contains(&account.id) {
            continue;
        }
        if !transferred_recently(store, account.id, &asset, now)? {
            continue;
        }
        let balance = store.balance(account.id, asset.id)?;
        if balance.is_zero() {
            continue;
        }
        let quantity = percent_floor(balance, LEGACY_BONUS_PERCENT);
        if quantity.raw() < 1 {
            continue;
        }
        let op = Operation::DailyIssue {
            issuer: asset.issuer,
            asset_to_issue: AssetAmount::new(asset.id, quantity),
            issue_to_account: account.id,
            account_balance: balance,
        };
        if let Err(e) = evaluator.apply_operation(store, op) {
            debug!(account = %account.id, error = %e, "daily issue rejected");
        }
    }
    Ok(())
}

/// Walk an account's history chain, newest first, looking for an outgoing
/// transfer of at least one whole unit of `asset` within the last day.
/// A pruned tail ends the walk.
fn transferred_recently<S: ChainStore + ?Sized>(
    store: &S,
    account: AccountId,
    asset: &Asset,
    now: Timestamp,
) -> Result<bool, MaintenanceError> {
    let stats = store.account_statistics(account)?;
    let Some(mut cursor) = stats.most_recent_op else {
        return Ok(false);
    };
    let cutoff = now.saturating_sub_secs(DAY_SECS);

    loop {
        let Some(entry) = store.account_history_entry(cursor)? else {
            return Ok(false);
        };
        if entry.block_time <= cutoff {
            return Ok(false);
        }
        if let Ok(record) = store.operation(entry.operation) {
            if let Operation::Transfer { from, amount, .. } = record.op {
                if amount.asset == asset.id
                    && amount.amount.raw() >= asset.whole_unit()
                    && from == account
                {
                    return Ok(true);
                }
            }
        }
        match entry.next {
            Some(next) => cursor = next,
            None => return Ok(false),
        }
    }
}
