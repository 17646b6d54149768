//! The account traversal: vote tally and fee processing.
//!
//! One pass over all accounts in name order does double duty. Each
//! account's stake is attributed to the votes and size opinions of its
//! effective opinion account, and its pending fees are paid out as
//! cashback.

use crate::buffers::VoteBuffers;
use crate::error::MaintenanceError;
use meridian_store::{Account, ChainStore, GlobalProperties};
use meridian_types::{AccountId, AssetId, Timestamp};

/// Tally voting stake into the scratch buffers and process pending fees,
/// in a single traversal of the account set.
pub fn tally_votes_and_fees<S: ChainStore + ?Sized>(
    store: &S,
    buffers: &mut VoteBuffers,
    gpo: &GlobalProperties,
    now: Timestamp,
) -> Result<(), MaintenanceError> {
    buffers.prepare(
        gpo.next_available_vote_id,
        gpo.parameters.maximum_witness_count,
        gpo.parameters.maximum_committee_count,
    );

    for stake_account in store.accounts_by_name()? {
        if gpo.parameters.count_non_member_votes || stake_account.is_member(now) {
            tally_one(store, buffers, gpo, &stake_account)?;
        }
        process_pending_fees(store, &stake_account)?;
    }
    Ok(())
}

fn tally_one<S: ChainStore + ?Sized>(
    store: &S,
    buffers: &mut VoteBuffers,
    gpo: &GlobalProperties,
    stake_account: &Account,
) -> Result<(), MaintenanceError> {
    // The stake account and the account specifying opinions may differ:
    // a configured voting_account proxies the opinions, one hop only.
    let opinion_account = if stake_account.options.voting_account == AccountId::PROXY_TO_SELF {
        stake_account.clone()
    } else {
        store.get_account(stake_account.options.voting_account)?
    };

    let stats = store.account_statistics(stake_account.id)?;
    let cashback = match stake_account.cashback_vb {
        Some(id) => store.vesting_balance(id)?.balance.positive_u64(),
        None => 0,
    };
    let voting_stake = stats
        .total_core_in_orders
        .positive_u64()
        .saturating_add(cashback)
        .saturating_add(
            store
                .balance(stake_account.id, AssetId::CORE)?
                .positive_u64(),
        );

    for vote in &opinion_account.options.votes {
        let offset = vote.instance() as usize;
        // an illegal offset is silently ignored
        if let Some(slot) = buffers.vote_tally.get_mut(offset) {
            *slot = slot.saturating_add(voting_stake);
        }
    }

    // Opinions above the maximum count no slot at all; opinions between
    // the histogram tail and the maximum collapse into the last bucket,
    // which covers a later lowering of the maximum.
    if opinion_account.options.num_witness <= gpo.parameters.maximum_witness_count {
        let offset = usize::from(opinion_account.options.num_witness / 2)
            .min(buffers.witness_histogram.len() - 1);
        buffers.witness_histogram[offset] =
            buffers.witness_histogram[offset].saturating_add(voting_stake);
    }
    if opinion_account.options.num_committee <= gpo.parameters.maximum_committee_count {
        let offset = usize::from(opinion_account.options.num_committee / 2)
            .min(buffers.committee_histogram.len() - 1);
        buffers.committee_histogram[offset] =
            buffers.committee_histogram[offset].saturating_add(voting_stake);
    }

    buffers.total_voting_stake = buffers.total_voting_stake.saturating_add(voting_stake);
    Ok(())
}

/// Pay out an account's pending fees: the vesting part to its cashback
/// balance (core balance when none exists), the vested part straight to
/// the core balance.
fn process_pending_fees<S: ChainStore + ?Sized>(
    store: &S,
    account: &Account,
) -> Result<(), MaintenanceError> {
    let mut stats = store.account_statistics(account.id)?;
    if stats.pending_fees.is_zero() && stats.pending_vested_fees.is_zero() {
        return Ok(());
    }

    let pending = stats.pending_fees;
    let vested = stats.pending_vested_fees;

    if !pending.is_zero() {
        match account.cashback_vb {
            Some(id) => {
                let mut vb = store.vesting_balance(id)?;
                vb.balance = vb
                    .balance
                    .checked_add(pending)
                    .ok_or(MaintenanceError::Overflow("cashback vesting balance"))?;
                store.put_vesting_balance(&vb)?;
            }
            None => store.adjust_balance(account.id, AssetId::CORE, pending)?,
        }
    }
    if !vested.is_zero() {
        store.adjust_balance(account.id, AssetId::CORE, vested)?;
    }

    stats.pending_fees = meridian_types::Amount::ZERO;
    stats.pending_vested_fees = meridian_types::Amount::ZERO;
    store.put_account_statistics(&stats)?;
    Ok(())
}
