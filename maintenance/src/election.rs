//! Producer election.
//!
//! Witnesses and committee members are elected the same way: the size
//! histogram decides how many seats exist, the tally buffer decides who
//! fills them, and the winners' weights rebuild the producer account's
//! active authority.

use crate::buffers::VoteBuffers;
use crate::error::MaintenanceError;
use crate::vote_count::{bits_to_drop, VoteCounter};
use meridian_store::{ChainStore, GlobalProperties};
use meridian_types::{AccountId, Authority, Timestamp, VoteId};
use std::collections::BTreeMap;

/// Walk the histogram from bucket 1 upward, accumulating until the running
/// sum exceeds the target. Bucket zero holds accounts voting for 0 or 1
/// producers; they abstain from the size question.
fn histogram_walk(histogram: &[u64], stake_target: u64) -> usize {
    let mut count = 0usize;
    if stake_target > 0 {
        let mut tally = 0u64;
        while count < histogram.len() - 1 && tally <= stake_target {
            count += 1;
            tally = tally.saturating_add(histogram[count]);
        }
    }
    count
}

/// A producer candidate flattened for sorting.
struct Candidate<Id> {
    id: Id,
    account: AccountId,
    vote_id: VoteId,
    votes: u64,
}

/// Keep the top `count` candidates by (votes desc, vote id asc).
///
/// Callers clamp `count` to the candidate count before calling.
fn sort_producers<Id>(mut refs: Vec<Candidate<Id>>, count: usize) -> Vec<Candidate<Id>> {
    debug_assert!(count <= refs.len());
    refs.sort_by(|a, b| b.votes.cmp(&a.votes).then(a.vote_id.cmp(&b.vote_id)));
    refs.truncate(count);
    refs
}

/// Rebuild an authority from winners' raw weights, as consensus did before
/// the compact-authority fork.
fn build_legacy_authority(winners: &[(AccountId, u64)], auth: &mut Authority) {
    let mut total_votes: u64 = 0;
    let mut weights: BTreeMap<AccountId, u64> = BTreeMap::new();
    auth.clear();

    for (account, votes) in winners {
        // first weight wins for duplicate accounts; the total still counts
        // every seat
        weights.entry(*account).or_insert(*votes);
        total_votes = total_votes.saturating_add(*votes);
    }

    // keep the most significant 16 bits of the combined total
    let drop = bits_to_drop(total_votes);
    for (account, weight) in weights {
        // zero weights aren't allowed; everyone keeps at least one vote
        let compressed = (weight >> drop).max(1) as u16;
        auth.add_account_weight(account, compressed);
        auth.weight_threshold += u32::from(compressed);
    }

    auth.weight_threshold /= 2;
    auth.weight_threshold += 1;
}

fn buffered_votes(buffers: &VoteBuffers, vote_id: VoteId) -> u64 {
    buffers
        .vote_tally
        .get(vote_id.instance() as usize)
        .copied()
        .unwrap_or(0)
}

fn rebuild_producer_authority<S: ChainStore + ?Sized>(
    store: &S,
    producer_account: AccountId,
    winners: &[(AccountId, u64)],
    now: Timestamp,
    gpo: &GlobalProperties,
) -> Result<(), MaintenanceError> {
    let mut account = store.get_account(producer_account)?;
    if now < gpo.hardforks.compact_authority_time {
        build_legacy_authority(winners, &mut account.active);
    } else {
        let mut vc = VoteCounter::new();
        for (winner, votes) in winners {
            vc.add(*winner, *votes);
        }
        vc.finish(&mut account.active);
    }
    store.put_account(&account)?;
    Ok(())
}

/// Elect witnesses, write back vote totals, and refresh the witness
/// account's authority and the active set.
pub fn update_active_witnesses<S: ChainStore + ?Sized>(
    store: &S,
    buffers: &VoteBuffers,
    gpo: &GlobalProperties,
    now: Timestamp,
) -> Result<(), MaintenanceError> {
    if buffers.witness_histogram.is_empty() {
        return Err(MaintenanceError::Invariant("witness histogram is empty"));
    }
    let stake_target =
        buffers.total_voting_stake.saturating_sub(buffers.witness_histogram[0]) / 2;
    let count = histogram_walk(&buffers.witness_histogram, stake_target);
    let desired = (count * 2 + 1).max(usize::from(gpo.immutable_parameters.min_witness_count));

    let all = store.witnesses()?;
    let candidates: Vec<Candidate<meridian_types::WitnessId>> = all
        .iter()
        .map(|w| Candidate {
            id: w.id,
            account: w.witness_account,
            vote_id: w.vote_id,
            votes: buffered_votes(buffers, w.vote_id),
        })
        .collect();
    let winners = sort_producers(candidates, desired.min(all.len()));

    // winners and losers alike get their tallies written back
    for mut witness in all {
        witness.total_votes = buffered_votes(buffers, witness.vote_id);
        store.put_witness(&witness)?;
    }

    let weights: Vec<(AccountId, u64)> =
        winners.iter().map(|c| (c.account, c.votes)).collect();
    rebuild_producer_authority(store, AccountId::WITNESS, &weights, now, gpo)?;

    let mut gp = store.global_properties()?;
    gp.active_witnesses = winners.iter().map(|c| c.id).collect();
    store.put_global_properties(&gp)?;
    Ok(())
}

/// Elect committee members; mirrors the witness path, including the
/// witness histogram's bucket zero in the stake target. That subtraction
/// is deliberate and consensus-relevant; the committee's own bucket zero
/// is never consulted.
pub fn update_active_committee_members<S: ChainStore + ?Sized>(
    store: &S,
    buffers: &VoteBuffers,
    gpo: &GlobalProperties,
    now: Timestamp,
) -> Result<(), MaintenanceError> {
    if buffers.committee_histogram.is_empty() || buffers.witness_histogram.is_empty() {
        return Err(MaintenanceError::Invariant("committee histogram is empty"));
    }
    let stake_target =
        buffers.total_voting_stake.saturating_sub(buffers.witness_histogram[0]) / 2;
    let count = histogram_walk(&buffers.committee_histogram, stake_target);
    let desired =
        (count * 2 + 1).max(usize::from(gpo.immutable_parameters.min_committee_member_count));

    let all = store.committee_members()?;
    let candidates: Vec<Candidate<meridian_types::CommitteeMemberId>> = all
        .iter()
        .map(|m| Candidate {
            id: m.id,
            account: m.committee_member_account,
            vote_id: m.vote_id,
            votes: buffered_votes(buffers, m.vote_id),
        })
        .collect();
    let winners = sort_producers(candidates, desired.min(all.len()));

    for mut member in all {
        member.total_votes = buffered_votes(buffers, member.vote_id);
        store.put_committee_member(&member)?;
    }

    if !winners.is_empty() {
        let weights: Vec<(AccountId, u64)> =
            winners.iter().map(|c| (c.account, c.votes)).collect();
        rebuild_producer_authority(store, AccountId::COMMITTEE, &weights, now, gpo)?;

        // the relaxed committee account mirrors the committee authority
        let committee = store.get_account(AccountId::COMMITTEE)?;
        let mut relaxed = store.get_account(AccountId::RELAXED_COMMITTEE)?;
        relaxed.active = committee.active;
        store.put_account(&relaxed)?;
    }

    let mut gp = store.global_properties()?;
    gp.active_committee_members = winners.iter().map(|c| c.id).collect();
    store.put_global_properties(&gp)?;
    Ok(())
}
