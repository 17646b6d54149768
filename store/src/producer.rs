//! Witnesses, committee members, and workers.

use crate::StoreError;
use meridian_types::{
    AccountId, Amount, CommitteeMemberId, Timestamp, VoteId, WitnessId, WorkerId,
};
use serde::{Deserialize, Serialize};

/// A block-producer candidate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Witness {
    pub id: WitnessId,
    pub witness_account: AccountId,
    pub vote_id: VoteId,
    /// Stake approving this witness, written back each maintenance.
    pub total_votes: u64,
}

/// A committee-member candidate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitteeMember {
    pub id: CommitteeMemberId,
    pub committee_member_account: AccountId,
    pub vote_id: VoteId,
    pub total_votes: u64,
}

/// How a worker receives its pay. Closed variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerPayout {
    /// Pay vests to the worker account.
    Vesting,
    /// Pay is destroyed.
    Burn,
    /// Pay returns to the reserve.
    Refund,
}

/// A funded worker proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    pub id: WorkerId,
    pub worker_account: AccountId,
    pub work_begin_date: Timestamp,
    pub work_end_date: Timestamp,
    pub daily_pay: Amount,
    pub vote_for: VoteId,
    pub vote_against: VoteId,
    pub total_votes_for: u64,
    pub total_votes_against: u64,
    pub payout: WorkerPayout,
}

impl Worker {
    pub fn is_active(&self, now: Timestamp) -> bool {
        self.work_begin_date <= now && now < self.work_end_date
    }

    /// Net approving stake; negative when against-votes dominate.
    pub fn approving_stake(&self) -> i64 {
        let wide = i128::from(self.total_votes_for) - i128::from(self.total_votes_against);
        wide.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
    }
}

/// Producer candidate records.
pub trait ProducerStore {
    /// All witnesses ordered by id.
    fn witnesses(&self) -> Result<Vec<Witness>, StoreError>;

    fn put_witness(&self, witness: &Witness) -> Result<(), StoreError>;

    /// All committee members ordered by id.
    fn committee_members(&self) -> Result<Vec<CommitteeMember>, StoreError>;

    fn put_committee_member(&self, member: &CommitteeMember) -> Result<(), StoreError>;

    /// All workers ordered by id.
    fn workers(&self) -> Result<Vec<Worker>, StoreError>;

    fn put_worker(&self, worker: &Worker) -> Result<(), StoreError>;
}
