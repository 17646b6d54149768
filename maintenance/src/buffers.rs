//! Per-maintenance scratch buffers.
//!
//! The tally buffer is sized by `next_available_vote_id` at entry; the two
//! histograms bucket stake by "preferred producer count / 2". All four
//! values live exactly one maintenance call. [`BufferGuard`] binds the
//! clearing to scope exit, so the next interval starts fresh even when a
//! deeper mutation fails after the buffers are populated.

use std::ops::{Deref, DerefMut};

/// Scratch state of one maintenance call.
#[derive(Debug, Default)]
pub struct VoteBuffers {
    /// Stake approving each vote id, indexed by vote-id instance.
    pub vote_tally: Vec<u64>,
    /// Stake per preferred witness count / 2.
    pub witness_histogram: Vec<u64>,
    /// Stake per preferred committee size / 2.
    pub committee_histogram: Vec<u64>,
    pub total_voting_stake: u64,
}

impl VoteBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Size the buffers for one maintenance call and zero them.
    pub fn prepare(&mut self, vote_id_count: u32, max_witnesses: u16, max_committee: u16) {
        self.vote_tally.clear();
        self.vote_tally.resize(vote_id_count as usize, 0);
        self.witness_histogram.clear();
        self.witness_histogram
            .resize(usize::from(max_witnesses) / 2 + 1, 0);
        self.committee_histogram.clear();
        self.committee_histogram
            .resize(usize::from(max_committee) / 2 + 1, 0);
        self.total_voting_stake = 0;
    }

    /// Release everything.
    pub fn clear(&mut self) {
        self.vote_tally = Vec::new();
        self.witness_histogram = Vec::new();
        self.committee_histogram = Vec::new();
        self.total_voting_stake = 0;
    }

    pub fn is_clear(&self) -> bool {
        self.vote_tally.is_empty()
            && self.witness_histogram.is_empty()
            && self.committee_histogram.is_empty()
            && self.total_voting_stake == 0
    }
}

/// Clears the wrapped buffers when dropped, on every exit path.
pub struct BufferGuard<'a> {
    buffers: &'a mut VoteBuffers,
}

impl<'a> BufferGuard<'a> {
    pub fn new(buffers: &'a mut VoteBuffers) -> Self {
        Self { buffers }
    }
}

impl Deref for BufferGuard<'_> {
    type Target = VoteBuffers;

    fn deref(&self) -> &VoteBuffers {
        self.buffers
    }
}

impl DerefMut for BufferGuard<'_> {
    fn deref_mut(&mut self) -> &mut VoteBuffers {
        self.buffers
    }
}

impl Drop for BufferGuard<'_> {
    fn drop(&mut self) {
        self.buffers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepare_sizes_and_zeroes() {
        let mut buffers = VoteBuffers::new();
        buffers.prepare(10, 21, 11);
        assert_eq!(buffers.vote_tally.len(), 10);
        assert_eq!(buffers.witness_histogram.len(), 11);
        assert_eq!(buffers.committee_histogram.len(), 6);
        assert_eq!(buffers.total_voting_stake, 0);
    }

    #[test]
    fn guard_clears_on_drop() {
        let mut buffers = VoteBuffers::new();
        {
            let mut guard = BufferGuard::new(&mut buffers);
            guard.prepare(4, 3, 3);
            guard.vote_tally[0] = 99;
            guard.total_voting_stake = 7;
        }
        assert!(buffers.is_clear());
    }

    #[test]
    fn guard_clears_on_early_return() {
        fn failing(buffers: &mut VoteBuffers) -> Result<(), ()> {
            let mut guard = BufferGuard::new(buffers);
            guard.prepare(4, 3, 3);
            guard.vote_tally[2] = 1;
            Err(())
        }

        let mut buffers = VoteBuffers::new();
        assert!(failing(&mut buffers).is_err());
        assert!(buffers.is_clear());
    }
}
