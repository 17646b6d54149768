//! Producer table implementations.

use crate::MemoryStore;
use meridian_store::{CommitteeMember, ProducerStore, StoreError, Witness, Worker};

impl ProducerStore for MemoryStore {
    fn witnesses(&self) -> Result<Vec<Witness>, StoreError> {
        Ok(self.producers.lock().unwrap().witnesses.values().cloned().collect())
    }

    fn put_witness(&self, witness: &Witness) -> Result<(), StoreError> {
        self.producers
            .lock()
            .unwrap()
            .witnesses
            .insert(witness.id, witness.clone());
        Ok(())
    }

    fn committee_members(&self) -> Result<Vec<CommitteeMember>, StoreError> {
        Ok(self.producers.lock().unwrap().committee.values().cloned().collect())
    }

    fn put_committee_member(&self, member: &CommitteeMember) -> Result<(), StoreError> {
        self.producers
            .lock()
            .unwrap()
            .committee
            .insert(member.id, member.clone());
        Ok(())
    }

    fn workers(&self) -> Result<Vec<Worker>, StoreError> {
        Ok(self.producers.lock().unwrap().workers.values().cloned().collect())
    }

    fn put_worker(&self, worker: &Worker) -> Result<(), StoreError> {
        self.producers
            .lock()
            .unwrap()
            .workers
            .insert(worker.id, worker.clone());
        Ok(())
    }
}
