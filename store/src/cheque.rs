//! Cheques drawn against accounts.

use crate::StoreError;
use meridian_types::{AccountId, Amount, AssetId, ChequeId, Timestamp};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a cheque.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChequeStatus {
    /// Issued, not yet fully collected.
    New,
    /// Fully collected by its payees.
    Used,
    /// Expired; the remainder was returned to the drawer.
    Reversed,
    /// Cancelled by the drawer.
    Undone,
}

/// A cheque: an amount reserved by the drawer, collectible by payees until
/// expiration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cheque {
    pub id: ChequeId,
    pub drawer: AccountId,
    pub asset: AssetId,
    /// Amount not yet collected.
    pub amount_remaining: Amount,
    pub datetime_creation: Timestamp,
    pub datetime_expiration: Timestamp,
    pub status: ChequeStatus,
}

/// Cheque records.
pub trait ChequeStore {
    /// All cheques ordered by id.
    fn cheques(&self) -> Result<Vec<Cheque>, StoreError>;

    fn get_cheque(&self, id: ChequeId) -> Result<Cheque, StoreError>;

    fn put_cheque(&self, cheque: &Cheque) -> Result<(), StoreError>;

    fn remove_cheque(&self, id: ChequeId) -> Result<(), StoreError>;

    /// Cheques created strictly before `cutoff`, ordered by creation time
    /// then id.
    fn cheques_created_before(&self, cutoff: Timestamp) -> Result<Vec<ChequeId>, StoreError>;
}
