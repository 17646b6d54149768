//! Entity definitions and abstract storage traits for the Meridian ledger.
//!
//! Every storage backend (the production object store, the in-memory
//! reference backend for consensus tests) implements these traits. The rest
//! of the workspace depends only on the traits.
//!
//! Traits take `&self`; backends provide interior mutability. Consensus
//! code runs under the exclusive write lease of block application, so
//! observed state is never partial.

pub mod account;
pub mod asset;
pub mod cheque;
pub mod error;
pub mod fund;
pub mod global;
pub mod history;
pub mod market;
pub mod operations;
pub mod producer;

pub use account::{
    Account, AccountBalance, AccountOptions, AccountStatistics, AccountStore, BalanceStore,
    BonusBalance, BonusEntry, MatureBalance, MatureBalanceEntry, VestingBalance,
};
pub use asset::{Asset, AssetDynamicData, AssetParams, AssetStore, BitassetData, FbaAccumulator};
pub use cheque::{Cheque, ChequeStatus, ChequeStore};
pub use error::StoreError;
pub use fund::{Fund, FundDeposit, FundStore, PaymentRate};
pub use global::{BudgetRecord, DynamicGlobalProperties, GlobalProperties, GlobalStore};
pub use history::{AccountHistoryEntry, FundHistoryEntry, HistoryStore, OperationHistory};
pub use market::MarketStore;
pub use operations::{AssetAmount, ChildBalance, Operation, ReferralRank};
pub use producer::{CommitteeMember, ProducerStore, Witness, Worker, WorkerPayout};

/// The full storage surface the maintenance procedure runs against.
pub trait ChainStore:
    AccountStore
    + BalanceStore
    + AssetStore
    + ProducerStore
    + FundStore
    + ChequeStore
    + HistoryStore
    + GlobalStore
    + MarketStore
{
}

impl<S> ChainStore for S where
    S: AccountStore
        + BalanceStore
        + AssetStore
        + ProducerStore
        + FundStore
        + ChequeStore
        + HistoryStore
        + GlobalStore
        + MarketStore
{
}
