//! Chain maintenance — the block-triggered consensus procedure of the
//! Meridian ledger.
//!
//! Whenever an applied block crosses the scheduled maintenance boundary,
//! the driver recomputes consensus state from accumulated voting stake and
//! disburses the network's inflationary and fee budgets. Every validator
//! must produce bit-identical results from the same inputs, so everything
//! here is integer arithmetic over a snapshot of the object store, in a
//! fixed component order.
//!
//! ## Module overview
//!
//! - [`driver`] — Orchestration: fixed component order, parameter rollover,
//!   maintenance-time advance.
//! - [`tally`] — Stake-weighted vote tally and fee processing over all
//!   accounts.
//! - [`election`] — Witness and committee election from the size histograms.
//! - [`vote_count`] — 16-bit weight compression for rebuilt authorities.
//! - [`top_n`] — "Top holders of asset X" authority refresh.
//! - [`budget`] — Inflation budget computation and supply reconciliation.
//! - [`payroll`] — Worker vote write-back and stake-ordered payroll.
//! - [`fba`] — Fee-accumulator three-way distribution.
//! - [`buyback`] — Limit-order synthesis for buyback accounts.
//! - [`funds`] — Fund advance and wind-down.
//! - [`cheques`] — Expired-cheque reversal.
//! - [`bonus`] — Daily issuance regimes and mature balances.
//! - [`referral`] — Referral tree and rank scan.
//! - [`pruning`] — Retention-window history sweeps.

pub mod bonus;
pub mod budget;
pub mod buffers;
pub mod buyback;
pub mod cheques;
pub mod driver;
pub mod election;
pub mod error;
pub mod evaluator;
pub mod fba;
pub mod funds;
pub mod payroll;
pub mod pruning;
pub mod referral;
pub mod tally;
pub mod top_n;
pub mod vote_count;

pub use buffers::{BufferGuard, VoteBuffers};
pub use driver::{perform_chain_maintenance, MaintenanceBlock};
pub use error::MaintenanceError;
pub use evaluator::{EvaluatorError, OperationEvaluator};
pub use vote_count::VoteCounter;
