//! Maintenance error type.
//!
//! Errors here are fatal: they abort the block. Recoverable evaluator
//! rejections inside best-effort loops are caught at the loop site and
//! never surface through this type.

use meridian_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MaintenanceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("consensus invariant violated: {0}")]
    Invariant(&'static str),

    #[error("arithmetic overflow in {0}")]
    Overflow(&'static str),
}
