//! The operation-evaluator boundary.
//!
//! Maintenance synthesizes virtual operations and hands them to the
//! evaluator, which owns validation, state mutation, and history append.
//! Rejections are recoverable at the enumerated best-effort sites.

use meridian_store::Operation;
use meridian_types::LimitOrderId;
use thiserror::Error;

/// A recoverable rejection from the evaluator.
#[derive(Debug, Error)]
#[error("operation rejected: {0}")]
pub struct EvaluatorError(pub String);

impl EvaluatorError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Dispatch of synthesized operations.
///
/// `apply_operation` consumes the operation by value. Order creation
/// returns the new order's id so the caller can check whether it survived
/// matching; every other operation returns `None`.
pub trait OperationEvaluator<S: ?Sized> {
    fn apply_operation(
        &self,
        store: &S,
        op: Operation,
    ) -> Result<Option<LimitOrderId>, EvaluatorError>;
}
