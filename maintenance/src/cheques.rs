//! Expired-cheque reversal.

use crate::error::MaintenanceError;
use crate::evaluator::OperationEvaluator;
use meridian_store::operations::AssetAmount;
use meridian_store::{ChainStore, ChequeStatus, Operation};
use meridian_types::Timestamp;
use tracing::warn;

/// Reverse every uncollected cheque whose expiration fell inside the
/// interval that just ended, returning the remainder to the drawer.
/// Evaluator rejections are swallowed per cheque.
pub fn process_cheques<S, E>(
    store: &S,
    evaluator: &E,
    next_maintenance_time: Timestamp,
    maintenance_interval: u64,
) -> Result<(), MaintenanceError>
where
    S: ChainStore + ?Sized,
    E: OperationEvaluator<S>,
{
    let boundary = next_maintenance_time.saturating_sub_secs(maintenance_interval);
    for cheque in store.cheques()? {
        if cheque.status != ChequeStatus::New || boundary < cheque.datetime_expiration {
            continue;
        }

        let op = Operation::ChequeReverse {
            cheque: cheque.id,
            account: cheque.drawer,
            amount: AssetAmount::new(cheque.asset, cheque.amount_remaining),
        };
        if let Err(e) = evaluator.apply_operation(store, op) {
            warn!(cheque = %cheque.id, error = %e, "cheque reverse rejected");
        }
    }
    Ok(())
}
