//! Buyback order synthesis.
//!
//! Each buyback account periodically converts its miscellaneous holdings
//! into the asset it backs: one limit order per held asset, selling the
//! entire balance for a single satoshi of the target, cancelled if it does
//! not fill immediately. Failures are per-balance and never abort the
//! sweep.

use crate::error::MaintenanceError;
use crate::evaluator::OperationEvaluator;
use meridian_store::{ChainStore, Operation};
use meridian_store::operations::AssetAmount;
use meridian_types::{Amount, AssetId, Timestamp};
use tracing::warn;

/// Synthesize sell orders for every buyback account.
pub fn create_buyback_orders<S, E>(
    store: &S,
    evaluator: &E,
    block_num: u64,
) -> Result<(), MaintenanceError>
where
    S: ChainStore + ?Sized,
    E: OperationEvaluator<S>,
{
    for target in store.buyback_targets()? {
        let asset_to_buy = store.get_asset(target)?;
        let Some(buyback_account_id) = asset_to_buy.buyback_account else {
            return Err(MaintenanceError::Invariant(
                "buyback target without a buyback account",
            ));
        };
        let buyback_account = store.get_account(buyback_account_id)?;

        let Some(allowed_assets) = buyback_account.allowed_assets.clone() else {
            warn!(
                account = %buyback_account_id,
                block = block_num,
                "skipping buyback account without an allowed-assets set"
            );
            continue;
        };

        // Cursor walk in ascending asset order; orders placed here consume
        // balances mid-iteration, so each step re-reads the index.
        let mut next_asset = AssetId::new(0);
        loop {
            let Some(balance) = store.first_balance_at_or_after(buyback_account_id, next_asset)?
            else {
                break;
            };
            let asset_to_sell = balance.asset;
            let amount_to_sell = balance.balance;
            next_asset = AssetId::new(asset_to_sell.instance() + 1);

            if asset_to_sell == target || amount_to_sell.is_zero() {
                continue;
            }
            if !allowed_assets.contains(&asset_to_sell) {
                warn!(
                    account = %buyback_account_id,
                    asset = %asset_to_sell,
                    block = block_num,
                    "buyback account not selling disallowed holdings"
                );
                continue;
            }

            let create = Operation::LimitOrderCreate {
                seller: buyback_account_id,
                amount_to_sell: AssetAmount::new(asset_to_sell, amount_to_sell),
                min_to_receive: AssetAmount::new(target, Amount::new(1)),
                expiration: Timestamp::MAX,
                fill_or_kill: false,
            };

            match evaluator.apply_operation(store, create) {
                Ok(Some(order_id)) => {
                    // an order still on the book did not fully fill
                    if store.limit_order_exists(order_id)? {
                        let cancel = Operation::LimitOrderCancel {
                            order: order_id,
                            fee_paying_account: buyback_account_id,
                        };
                        if let Err(e) = evaluator.apply_operation(store, cancel) {
                            warn!(
                                account = %buyback_account_id,
                                order = %order_id,
                                error = %e,
                                "buyback order cancel rejected"
                            );
                        }
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    // e.g. the issuer of either asset blacklisted the
                    // buyback account
                    warn!(
                        selling = %asset_to_sell,
                        buying = %target,
                        account = %buyback_account_id,
                        block = block_num,
                        error = %e,
                        "skipping buyback order"
                    );
                    continue;
                }
            }
        }
    }
    Ok(())
}
