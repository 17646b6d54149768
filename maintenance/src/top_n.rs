//! Top-holders special authorities.
//!
//! Accounts may delegate an authority to "the top N holders of asset X".
//! Each maintenance rebuilds those authorities from a fresh snapshot of
//! the balance index, weighted through the vote counter's compression.

use crate::error::MaintenanceError;
use crate::vote_count::VoteCounter;
use meridian_store::ChainStore;
use meridian_types::{SpecialAuthority, TOP_N_CONTROL_ACTIVE, TOP_N_CONTROL_OWNER};

/// Rebuild every top-holders authority.
pub fn refresh_top_n_authorities<S: ChainStore + ?Sized>(
    store: &S,
) -> Result<(), MaintenanceError> {
    for account_id in store.accounts_with_special_authority()? {
        let mut account = store.get_account(account_id)?;
        let mut touched = false;

        let specials = [
            (true, account.owner_special_authority.clone()),
            (false, account.active_special_authority.clone()),
        ];
        for (is_owner, special) in specials {
            let SpecialAuthority::TopHolders {
                asset,
                num_top_holders,
            } = special
            else {
                continue;
            };
            if num_top_holders == 0 {
                continue;
            }

            let mut vc = VoteCounter::new();
            let mut needed = num_top_holders;
            for holder in store.holders_by_balance(asset)? {
                debug_assert_eq!(holder.asset, asset);
                if holder.owner == account.id {
                    continue;
                }
                vc.add(holder.owner, holder.balance.positive_u64());
                needed -= 1;
                if needed == 0 {
                    break;
                }
            }

            let is_empty = vc.is_empty();
            let target = if is_owner {
                &mut account.owner
            } else {
                &mut account.active
            };
            vc.finish(target);
            if !is_empty {
                account.top_n_control_flags |= if is_owner {
                    TOP_N_CONTROL_OWNER
                } else {
                    TOP_N_CONTROL_ACTIVE
                };
            }
            touched = true;
        }

        if touched {
            store.put_account(&account)?;
        }
    }
    Ok(())
}
