//! Shared fixture for maintenance integration tests.

use meridian_maintenance::{
    perform_chain_maintenance, EvaluatorError, MaintenanceBlock, MaintenanceError,
    OperationEvaluator, VoteBuffers,
};
use meridian_store::operations::AssetAmount;
use meridian_store::{
    Account, AccountStore, Asset, AssetStore, BalanceStore, ChequeStatus, ChequeStore,
    GlobalStore, HistoryStore, Operation, Witness,
};
use meridian_store_memory::MemoryStore;
use meridian_types::{
    AccountId, Amount, AssetId, Authority, LimitOrderId, SpecialAuthority, Timestamp, VoteKind,
    WitnessId,
};

pub const DAY: u64 = 86_400;

/// A plain lifetime-member account voting for itself.
pub fn account(id: u64, name: &str) -> Account {
    Account {
        id: AccountId::new(id),
        name: name.into(),
        membership_expiration_date: Timestamp::MAX,
        registrar: AccountId::new(id),
        referrer: AccountId::new(id),
        owner: Authority::new(),
        active: Authority::new(),
        options: meridian_store::AccountOptions {
            voting_account: AccountId::PROXY_TO_SELF,
            ..Default::default()
        },
        cashback_vb: None,
        blacklisted_accounts: Default::default(),
        owner_special_authority: SpecialAuthority::None,
        active_special_authority: SpecialAuthority::None,
        top_n_control_flags: 0,
        allowed_assets: None,
        burning_mode_enabled: false,
        deposits_autorenewal_enabled: true,
    }
}

/// A store with the core asset, the special accounts, and a schedule that
/// triggers maintenance at `now`.
pub fn base_store(now: Timestamp) -> MemoryStore {
    let store = MemoryStore::new();

    store
        .put_asset(&Asset {
            id: AssetId::CORE,
            symbol: "CORE".into(),
            precision: 5,
            issuer: AccountId::COMMITTEE,
            max_supply: Amount::new(1_000_000_000_000),
            params: Default::default(),
            buyback_account: None,
        })
        .unwrap();
    let mut core_dd = store.asset_dynamic_data(AssetId::CORE).unwrap();
    core_dd.current_supply = Amount::new(1_000_000_000);
    store.put_asset_dynamic_data(&core_dd).unwrap();

    for (id, name) in [
        (AccountId::COMMITTEE, "committee-account"),
        (AccountId::WITNESS, "witness-account"),
        (AccountId::RELAXED_COMMITTEE, "relaxed-committee-account"),
        (AccountId::OVERSIGHT, "oversight-account"),
    ] {
        store.put_account(&account(id.instance(), name)).unwrap();
    }

    let mut gpo = store.global_properties().unwrap();
    gpo.parameters.maintenance_interval = DAY as u32;
    gpo.parameters.block_interval = 5;
    gpo.parameters.count_non_member_votes = false;
    gpo.immutable_parameters.min_witness_count = 1;
    gpo.immutable_parameters.min_committee_member_count = 1;
    store.put_global_properties(&gpo).unwrap();

    let mut dpo = store.dynamic_properties().unwrap();
    dpo.head_block_time = now;
    dpo.head_block_num = 1_000;
    dpo.next_maintenance_time = now;
    dpo.last_budget_time = now.saturating_sub_secs(DAY);
    store.put_dynamic_properties(&dpo).unwrap();

    store
}

/// Register a witness whose candidate account votes for it.
pub fn add_witness(store: &MemoryStore, id: u64, account_id: AccountId) -> Witness {
    let vote_id = store.allocate_vote_id(VoteKind::Witness);
    let witness = Witness {
        id: WitnessId::new(id),
        witness_account: account_id,
        vote_id,
        total_votes: 0,
    };
    meridian_store::ProducerStore::put_witness(store, &witness).unwrap();
    witness
}

/// Scripted evaluator: mutates the in-memory store the way the real
/// operation pipeline would, with switches for the failure modes the
/// best-effort loops must tolerate.
#[derive(Default)]
pub struct TestEvaluator {
    /// Created limit orders fill (and vanish) immediately.
    pub fill_orders: bool,
    /// Reject every issuance operation.
    pub reject_issues: bool,
}

impl TestEvaluator {
    fn head(&self, store: &MemoryStore) -> (Timestamp, u64) {
        let dpo = store.dynamic_properties().unwrap();
        (dpo.head_block_time, dpo.head_block_num)
    }

    fn record(&self, store: &MemoryStore, op: Operation) {
        let (time, block) = self.head(store);
        store.push_applied_operation(op, time, block).unwrap();
    }

    fn issue(&self, store: &MemoryStore, to: AccountId, asset_amount: AssetAmount) {
        store
            .adjust_balance(to, asset_amount.asset, asset_amount.amount)
            .unwrap();
        let mut dd = store.asset_dynamic_data(asset_amount.asset).unwrap();
        dd.current_supply = dd.current_supply.saturating_add(asset_amount.amount);
        store.put_asset_dynamic_data(&dd).unwrap();
    }
}

impl OperationEvaluator<MemoryStore> for TestEvaluator {
    fn apply_operation(
        &self,
        store: &MemoryStore,
        op: Operation,
    ) -> Result<Option<LimitOrderId>, EvaluatorError> {
        match op.clone() {
            Operation::LimitOrderCreate {
                seller,
                amount_to_sell,
                min_to_receive,
                ..
            } => {
                let id = store.insert_limit_order();
                if self.fill_orders {
                    store.remove_limit_order(id);
                    store
                        .adjust_balance(seller, amount_to_sell.asset, -amount_to_sell.amount)
                        .unwrap();
                    store
                        .adjust_balance(seller, min_to_receive.asset, min_to_receive.amount)
                        .unwrap();
                }
                self.record(store, op);
                Ok(Some(id))
            }
            Operation::LimitOrderCancel { order, .. } => {
                store.remove_limit_order(order);
                self.record(store, op);
                Ok(None)
            }
            Operation::DailyIssue {
                asset_to_issue,
                issue_to_account,
                ..
            } => {
                if self.reject_issues {
                    return Err(EvaluatorError::new("issuance disabled"));
                }
                self.issue(store, issue_to_account, asset_to_issue);
                self.record(store, op);
                Ok(None)
            }
            Operation::ReferralIssue {
                asset_to_issue,
                issue_to_account,
                ..
            } => {
                if self.reject_issues {
                    return Err(EvaluatorError::new("issuance disabled"));
                }
                self.issue(store, issue_to_account, asset_to_issue);
                self.record(store, op);
                Ok(None)
            }
            Operation::ChequeReverse {
                cheque,
                account,
                amount,
            } => {
                let mut record = store
                    .get_cheque(cheque)
                    .map_err(|e| EvaluatorError::new(e.to_string()))?;
                if record.status != ChequeStatus::New {
                    return Err(EvaluatorError::new("cheque is not reversible"));
                }
                record.status = ChequeStatus::Reversed;
                record.amount_remaining = Amount::ZERO;
                store.put_cheque(&record).unwrap();
                store.adjust_balance(account, amount.asset, amount.amount).unwrap();
                self.record(store, op);
                Ok(None)
            }
            Operation::AccountUpgrade {
                account_to_upgrade, ..
            } => {
                let mut upgraded = store
                    .get_account(account_to_upgrade)
                    .map_err(|e| EvaluatorError::new(e.to_string()))?;
                upgraded.membership_expiration_date = Timestamp::MAX;
                store.put_account(&upgraded).unwrap();
                self.record(store, op);
                Ok(None)
            }
            Operation::Transfer { from, to, amount } => {
                store.adjust_balance(from, amount.asset, -amount.amount).unwrap();
                store.adjust_balance(to, amount.asset, amount.amount).unwrap();
                let (time, block) = self.head(store);
                let op_id = store.push_applied_operation(op, time, block).unwrap();
                store.append_account_history(from, op_id, time).unwrap();
                store.append_account_history(to, op_id, time).unwrap();
                Ok(None)
            }
            Operation::FbaDistribute { .. } => Ok(None),
        }
    }
}

/// Run one maintenance call against the store's own head block.
pub fn run_maintenance(
    store: &MemoryStore,
    evaluator: &TestEvaluator,
) -> Result<VoteBuffers, MaintenanceError> {
    let dpo = store.dynamic_properties().unwrap();
    let block = MaintenanceBlock {
        timestamp: dpo.head_block_time,
        block_num: dpo.head_block_num,
    };
    let mut buffers = VoteBuffers::new();
    perform_chain_maintenance(store, evaluator, &mut buffers, &block)?;
    Ok(buffers)
}

/// Every operation currently in the applied history.
pub fn history_ops(store: &MemoryStore) -> Vec<Operation> {
    store
        .operations_before(Timestamp::MAX)
        .unwrap()
        .into_iter()
        .map(|id| store.operation(id).unwrap().op)
        .collect()
}
