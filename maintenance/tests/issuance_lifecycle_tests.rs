//! End-to-end scenarios for daily issuance, funds, cheques, membership
//! upgrades, pruning, and whole-run determinism.

mod support;

use meridian_maintenance::pruning::clear_old_entities;
use meridian_store::operations::AssetAmount;
use meridian_store::{
    AccountStore, Asset, AssetParams, AssetStore, BalanceStore, Cheque, ChequeStatus,
    ChequeStore, Fund, FundDeposit, FundStore, GlobalStore, HistoryStore, Operation,
};
use meridian_store_memory::MemoryStore;
use meridian_types::{AccountId, Amount, AssetId, ChequeId, FundDepositId, FundId, Timestamp};
use support::{account, base_store, history_ops, run_maintenance, TestEvaluator, DAY};

fn now() -> Timestamp {
    Timestamp::new(1_000 * DAY)
}

fn bonus_asset(store: &MemoryStore, maturing: bool) -> Asset {
    store.put_account(&account(21, "issuer")).unwrap();
    let asset = Asset {
        id: AssetId::new(10),
        symbol: "MRD".into(),
        precision: 3,
        issuer: AccountId::new(21),
        max_supply: Amount::new(1_000_000_000),
        params: AssetParams {
            daily_bonus: true,
            bonus_percent: 100, // 1%
            maturing_bonus_balance: maturing,
        },
        buyback_account: None,
    };
    store.put_asset(&asset).unwrap();
    asset
}

#[test]
fn maturing_bonus_defers_instead_of_issuing() {
    let store = base_store(now());
    bonus_asset(&store, true);
    store.put_account(&account(30, "holder")).unwrap();
    store.set_balance(AccountId::new(30), AssetId::new(10), Amount::new(10_000));

    run_maintenance(&store, &TestEvaluator::default()).unwrap();

    // no issuance op, the credit sits in the deferred balance
    assert!(history_ops(&store)
        .iter()
        .all(|op| !matches!(op, Operation::DailyIssue { .. })));
    let bb = store.bonus_balance(AccountId::new(30)).unwrap().unwrap();
    assert_eq!(bb.entries.len(), 1);
    assert_eq!(
        bb.entries[0].balances[&AssetId::new(10)],
        Amount::new(100)
    );
    assert_eq!(
        store.balance(AccountId::new(30), AssetId::new(10)).unwrap(),
        Amount::new(10_000)
    );
}

#[test]
fn deferred_bonus_materializes_next_day() {
    let store = base_store(now());
    bonus_asset(&store, true);
    store.put_account(&account(30, "holder")).unwrap();
    store.set_balance(AccountId::new(30), AssetId::new(10), Amount::new(10_000));

    run_maintenance(&store, &TestEvaluator::default()).unwrap();

    // advance one interval and run again
    let mut dpo = store.dynamic_properties().unwrap();
    dpo.head_block_time = now().saturating_add_secs(DAY);
    dpo.head_block_num += 17_280;
    store.put_dynamic_properties(&dpo).unwrap();
    run_maintenance(&store, &TestEvaluator::default()).unwrap();

    // yesterday's 100 landed; today's credit was computed before the
    // materialization, so it is still 1% of 10_000
    let balance = store.balance(AccountId::new(30), AssetId::new(10)).unwrap();
    assert_eq!(balance, Amount::new(10_100));
    let bb = store.bonus_balance(AccountId::new(30)).unwrap().unwrap();
    assert_eq!(bb.entries.len(), 1);
    assert_eq!(
        bb.entries[0].balances[&AssetId::new(10)],
        Amount::new(100)
    );
}

#[test]
fn direct_bonus_issues_and_respects_blacklists() {
    let store = base_store(now());
    let asset = bonus_asset(&store, false);
    store.put_account(&account(30, "holder")).unwrap();
    store.set_balance(AccountId::new(30), asset.id, Amount::new(10_000));

    // a blacklisted holder earns nothing
    store.put_account(&account(31, "blocked")).unwrap();
    store.set_balance(AccountId::new(31), asset.id, Amount::new(10_000));
    let mut issuer = store.get_account(AccountId::new(21)).unwrap();
    issuer.blacklisted_accounts.insert(AccountId::new(31));
    store.put_account(&issuer).unwrap();

    run_maintenance(&store, &TestEvaluator::default()).unwrap();

    assert_eq!(
        store.balance(AccountId::new(30), asset.id).unwrap(),
        Amount::new(10_100)
    );
    assert_eq!(
        store.balance(AccountId::new(31), asset.id).unwrap(),
        Amount::new(10_000)
    );
    let issues = history_ops(&store)
        .into_iter()
        .filter(|op| matches!(op, Operation::DailyIssue { .. }))
        .count();
    assert_eq!(issues, 1);
}

#[test]
fn rejected_issuance_does_not_abort_maintenance() {
    let store = base_store(now());
    let asset = bonus_asset(&store, false);
    store.put_account(&account(30, "holder")).unwrap();
    store.set_balance(AccountId::new(30), asset.id, Amount::new(10_000));

    let evaluator = TestEvaluator {
        reject_issues: true,
        ..Default::default()
    };
    run_maintenance(&store, &evaluator).unwrap();

    // the rejection was swallowed at the issuance site
    assert_eq!(
        store.balance(AccountId::new(30), asset.id).unwrap(),
        Amount::new(10_000)
    );
    assert!(history_ops(&store)
        .iter()
        .all(|op| !matches!(op, Operation::DailyIssue { .. })));
}

#[test]
fn transitional_regime_pays_on_mature_balance() {
    let store = base_store(now());
    let asset = bonus_asset(&store, false);
    let mut gpo = store.global_properties().unwrap();
    gpo.hardforks.maturing_bonus_time = Timestamp::MAX;
    gpo.hardforks.activity_gated_bonus_time = Timestamp::EPOCH;
    store.put_global_properties(&gpo).unwrap();

    store.put_account(&account(90, "holder")).unwrap();
    store.set_balance(AccountId::new(90), asset.id, Amount::new(200_000));

    run_maintenance(&store, &TestEvaluator::default()).unwrap();

    // flat 0.65% of the eligible balance
    assert_eq!(
        store.balance(AccountId::new(90), asset.id).unwrap(),
        Amount::new(200_000 + 1_300)
    );
}

#[test]
fn legacy_regime_requires_recent_transfer_activity() {
    let store = base_store(now());
    let asset = bonus_asset(&store, false);
    let mut gpo = store.global_properties().unwrap();
    gpo.hardforks.maturing_bonus_time = Timestamp::MAX;
    gpo.hardforks.activity_gated_bonus_time = Timestamp::MAX;
    gpo.hardforks.bonus_start_time = Timestamp::EPOCH;
    store.put_global_properties(&gpo).unwrap();

    store.put_account(&account(60, "active-sender")).unwrap();
    store.put_account(&account(61, "idle-holder")).unwrap();
    store.set_balance(AccountId::new(60), asset.id, Amount::new(100_000));
    store.set_balance(AccountId::new(61), asset.id, Amount::new(100_000));

    // one whole unit moved within the last day qualifies the sender
    let evaluator = TestEvaluator::default();
    meridian_maintenance::OperationEvaluator::apply_operation(
        &evaluator,
        &store,
        Operation::Transfer {
            from: AccountId::new(60),
            to: AccountId::new(61),
            amount: AssetAmount::new(asset.id, Amount::new(1_500)),
        },
    )
    .unwrap();

    run_maintenance(&store, &evaluator).unwrap();

    // 0.65% of 98_500, floored
    assert_eq!(
        store.balance(AccountId::new(60), asset.id).unwrap(),
        Amount::new(98_500 + 640)
    );
    // the idle holder received a transfer but never sent one
    assert_eq!(
        store.balance(AccountId::new(61), asset.id).unwrap(),
        Amount::new(101_500)
    );
}

#[test]
fn funds_pay_daily_interest_and_settle_expired_deposits() {
    let store = base_store(now());
    store.put_account(&account(80, "fund-owner")).unwrap();
    store.put_account(&account(81, "depositor")).unwrap();
    let mut no_renewal = account(82, "no-renewal");
    no_renewal.deposits_autorenewal_enabled = false;
    store.put_account(&no_renewal).unwrap();

    store
        .put_fund(&Fund {
            id: FundId::new(1),
            owner: AccountId::new(80),
            asset: AssetId::CORE,
            balance: Amount::new(100_000),
            enabled: true,
            datetime_end: now().saturating_add_secs(10 * DAY),
            payment_rates: vec![meridian_store::PaymentRate {
                period_days: 30,
                percent: 1_000,
            }],
        })
        .unwrap();
    store
        .put_fund_deposit(&FundDeposit {
            id: FundDepositId::new(1),
            fund: FundId::new(1),
            owner: AccountId::new(81),
            amount: Amount::new(30_000),
            percent: 1_000, // 10% over the period
            period_days: 30,
            enabled: true,
            datetime_end: now().saturating_add_secs(20 * DAY),
        })
        .unwrap();
    store
        .put_fund_deposit(&FundDeposit {
            id: FundDepositId::new(2),
            fund: FundId::new(1),
            owner: AccountId::new(82),
            amount: Amount::new(5_000),
            percent: 1_000,
            period_days: 30,
            enabled: true,
            datetime_end: now().saturating_sub_secs(1),
        })
        .unwrap();

    run_maintenance(&store, &TestEvaluator::default()).unwrap();

    // 30_000 * 10% / 30 days = 100 per day
    assert_eq!(
        store.balance(AccountId::new(81), AssetId::CORE).unwrap(),
        Amount::new(100)
    );
    // the expired deposit of the no-renewal account paid out its principal
    assert_eq!(
        store.balance(AccountId::new(82), AssetId::CORE).unwrap(),
        Amount::new(5_000)
    );
    let deposits = store.deposits_of_fund(FundId::new(1)).unwrap();
    let settled = deposits.iter().find(|d| d.id == FundDepositId::new(2)).unwrap();
    assert!(!settled.enabled);
    assert_eq!(
        store.get_fund(FundId::new(1)).unwrap().balance,
        Amount::new(95_000)
    );
}

#[test]
fn expired_cheques_reverse_to_the_drawer() {
    let store = base_store(now());
    store.put_account(&account(40, "drawer")).unwrap();
    store
        .put_cheque(&Cheque {
            id: ChequeId::new(1),
            drawer: AccountId::new(40),
            asset: AssetId::CORE,
            amount_remaining: Amount::new(900),
            datetime_creation: now().saturating_sub_secs(5 * DAY),
            datetime_expiration: now().saturating_sub_secs(100),
            status: ChequeStatus::New,
        })
        .unwrap();
    store
        .put_cheque(&Cheque {
            id: ChequeId::new(2),
            drawer: AccountId::new(40),
            asset: AssetId::CORE,
            amount_remaining: Amount::new(500),
            datetime_creation: now().saturating_sub_secs(5 * DAY),
            datetime_expiration: now().saturating_add_secs(50),
            status: ChequeStatus::New,
        })
        .unwrap();

    run_maintenance(&store, &TestEvaluator::default()).unwrap();

    assert_eq!(
        store.get_cheque(ChequeId::new(1)).unwrap().status,
        ChequeStatus::Reversed
    );
    assert_eq!(
        store.get_cheque(ChequeId::new(2)).unwrap().status,
        ChequeStatus::New
    );
    assert_eq!(
        store.balance(AccountId::new(40), AssetId::CORE).unwrap(),
        Amount::new(900)
    );
}

#[test]
fn crossing_the_sunset_upgrades_annual_members() {
    let store = base_store(now());
    let mut gpo = store.global_properties().unwrap();
    gpo.hardforks.lifetime_upgrade_time = now().saturating_add_secs(DAY / 2);
    store.put_global_properties(&gpo).unwrap();

    let mut annual = account(70, "annual");
    annual.membership_expiration_date = now().saturating_add_secs(10 * DAY);
    store.put_account(&annual).unwrap();

    run_maintenance(&store, &TestEvaluator::default()).unwrap();

    let upgraded = store.get_account(AccountId::new(70)).unwrap();
    assert!(upgraded.is_lifetime_member());
    assert!(history_ops(&store)
        .iter()
        .any(|op| matches!(op, Operation::AccountUpgrade { .. })));
}

#[test]
fn pruning_removes_exactly_the_old_entries_once() {
    let store = base_store(now());
    let cutoff_age = 31 * DAY;
    store
        .push_applied_operation(
            Operation::AccountUpgrade {
                account_to_upgrade: AccountId::new(3),
                upgrade_to_lifetime_member: true,
            },
            now().saturating_sub_secs(cutoff_age),
            1,
        )
        .unwrap();
    store
        .push_applied_operation(
            Operation::AccountUpgrade {
                account_to_upgrade: AccountId::new(3),
                upgrade_to_lifetime_member: true,
            },
            now().saturating_sub_secs(DAY),
            2,
        )
        .unwrap();

    let gpo = store.global_properties().unwrap();
    clear_old_entities(&store, now(), &gpo).unwrap();
    assert_eq!(history_ops(&store).len(), 1);

    // idempotent: a second pass with the same retention removes nothing
    clear_old_entities(&store, now(), &gpo).unwrap();
    assert_eq!(history_ops(&store).len(), 1);
}

#[test]
fn two_runs_on_the_same_input_are_identical() {
    let build = || {
        let store = base_store(now());
        let asset = bonus_asset(&store, false);
        store.put_account(&account(30, "holder")).unwrap();
        store.set_balance(AccountId::new(30), asset.id, Amount::new(10_000));
        store.set_balance(AccountId::new(30), AssetId::CORE, Amount::new(777));
        for (wid, aid) in [(1u64, 10u64), (2, 11)] {
            store.put_account(&account(aid, &format!("w{wid}"))).unwrap();
            support::add_witness(&store, wid, AccountId::new(aid));
        }
        store
    };

    let a = build();
    let b = build();
    run_maintenance(&a, &TestEvaluator::default()).unwrap();
    run_maintenance(&b, &TestEvaluator::default()).unwrap();

    assert_eq!(history_ops(&a), history_ops(&b));
    assert_eq!(
        a.global_properties().unwrap(),
        b.global_properties().unwrap()
    );
    assert_eq!(
        a.dynamic_properties().unwrap(),
        b.dynamic_properties().unwrap()
    );
    assert_eq!(a.accounts_by_id().unwrap(), b.accounts_by_id().unwrap());
    assert_eq!(
        a.asset_dynamic_data(AssetId::CORE).unwrap(),
        b.asset_dynamic_data(AssetId::CORE).unwrap()
    );
}

#[test]
fn maintenance_time_never_decreases() {
    let store = base_store(now());
    run_maintenance(&store, &TestEvaluator::default()).unwrap();
    let first = store.dynamic_properties().unwrap().next_maintenance_time;

    let mut dpo = store.dynamic_properties().unwrap();
    dpo.head_block_time = first;
    store.put_dynamic_properties(&dpo).unwrap();
    run_maintenance(&store, &TestEvaluator::default()).unwrap();
    let second = store.dynamic_properties().unwrap().next_maintenance_time;

    assert!(second > first);
}
