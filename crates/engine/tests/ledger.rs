use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{
    Address, ApplyCmd, Engine, EngineError, MoneyCents, NewBranch, NewCustomer, OpenAccountCmd,
    TransactionAction, TransactionListFilter,
};
use migration::MigratorTrait;
use uuid::Uuid;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

async fn engine_with_file_db() -> (Engine, DatabaseConnection, std::path::PathBuf) {
    let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target/test_dbs");
    std::fs::create_dir_all(&root).unwrap();

    let path = root.join(format!("engine_{}.db", Uuid::new_v4()));
    let url = format!("sqlite:{}?mode=rwc", path.display());

    let db = Database::connect(&url).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();

    (engine, db, path)
}

fn cents(value: &str) -> MoneyCents {
    value.parse().unwrap()
}

async fn new_customer(engine: &Engine, username: &str) -> i32 {
    engine
        .create_customer(NewCustomer {
            name: "Rani Mukherjee".to_string(),
            phone: Some("555-0100".to_string()),
            email: None,
            address: Address::default(),
            username: username.to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap()
        .id
}

async fn new_branch(engine: &Engine) -> i32 {
    engine
        .create_branch(NewBranch {
            name: "Downtown".to_string(),
            address: Address {
                city: Some("Springfield".to_string()),
                ..Address::default()
            },
        })
        .await
        .unwrap()
        .id
}

/// One customer, one branch and an account seeded with `opening`.
async fn setup(engine: &Engine, opening: &str) -> (i32, i32, i32) {
    let customer_id = new_customer(engine, "rani").await;
    let branch_id = new_branch(engine).await;
    let account = engine
        .open_account(OpenAccountCmd::new(customer_id, cents(opening)))
        .await
        .unwrap();
    (customer_id, branch_id, account.id)
}

async fn transaction_count(db: &DatabaseConnection) -> i64 {
    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_string(
            backend,
            "SELECT COUNT(*) AS n FROM transactions",
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get("", "n").unwrap()
}

#[tokio::test]
async fn deposit_increases_balance_and_records_row() {
    let (engine, db) = engine_with_db().await;
    let (_, branch_id, account_id) = setup(&engine, "100.00").await;

    let applied = engine
        .apply(ApplyCmd::deposit(account_id, branch_id, cents("50.00")))
        .await
        .unwrap();

    assert_eq!(applied.current_balance, cents("150.00"));
    assert_eq!(applied.transaction.action, TransactionAction::Deposit);
    assert_eq!(applied.transaction.amount, cents("50.00"));
    assert_eq!(applied.transaction.account_id, account_id);
    assert_eq!(applied.transaction.branch_id, branch_id);
    assert_eq!(transaction_count(&db).await, 1);

    let account = engine.account(account_id).await.unwrap();
    assert_eq!(account.current_balance, cents("150.00"));
}

#[tokio::test]
async fn overdraft_is_rejected_without_side_effects() {
    let (engine, db) = engine_with_db().await;
    let (_, branch_id, account_id) = setup(&engine, "150.00").await;

    let err = engine
        .apply(ApplyCmd::withdraw(account_id, branch_id, cents("200.00")))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InsufficientFunds(_)));

    let account = engine.account(account_id).await.unwrap();
    assert_eq!(account.current_balance, cents("150.00"));
    assert_eq!(transaction_count(&db).await, 0);

    // Withdrawing the whole balance is allowed.
    let applied = engine
        .apply(ApplyCmd::withdraw(account_id, branch_id, cents("150.00")))
        .await
        .unwrap();
    assert_eq!(applied.current_balance, MoneyCents::ZERO);
}

#[tokio::test]
async fn deposit_past_balance_limit_is_rejected_without_side_effects() {
    let (engine, db) = engine_with_db().await;
    let (_, branch_id, account_id) = setup(&engine, "1.00").await;

    let err = engine
        .apply(ApplyCmd::deposit(
            account_id,
            branch_id,
            MoneyCents::new(i64::MAX),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let account = engine.account(account_id).await.unwrap();
    assert_eq!(account.current_balance, cents("1.00"));
    assert_eq!(transaction_count(&db).await, 0);
    assert!(engine.reconcile_account(account_id).await.unwrap().consistent);

    // Filling the account up to the limit exactly is still allowed.
    let applied = engine
        .apply(ApplyCmd::deposit(
            account_id,
            branch_id,
            MoneyCents::new(i64::MAX - 100),
        ))
        .await
        .unwrap();
    assert_eq!(applied.current_balance, MoneyCents::new(i64::MAX));
}

#[test]
fn unsupported_action_is_rejected() {
    let err = TransactionAction::try_from("Transfer").unwrap_err();
    assert!(matches!(err, EngineError::InvalidAction(_)));
    assert!(TransactionAction::try_from("deposit").is_err());
}

#[tokio::test]
async fn amount_must_be_positive() {
    let (engine, db) = engine_with_db().await;
    let (_, branch_id, account_id) = setup(&engine, "10.00").await;

    for amount in [MoneyCents::ZERO, cents("-5.00")] {
        let err = engine
            .apply(ApplyCmd::deposit(account_id, branch_id, amount))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));
    }
    assert_eq!(transaction_count(&db).await, 0);

    let applied = engine
        .apply(ApplyCmd::deposit(account_id, branch_id, cents("0.01")))
        .await
        .unwrap();
    assert_eq!(applied.current_balance, cents("10.01"));
}

#[tokio::test]
async fn unknown_references_leave_balance_untouched() {
    let (engine, db) = engine_with_db().await;
    let (_, branch_id, account_id) = setup(&engine, "100.00").await;

    let err = engine
        .apply(ApplyCmd::deposit(account_id + 100, branch_id, cents("1.00")))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("account not exists".to_string()));

    // The balance update runs before the branch lookup: it must be rolled back.
    let err = engine
        .apply(ApplyCmd::deposit(account_id, branch_id + 100, cents("1.00")))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("branch not exists".to_string()));

    let account = engine.account(account_id).await.unwrap();
    assert_eq!(account.current_balance, cents("100.00"));
    assert_eq!(transaction_count(&db).await, 0);
}

#[tokio::test]
async fn balance_matches_ledger_after_mixed_operations() {
    let (engine, _db) = engine_with_db().await;
    let (_, branch_id, account_id) = setup(&engine, "20.00").await;

    let ops = [
        ApplyCmd::deposit(account_id, branch_id, cents("100.00")),
        ApplyCmd::withdraw(account_id, branch_id, cents("30.50")),
        ApplyCmd::deposit(account_id, branch_id, cents("0.75")),
        ApplyCmd::withdraw(account_id, branch_id, cents("500.00")),
        ApplyCmd::withdraw(account_id, branch_id, cents("90.25")),
    ];
    for cmd in ops {
        let _ = engine.apply(cmd).await;
    }

    let reconciliation = engine.reconcile_account(account_id).await.unwrap();
    assert!(reconciliation.consistent);
    assert_eq!(reconciliation.transactions, 4);
    assert_eq!(reconciliation.opening_balance, cents("20.00"));
    assert_eq!(reconciliation.ledger_sum, cents("-20.00"));
    assert_eq!(reconciliation.current_balance, MoneyCents::ZERO);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_deposits_are_not_lost() {
    let (engine, db, path) = engine_with_file_db().await;
    let (_, branch_id, account_id) = setup(&engine, "0.00").await;

    let mut handles = Vec::new();
    for _ in 0..20 {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            engine
                .apply(ApplyCmd::deposit(account_id, branch_id, cents("1.00")))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let account = engine.account(account_id).await.unwrap();
    assert_eq!(account.current_balance, cents("20.00"));
    assert_eq!(transaction_count(&db).await, 20);
    assert!(engine.reconcile_account(account_id).await.unwrap().consistent);

    drop(engine);
    db.close().await.unwrap();
    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn customer_transactions_span_accounts_newest_first() {
    let (engine, _db) = engine_with_db().await;
    let (customer_id, branch_id, first) = setup(&engine, "10.00").await;
    let second = engine
        .open_account(OpenAccountCmd::new(customer_id, MoneyCents::ZERO))
        .await
        .unwrap()
        .id;

    let older = engine
        .apply(ApplyCmd::deposit(first, branch_id, cents("1.00")))
        .await
        .unwrap();
    let newer = engine
        .apply(ApplyCmd::deposit(second, branch_id, cents("2.00")).processed_by("teller1"))
        .await
        .unwrap();

    let txs = engine
        .list_transactions_for_customer(customer_id)
        .await
        .unwrap();
    assert_eq!(txs.len(), 2);
    assert_eq!(txs[0].id, newer.transaction.id);
    assert_eq!(txs[1].id, older.transaction.id);
    assert_eq!(txs[0].processed_by.as_deref(), Some("teller1"));

    let other = new_customer(&engine, "someone").await;
    assert!(engine.list_transactions_for_customer(other).await.unwrap().is_empty());
    assert!(engine.list_transactions_for_customer(9999).await.unwrap().is_empty());
}

#[tokio::test]
async fn account_transactions_paginate_with_cursor() {
    let (engine, _db) = engine_with_db().await;
    let (_, branch_id, account_id) = setup(&engine, "100.00").await;

    let mut ids = Vec::new();
    for i in 1..=5 {
        let cmd = if i % 2 == 0 {
            ApplyCmd::withdraw(account_id, branch_id, cents("1.00"))
        } else {
            ApplyCmd::deposit(account_id, branch_id, cents("2.00"))
        };
        ids.push(engine.apply(cmd).await.unwrap().transaction.id);
    }
    ids.reverse();

    let filter = TransactionListFilter::default();
    let (page, cursor) = engine
        .list_transactions_for_account_page(account_id, 2, None, &filter)
        .await
        .unwrap();
    assert_eq!(page.iter().map(|t| t.id).collect::<Vec<_>>(), ids[..2]);
    let cursor = cursor.unwrap();

    let (page, cursor) = engine
        .list_transactions_for_account_page(account_id, 2, Some(&cursor), &filter)
        .await
        .unwrap();
    assert_eq!(page.iter().map(|t| t.id).collect::<Vec<_>>(), ids[2..4]);

    let (page, cursor) = engine
        .list_transactions_for_account_page(account_id, 2, cursor.as_deref(), &filter)
        .await
        .unwrap();
    assert_eq!(page.iter().map(|t| t.id).collect::<Vec<_>>(), ids[4..]);
    assert!(cursor.is_none());

    let withdrawals = TransactionListFilter {
        action: Some(TransactionAction::Withdraw),
        ..TransactionListFilter::default()
    };
    let (page, _) = engine
        .list_transactions_for_account_page(account_id, 10, None, &withdrawals)
        .await
        .unwrap();
    assert_eq!(page.len(), 2);
    assert!(page.iter().all(|t| t.action == TransactionAction::Withdraw));
}

#[tokio::test]
async fn account_transactions_reject_bad_input() {
    let (engine, _db) = engine_with_db().await;
    let (_, _, account_id) = setup(&engine, "0.00").await;
    let filter = TransactionListFilter::default();

    let err = engine
        .list_transactions_for_account_page(account_id, 10, Some("not-a-cursor"), &filter)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidCursor(_)));

    let err = engine
        .list_transactions_for_account_page(account_id, 0, None, &filter)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidField(_)));

    let err = engine
        .list_transactions_for_account_page(account_id + 1, 10, None, &filter)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn reconcile_detects_tampered_balance() {
    let (engine, db) = engine_with_db().await;
    let (_, branch_id, account_id) = setup(&engine, "5.00").await;
    engine
        .apply(ApplyCmd::deposit(account_id, branch_id, cents("5.00")))
        .await
        .unwrap();

    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "UPDATE accounts SET current_balance = current_balance + 1 WHERE account_id = ?",
        vec![account_id.into()],
    ))
    .await
    .unwrap();

    let reconciliation = engine.reconcile_account(account_id).await.unwrap();
    assert!(!reconciliation.consistent);
    assert_eq!(reconciliation.current_balance, cents("10.01"));
    assert_eq!(reconciliation.ledger_sum, cents("5.00"));
}
