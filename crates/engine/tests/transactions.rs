use chrono::{TimeZone, Utc};
use engine::{Amount, Engine, EngineError, NewTransaction, NewUser, TimeFrame, User};
use migration::MigratorTrait;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

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

async fn register(engine: &Engine, username: &str) -> User {
    engine
        .setup_new_user(NewUser::new(
            username,
            "hashed-password",
            format!("{username}@example.com"),
        ))
        .await
        .unwrap()
}

async fn transaction_count(db: &DatabaseConnection, user_id: i32) -> i64 {
    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_sql_and_values(
            backend,
            "SELECT COUNT(*) AS cnt FROM bank_transactions WHERE user_id = ?",
            vec![user_id.into()],
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get("", "cnt").unwrap()
}

#[tokio::test]
async fn add_transaction_persists_an_applied_row() {
    let (engine, _db) = engine_with_db().await;
    let user = register(&engine, "alice").await;
    let vault = engine
        .add_cash_counter(user.id, "Vault1", None)
        .await
        .unwrap();

    let recorded = engine
        .add_transaction(user.id, NewTransaction::new(vault.id, Amount::new(42_50)))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(recorded.counter_id, vault.id);
    assert_eq!(recorded.amount, Amount::new(42_50));
    assert!(recorded.applied);

    let vault = engine.cash_counter(user.id, vault.id).await.unwrap();
    assert_eq!(vault.amount, Amount::new(42_50));
    let root = engine.root_counter(user.id).await.unwrap();
    assert_eq!(root.amount, Amount::new(42_50));
}

#[tokio::test]
async fn add_transaction_for_unknown_counter_persists_nothing() {
    let (engine, db) = engine_with_db().await;
    let user = register(&engine, "alice").await;

    let recorded = engine
        .add_transaction(user.id, NewTransaction::new(9999, Amount::new(10_00)))
        .await
        .unwrap();
    assert!(recorded.is_none());
    assert_eq!(transaction_count(&db, user.id).await, 0);

    let root = engine.root_counter(user.id).await.unwrap();
    assert_eq!(root.amount, Amount::ZERO);
}

#[tokio::test]
async fn add_transaction_rejects_a_foreign_bank_alias() {
    let (engine, db) = engine_with_db().await;
    let alice = register(&engine, "alice").await;
    let bob = register(&engine, "bob").await;
    let vault = engine
        .add_cash_counter(alice.id, "Vault1", None)
        .await
        .unwrap();
    let bobs_alias = engine.add_bank_alias(bob.id, "Bob Bank").await.unwrap();

    let err = engine
        .add_transaction(
            alice.id,
            NewTransaction::new(vault.id, Amount::new(10_00)).bank_alias_id(bobs_alias.id),
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::KeyNotFound("bank alias not exists".to_string())
    );
    assert_eq!(transaction_count(&db, alice.id).await, 0);

    let vault = engine.cash_counter(alice.id, vault.id).await.unwrap();
    assert_eq!(vault.amount, Amount::ZERO);
}

#[tokio::test]
async fn bulk_matches_sequential_application() {
    let (engine, _db) = engine_with_db().await;
    let user = register(&engine, "alice").await;
    let sequential = engine
        .add_cash_counter(user.id, "Sequential", None)
        .await
        .unwrap();
    let bulk = engine.add_cash_counter(user.id, "Bulk", None).await.unwrap();

    let amounts = [Amount::new(10_00), Amount::new(-10_00), Amount::new(20_00)];
    for amount in amounts {
        engine
            .add_transaction(user.id, NewTransaction::new(sequential.id, amount))
            .await
            .unwrap()
            .unwrap();
    }
    engine
        .add_bulk_transactions(
            user.id,
            None,
            amounts
                .into_iter()
                .map(|amount| NewTransaction::new(bulk.id, amount))
                .collect(),
        )
        .await
        .unwrap();

    let sequential = engine.cash_counter(user.id, sequential.id).await.unwrap();
    let bulk = engine.cash_counter(user.id, bulk.id).await.unwrap();
    assert_eq!(sequential.amount, Amount::new(20_00));
    assert_eq!(bulk.amount, sequential.amount);

    let root = engine.root_counter(user.id).await.unwrap();
    assert_eq!(root.amount, Amount::new(40_00));
}

#[tokio::test]
async fn bulk_ingestion_sweeps_and_stays_stable() {
    let (engine, _db) = engine_with_db().await;
    let user = register(&engine, "alice").await;
    let vault = engine
        .add_cash_counter(user.id, "Vault1", None)
        .await
        .unwrap();

    let items = (0..10)
        .map(|_| NewTransaction::new(vault.id, Amount::new(10_00)))
        .collect();
    engine
        .add_bulk_transactions(user.id, None, items)
        .await
        .unwrap();

    let vault_read = engine.cash_counter(user.id, vault.id).await.unwrap();
    assert_eq!(vault_read.amount, Amount::new(100_00));
    let root = engine.root_counter(user.id).await.unwrap();
    assert_eq!(root.amount, Amount::new(100_00));

    // Everything was flipped to applied, so another sweep changes nothing.
    engine.sweep_unapplied(user.id, vault.id).await.unwrap();
    let vault_read = engine.cash_counter(user.id, vault.id).await.unwrap();
    assert_eq!(vault_read.amount, Amount::new(100_00));
    let root = engine.root_counter(user.id).await.unwrap();
    assert_eq!(root.amount, Amount::new(100_00));
}

#[tokio::test]
async fn mixed_bulk_batches_update_each_counter_and_the_root() {
    let (engine, _db) = engine_with_db().await;
    let user = register(&engine, "alice").await;
    let vault1 = engine
        .add_cash_counter(user.id, "Vault1", None)
        .await
        .unwrap();
    let vault2 = engine
        .add_cash_counter(user.id, "Vault2", None)
        .await
        .unwrap();

    let mut items = Vec::new();
    for _ in 0..10 {
        items.push(NewTransaction::new(vault1.id, Amount::new(10_00)));
        items.push(NewTransaction::new(vault2.id, Amount::new(10_00)));
    }
    engine
        .add_bulk_transactions(user.id, None, items)
        .await
        .unwrap();

    let vault1 = engine.cash_counter(user.id, vault1.id).await.unwrap();
    let vault2 = engine.cash_counter(user.id, vault2.id).await.unwrap();
    let root = engine.root_counter(user.id).await.unwrap();
    assert_eq!(vault1.amount, Amount::new(100_00));
    assert_eq!(vault2.amount, Amount::new(100_00));
    assert_eq!(root.amount, Amount::new(200_00));
}

#[tokio::test]
async fn empty_bulk_batch_is_rejected_without_side_effects() {
    let (engine, db) = engine_with_db().await;
    let user = register(&engine, "alice").await;

    let err = engine
        .add_bulk_transactions(user.id, None, Vec::new())
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::EmptyBatch);
    assert_eq!(transaction_count(&db, user.id).await, 0);
}

#[tokio::test]
async fn bulk_skips_items_for_unknown_counters() {
    let (engine, db) = engine_with_db().await;
    let alice = register(&engine, "alice").await;
    let bob = register(&engine, "bob").await;
    let vault = engine
        .add_cash_counter(alice.id, "Vault1", None)
        .await
        .unwrap();
    let bobs_vault = engine
        .add_cash_counter(bob.id, "BobVault", None)
        .await
        .unwrap();

    engine
        .add_bulk_transactions(
            alice.id,
            None,
            vec![
                NewTransaction::new(vault.id, Amount::new(30_00)),
                NewTransaction::new(bobs_vault.id, Amount::new(30_00)),
                NewTransaction::new(9999, Amount::new(30_00)),
            ],
        )
        .await
        .unwrap();

    let vault = engine.cash_counter(alice.id, vault.id).await.unwrap();
    assert_eq!(vault.amount, Amount::new(30_00));
    let root = engine.root_counter(alice.id).await.unwrap();
    assert_eq!(root.amount, Amount::new(30_00));
    // Only the owned item produced a row; Bob's state is untouched.
    assert_eq!(transaction_count(&db, alice.id).await, 1);
    let bobs_vault = engine.cash_counter(bob.id, bobs_vault.id).await.unwrap();
    assert_eq!(bobs_vault.amount, Amount::ZERO);
}

#[tokio::test]
async fn list_transactions_filters_by_window_newest_first() {
    let (engine, _db) = engine_with_db().await;
    let user = register(&engine, "alice").await;
    let vault = engine
        .add_cash_counter(user.id, "Vault1", None)
        .await
        .unwrap();

    let january = Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).unwrap();
    let february = Utc.with_ymd_and_hms(2026, 2, 10, 12, 0, 0).unwrap();
    let march = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
    for (stamp, cents) in [(january, 1_00), (february, 2_00), (march, 3_00)] {
        engine
            .add_transaction(
                user.id,
                NewTransaction::new(vault.id, Amount::new(cents)).created_at(stamp),
            )
            .await
            .unwrap()
            .unwrap();
    }

    let frame = TimeFrame::new()
        .from_date(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap())
        .to_date(Utc.with_ymd_and_hms(2026, 2, 28, 0, 0, 0).unwrap());
    let listed = engine.list_transactions(user.id, frame).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].amount, Amount::new(2_00));
    assert_eq!(listed[1].amount, Amount::new(1_00));
}

#[tokio::test]
async fn list_transactions_rejects_an_inverted_window() {
    let (engine, _db) = engine_with_db().await;
    let user = register(&engine, "alice").await;

    let frame = TimeFrame::new()
        .from_date(Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap())
        .to_date(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
    let err = engine.list_transactions(user.id, frame).await.unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidTimeFrame("from_date cannot be after to_date".to_string())
    );
}
