use std::{
    collections::HashMap,
    io,
    sync::Mutex,
};

use chrono::{TimeZone, Utc};
use engine::{
    Amount, AssetStore, BlobStore, DEFAULT_CATEGORIES, Engine, EngineError, NewReceipt, NewUser,
    TimeFrame, User,
};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

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

/// In-memory blob storage standing in for the media directory.
#[derive(Default)]
struct MemBlobs(Mutex<HashMap<String, Vec<u8>>>);

impl BlobStore for MemBlobs {
    fn put(&self, reference: &str, bytes: &[u8]) -> io::Result<()> {
        self.0
            .lock()
            .unwrap()
            .insert(reference.to_string(), bytes.to_vec());
        Ok(())
    }
}

/// Asset source returning deterministic bytes per reference.
struct MemAssets;

impl AssetStore for MemAssets {
    fn load(&self, reference: &str) -> io::Result<Vec<u8>> {
        Ok(format!("asset:{reference}").into_bytes())
    }
}

#[tokio::test]
async fn new_counters_hang_off_the_root() {
    let (engine, _db) = engine_with_db().await;
    let user = register(&engine, "alice").await;
    let root = engine.root_counter(user.id).await.unwrap();

    let vault = engine
        .add_cash_counter(user.id, "Vacation Fund", None)
        .await
        .unwrap();
    assert_eq!(vault.parent_id, Some(root.id));
    assert_eq!(vault.amount, Amount::ZERO);
    assert_eq!(vault.slug, "vacation-fund");
    assert!(!vault.is_root());
}

#[tokio::test]
async fn counter_creation_rejects_a_foreign_alias() {
    let (engine, _db) = engine_with_db().await;
    let alice = register(&engine, "alice").await;
    let bob = register(&engine, "bob").await;
    let bobs_alias = engine.add_bank_alias(bob.id, "Bob Bank").await.unwrap();

    let err = engine
        .add_cash_counter(alice.id, "Vault1", Some(bobs_alias.id))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::KeyNotFound("bank alias not exists".to_string())
    );
}

#[tokio::test]
async fn bank_aliases_are_get_or_create() {
    let (engine, _db) = engine_with_db().await;
    let user = register(&engine, "alice").await;

    let first = engine.add_bank_alias(user.id, "Main Bank").await.unwrap();
    let second = engine.add_bank_alias(user.id, "Main Bank").await.unwrap();
    assert_eq!(first.id, second.id);

    engine.add_bank_alias(user.id, "Another Bank").await.unwrap();
    let listed = engine.list_bank_aliases(user.id).await.unwrap();
    let names: Vec<&str> = listed.iter().map(|alias| alias.name.as_str()).collect();
    assert_eq!(names, ["Another Bank", "Main Bank"]);
}

#[tokio::test]
async fn counters_list_by_exact_alias_match() {
    let (engine, _db) = engine_with_db().await;
    let user = register(&engine, "alice").await;
    let alias = engine.add_bank_alias(user.id, "Main Bank").await.unwrap();
    let tagged = engine
        .add_cash_counter(user.id, "Tagged", Some(alias.id))
        .await
        .unwrap();
    let untagged = engine
        .add_cash_counter(user.id, "Untagged", None)
        .await
        .unwrap();

    let with_alias = engine
        .list_cash_counters(user.id, Some(alias.id))
        .await
        .unwrap();
    assert_eq!(with_alias.len(), 1);
    assert_eq!(with_alias[0].id, tagged.id);

    // `None` matches alias-less counters, the root among them.
    let without_alias = engine.list_cash_counters(user.id, None).await.unwrap();
    let ids: Vec<i32> = without_alias.iter().map(|counter| counter.id).collect();
    assert!(ids.contains(&untagged.id));
    assert!(without_alias.iter().any(|counter| counter.is_root()));
    assert!(!ids.contains(&tagged.id));
}

#[tokio::test]
async fn default_categories_seed_once_per_user() {
    let (engine, _db) = engine_with_db().await;
    let user = register(&engine, "alice").await;
    let blobs = MemBlobs::default();

    let seeded = engine
        .setup_default_categories(user.id, &MemAssets, &blobs)
        .await
        .unwrap();
    assert_eq!(seeded.len(), DEFAULT_CATEGORIES.len());
    for category in &seeded {
        let icon = category.icon.as_deref().unwrap();
        assert!(icon.starts_with(&format!("{}/", user.id)));
        assert!(blobs.0.lock().unwrap().contains_key(icon));
    }

    // Re-running the setup must not duplicate anything.
    let again = engine
        .setup_default_categories(user.id, &MemAssets, &blobs)
        .await
        .unwrap();
    assert_eq!(again.len(), seeded.len());
    let listed = engine.list_transaction_categories(user.id).await.unwrap();
    assert_eq!(listed.len(), DEFAULT_CATEGORIES.len());
}

#[tokio::test]
async fn custom_categories_are_listed_alongside_seeded_ones() {
    let (engine, _db) = engine_with_db().await;
    let user = register(&engine, "alice").await;

    let custom = engine
        .add_transaction_category(user.id, "Subscriptions")
        .await
        .unwrap();
    assert!(custom.icon.is_none());

    let listed = engine.list_transaction_categories(user.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "Subscriptions");
}

#[tokio::test]
async fn receipts_are_stored_under_the_owner_prefix() {
    let (engine, _db) = engine_with_db().await;
    let user = register(&engine, "alice").await;
    let blobs = MemBlobs::default();

    let receipt = engine
        .add_receipt(
            user.id,
            NewReceipt::new("lunch.jpg", b"jpeg-bytes".to_vec()),
            &blobs,
        )
        .await
        .unwrap();
    assert_eq!(receipt.image, format!("{}/lunch.jpg", user.id));
    assert_eq!(
        blobs.0.lock().unwrap().get(&receipt.image).unwrap(),
        b"jpeg-bytes"
    );
}

#[tokio::test]
async fn receipts_list_by_window_newest_first() {
    let (engine, _db) = engine_with_db().await;
    let user = register(&engine, "alice").await;
    let blobs = MemBlobs::default();

    let stamps = [
        Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2026, 2, 5, 9, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2026, 3, 5, 9, 0, 0).unwrap(),
    ];
    for (index, stamp) in stamps.iter().enumerate() {
        engine
            .add_receipt(
                user.id,
                NewReceipt::new(format!("receipt-{index}.jpg"), vec![index as u8])
                    .created_at(*stamp),
                &blobs,
            )
            .await
            .unwrap();
    }

    let frame = TimeFrame::new()
        .from_date(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap())
        .to_date(Utc.with_ymd_and_hms(2026, 2, 28, 0, 0, 0).unwrap());
    let listed = engine.list_receipts(user.id, frame).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].image, format!("{}/receipt-1.jpg", user.id));
    assert_eq!(listed[1].image, format!("{}/receipt-0.jpg", user.id));
}

#[tokio::test]
async fn users_resolve_by_username() {
    let (engine, _db) = engine_with_db().await;
    let user = register(&engine, "alice").await;

    let found = engine.user_by_username("alice").await.unwrap();
    assert_eq!(found.id, user.id);
    assert_eq!(found.email, "alice@example.com");

    let err = engine.user_by_username("nobody").await.unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("user not exists".to_string()));
}
