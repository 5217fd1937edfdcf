use sea_orm::{Database, DatabaseConnection};

use engine::{Caller, Engine, EngineError, Opened, WalletPolicy};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .policy(WalletPolicy::default())
        .build()
        .await
        .unwrap();
    (engine, db)
}

#[tokio::test]
async fn create_if_absent_is_idempotent() {
    let (engine, _db) = engine_with_db().await;

    let first = engine
        .create_if_absent("alice@example.com", 40.0, true)
        .await
        .unwrap();
    assert!(first.is_created());

    let second = engine
        .create_if_absent("alice@example.com", 999.0, false)
        .await
        .unwrap();
    assert_eq!(second, Opened::Existing(first.wallet().clone()));

    let wallets = engine.wallets().await.unwrap();
    assert_eq!(wallets.len(), 1);
    assert_eq!(wallets[0].balance, 40.0);
    assert!(wallets[0].enabled);
}

#[tokio::test]
async fn wallet_id_is_stable_across_saves() {
    let (engine, _db) = engine_with_db().await;
    let created = engine
        .create_if_absent("alice@example.com", 0.0, true)
        .await
        .unwrap()
        .into_wallet();

    let updated = engine.deposit("alice@example.com", 10.0).await.unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.account_key, "alice@example.com");
}

#[tokio::test]
async fn subtract_never_goes_negative() {
    let (engine, _db) = engine_with_db().await;
    engine
        .create_if_absent("alice@example.com", 100.0, true)
        .await
        .unwrap();

    for (amount, expected) in [(30.0, 70.0), (70.0, 0.0), (10.0, 0.0)] {
        let wallet = engine.subtract("alice@example.com", amount).await.unwrap();
        assert_eq!(wallet.balance, expected);
    }
}

#[tokio::test]
async fn balance_operations() {
    let (engine, _db) = engine_with_db().await;
    engine
        .create_if_absent("alice@example.com", 10.0, true)
        .await
        .unwrap();

    assert_eq!(
        engine.deposit("alice@example.com", 5.5).await.unwrap().balance,
        15.5
    );
    assert_eq!(
        engine
            .refill_to_default("alice@example.com", 100.0)
            .await
            .unwrap()
            .balance,
        100.0
    );
    assert_eq!(
        engine
            .set_balance("alice@example.com", 42.0)
            .await
            .unwrap()
            .balance,
        42.0
    );
    assert_eq!(
        engine
            .set_balance("alice@example.com", -3.0)
            .await
            .unwrap()
            .balance,
        0.0
    );
    engine.deposit("alice@example.com", 8.0).await.unwrap();
    assert_eq!(engine.reset("alice@example.com").await.unwrap().balance, 0.0);

    let disabled = engine
        .set_enabled("alice@example.com", false)
        .await
        .unwrap();
    assert!(!disabled.enabled);
    assert!(!engine.wallet("alice@example.com").await.unwrap().enabled);
}

#[tokio::test]
async fn mutations_of_missing_wallet_fail() {
    let (engine, _db) = engine_with_db().await;
    let missing = EngineError::KeyNotFound("ghost@example.com".to_string());

    assert_eq!(
        engine.deposit("ghost@example.com", 1.0).await.unwrap_err(),
        missing
    );
    assert_eq!(
        engine.subtract("ghost@example.com", 1.0).await.unwrap_err(),
        missing
    );
    assert_eq!(
        engine
            .refill_to_default("ghost@example.com", 1.0)
            .await
            .unwrap_err(),
        missing
    );
    assert_eq!(
        engine
            .set_enabled("ghost@example.com", true)
            .await
            .unwrap_err(),
        missing
    );
    assert_eq!(
        engine
            .set_balance("ghost@example.com", 1.0)
            .await
            .unwrap_err(),
        missing
    );
    assert_eq!(engine.reset("ghost@example.com").await.unwrap_err(), missing);
    assert_eq!(engine.wallet("ghost@example.com").await.unwrap_err(), missing);
    assert!(engine.wallets().await.unwrap().is_empty());
}

#[tokio::test]
async fn negative_amounts_are_rejected() {
    let (engine, _db) = engine_with_db().await;
    engine
        .create_if_absent("alice@example.com", 10.0, true)
        .await
        .unwrap();

    assert!(matches!(
        engine.deposit("alice@example.com", -1.0).await,
        Err(EngineError::InvalidAmount(_))
    ));
    assert!(matches!(
        engine.subtract("alice@example.com", f64::NAN).await,
        Err(EngineError::InvalidAmount(_))
    ));
    assert_eq!(engine.wallet("alice@example.com").await.unwrap().balance, 10.0);
}

#[tokio::test]
async fn overflowing_deposit_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    engine
        .create_if_absent("alice@example.com", f64::MAX, true)
        .await
        .unwrap();

    assert!(matches!(
        engine.deposit("alice@example.com", f64::MAX).await,
        Err(EngineError::InvalidAmount(_))
    ));
    assert_eq!(
        engine.wallet("alice@example.com").await.unwrap().balance,
        f64::MAX
    );
}

#[tokio::test]
async fn wallets_are_listed_by_key() {
    let (engine, _db) = engine_with_db().await;
    for key in ["carol@example.com", "alice@example.com", "bob@example.com"] {
        engine.create_if_absent(key, 0.0, true).await.unwrap();
    }

    let keys: Vec<String> = engine
        .wallets()
        .await
        .unwrap()
        .into_iter()
        .map(|w| w.account_key)
        .collect();
    assert_eq!(
        keys,
        vec!["alice@example.com", "bob@example.com", "carol@example.com"]
    );
}

#[tokio::test]
async fn non_admin_cannot_choose_opening_balance() {
    let (engine, _db) = engine_with_db().await;
    let alice = Caller::new("alice@example.com", "utente");
    let admin = Caller::new("root@example.com", "admin");

    let opened = engine
        .open_wallet(&alice, "alice@example.com", 500.0, true)
        .await
        .unwrap();
    assert_eq!(opened.wallet().balance, 0.0);

    let opened = engine
        .open_wallet(&admin, "bob@example.com", 100.0, true)
        .await
        .unwrap();
    assert_eq!(opened.wallet().balance, 100.0);

    assert!(matches!(
        engine
            .open_wallet(&alice, "carol@example.com", 0.0, true)
            .await,
        Err(EngineError::Forbidden(_))
    ));
    assert!(engine.find_wallet("carol@example.com").await.unwrap().is_none());
}
