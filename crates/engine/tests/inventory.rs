use std::{sync::Arc, time::Duration};

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{
    Engine, EngineError, NewProduct, SetInventoryCmd, Stock, TransferCmd, WasteCmd,
    WasteLogFilter,
};
use migration::MigratorTrait;

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

async fn seed_product(engine: &Engine, id: &str, inventory_a: f64, inventory_b: f64) {
    engine
        .create_product(
            NewProduct::new(id, "Espresso beans", "Coffee").stock(inventory_a, inventory_b),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn transfer_waste_and_rejected_waste() {
    let (engine, _db) = engine_with_db().await;
    seed_product(&engine, "p1", 100.0, 0.0).await;

    let stock = engine.transfer(TransferCmd::new("p1", 40.0)).await.unwrap();
    assert_eq!(
        stock,
        Stock {
            inventory_a: 60.0,
            inventory_b: 40.0
        }
    );

    let b = engine
        .waste_deduct(WasteCmd::new("p1", 10.0).reason("spill"))
        .await
        .unwrap();
    assert_eq!(b, 30.0);

    let logs = engine.waste_logs(&WasteLogFilter::default()).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].reason.as_deref(), Some("spill"));
    assert_eq!(logs[0].quantity, 10.0);
    assert_eq!(logs[0].product_name, "Espresso beans");
    assert_eq!(logs[0].category, "Coffee");
    assert_eq!(logs[0].recorded_by, "system");

    let err = engine
        .waste_deduct(WasteCmd::new("p1", 31.0).reason("spill"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InsufficientStock("Inventory B. Available: 30, Requested: 31".to_string())
    );

    let product = engine.product("p1").await.unwrap();
    assert_eq!(product.inventory_a, 60.0);
    assert_eq!(product.inventory_b, 30.0);
    assert_eq!(product.quantity, 30.0);
    let logs = engine.waste_logs(&WasteLogFilter::default()).await.unwrap();
    assert_eq!(logs.len(), 1);
}

#[tokio::test]
async fn transfer_more_than_available_changes_nothing() {
    let (engine, _db) = engine_with_db().await;
    seed_product(&engine, "p1", 40.0, 5.0).await;

    let err = engine
        .transfer(TransferCmd::new("p1", 50.0))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InsufficientStock("Inventory A. Available: 40, Requested: 50".to_string())
    );

    let product = engine.product("p1").await.unwrap();
    assert_eq!(product.stock(), Stock {
        inventory_a: 40.0,
        inventory_b: 5.0
    });
    assert_eq!(product.quantity, 5.0);
}

#[tokio::test]
async fn transfer_of_whole_bucket_is_allowed() {
    let (engine, _db) = engine_with_db().await;
    seed_product(&engine, "p1", 12.5, 0.0).await;

    let stock = engine.transfer(TransferCmd::new("p1", 12.5)).await.unwrap();
    assert_eq!(stock.inventory_a, 0.0);
    assert_eq!(stock.inventory_b, 12.5);
}

#[tokio::test]
async fn waste_of_exactly_bucket_b_empties_it() {
    let (engine, db) = engine_with_db().await;
    seed_product(&engine, "p1", 3.0, 7.0).await;

    let err = engine
        .waste_deduct(WasteCmd::new("p1", 8.0).reason("expired"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InsufficientStock(_)));
    assert_eq!(waste_rows(&db).await, 0);

    let b = engine
        .waste_deduct(WasteCmd::new("p1", 7.0).reason("expired"))
        .await
        .unwrap();
    assert_eq!(b, 0.0);
    let product = engine.product("p1").await.unwrap();
    assert_eq!(product.inventory_a, 3.0);
    assert_eq!(product.inventory_b, 0.0);
    assert_eq!(product.quantity, 0.0);
    assert_eq!(waste_rows(&db).await, 1);
}

#[tokio::test]
async fn quantity_mirror_follows_inventory_b() {
    let (engine, _db) = engine_with_db().await;
    seed_product(&engine, "p1", 10.0, 2.0).await;
    assert_eq!(engine.product("p1").await.unwrap().quantity, 2.0);

    engine.transfer(TransferCmd::new("p1", 3.5)).await.unwrap();
    assert_eq!(engine.product("p1").await.unwrap().quantity, 5.5);

    engine
        .waste_deduct(WasteCmd::new("p1", 0.5).reason("expired"))
        .await
        .unwrap();
    assert_eq!(engine.product("p1").await.unwrap().quantity, 5.0);

    let product = engine
        .set_inventory(SetInventoryCmd {
            product_id: "p1".to_string(),
            inventory_a: None,
            inventory_b: Some(9.0),
        })
        .await
        .unwrap();
    assert_eq!(product, engine.product("p1").await.unwrap());
    assert_eq!(product.inventory_a, 6.5);
    assert_eq!(product.inventory_b, 9.0);
    assert_eq!(product.quantity, 9.0);
}

#[tokio::test]
async fn invalid_quantities_are_rejected() {
    let (engine, _db) = engine_with_db().await;
    seed_product(&engine, "p1", 10.0, 10.0).await;

    for q in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let err = engine
            .transfer(TransferCmd::new("p1", q))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidArgument(_)), "{q}: {err}");
        let err = engine
            .waste_deduct(WasteCmd::new("p1", q).reason("spill"))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidArgument(_)), "{q}: {err}");
    }

    let product = engine.product("p1").await.unwrap();
    assert_eq!(product.stock(), Stock {
        inventory_a: 10.0,
        inventory_b: 10.0
    });
}

#[tokio::test]
async fn unknown_product_is_not_found() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .transfer(TransferCmd::new("ghost", 1.0))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("product ghost".to_string()));

    let err = engine
        .waste_deduct(WasteCmd::new("ghost", 1.0).reason("spill"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("product ghost".to_string()));
}

#[tokio::test]
async fn waste_without_a_reason_is_recorded() {
    let (engine, db) = engine_with_db().await;
    seed_product(&engine, "p1", 0.0, 10.0).await;

    let b = engine
        .waste_deduct(WasteCmd::new("p1", 1.0))
        .await
        .unwrap();
    assert_eq!(b, 9.0);
    let b = engine
        .waste_deduct(WasteCmd::new("p1", 1.0).reason("   "))
        .await
        .unwrap();
    assert_eq!(b, 8.0);

    assert_eq!(waste_rows(&db).await, 2);
    let logs = engine.waste_logs(&WasteLogFilter::default()).await.unwrap();
    assert!(logs.iter().all(|entry| entry.reason.is_none()));
}

#[tokio::test]
async fn waste_row_keeps_submitted_labels() {
    let (engine, _db) = engine_with_db().await;
    seed_product(&engine, "p1", 0.0, 10.0).await;

    engine
        .waste_deduct(
            WasteCmd::new("p1", 2.0)
                .reason("dropped")
                .product_name("Beans (bag)")
                .category("Retail")
                .recorded_by("maria"),
        )
        .await
        .unwrap();

    let logs = engine.waste_logs(&WasteLogFilter::default()).await.unwrap();
    assert_eq!(logs[0].product_name, "Beans (bag)");
    assert_eq!(logs[0].category, "Retail");
    assert_eq!(logs[0].recorded_by, "maria");
    assert_eq!(logs[0].product_firebase_id, "p1");
}

#[tokio::test]
async fn waste_logs_are_filtered_and_newest_first() {
    let (engine, _db) = engine_with_db().await;
    seed_product(&engine, "p1", 0.0, 10.0).await;

    engine
        .waste_deduct(WasteCmd::new("p1", 1.0).reason("first"))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
    let between = chrono::Utc::now();
    tokio::time::sleep(Duration::from_millis(20)).await;
    engine
        .waste_deduct(WasteCmd::new("p1", 1.0).reason("second"))
        .await
        .unwrap();

    let all = engine.waste_logs(&WasteLogFilter::default()).await.unwrap();
    let reasons: Vec<&str> = all.iter().filter_map(|e| e.reason.as_deref()).collect();
    assert_eq!(reasons, ["second", "first"]);

    let recent = engine
        .waste_logs(&WasteLogFilter {
            from: Some(between),
            to: None,
        })
        .await
        .unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].reason.as_deref(), Some("second"));

    let older = engine
        .waste_logs(&WasteLogFilter {
            from: None,
            to: Some(between),
        })
        .await
        .unwrap();
    assert_eq!(older.len(), 1);
    assert_eq!(older[0].reason.as_deref(), Some("first"));

    let err = engine
        .waste_logs(&WasteLogFilter {
            from: Some(between),
            to: Some(between - chrono::Duration::seconds(1)),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidArgument(_)));
}

#[tokio::test]
async fn set_inventory_validates_levels() {
    let (engine, _db) = engine_with_db().await;
    seed_product(&engine, "p1", 1.0, 1.0).await;

    let err = engine
        .set_inventory(SetInventoryCmd {
            product_id: "p1".to_string(),
            inventory_a: None,
            inventory_b: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidArgument(_)));

    let err = engine
        .set_inventory(SetInventoryCmd {
            product_id: "p1".to_string(),
            inventory_a: Some(-1.0),
            inventory_b: None,
        })
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidArgument("inventory_a must be a finite number >= 0".to_string())
    );

    let product = engine
        .set_inventory(SetInventoryCmd {
            product_id: "p1".to_string(),
            inventory_a: Some(0.0),
            inventory_b: Some(0.0),
        })
        .await
        .unwrap();
    assert_eq!(product.firebase_id, "p1");
    assert_eq!(product.name, "Espresso beans");
    assert_eq!(product.inventory_a, 0.0);
    assert_eq!(product.inventory_b, 0.0);
    assert_eq!(product.quantity, 0.0);
}

#[tokio::test]
async fn concurrent_waste_never_overdraws() {
    let (engine, _db) = engine_with_db().await;
    seed_product(&engine, "p1", 0.0, 5.0).await;
    let engine = Arc::new(engine);

    let mut handles = Vec::new();
    for i in 0..10 {
        let engine = Arc::clone(&engine);
        handles.push(tokio::spawn(async move {
            engine
                .waste_deduct(WasteCmd::new("p1", 1.0).reason(format!("batch {i}")))
                .await
        }));
    }

    let mut accepted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(err) => assert!(matches!(err, EngineError::InsufficientStock(_)), "{err}"),
        }
    }
    assert_eq!(accepted, 5);

    let product = engine.product("p1").await.unwrap();
    assert_eq!(product.inventory_b, 0.0);
    assert_eq!(product.quantity, 0.0);
    let logs = engine.waste_logs(&WasteLogFilter::default()).await.unwrap();
    assert_eq!(logs.len(), 5);
}

#[tokio::test]
async fn zero_transaction_timeout_is_rejected() {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    let err = Engine::builder()
        .database(db)
        .transaction_timeout(Duration::ZERO)
        .build()
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidArgument(_)));
}

async fn waste_rows(db: &DatabaseConnection) -> u64 {
    let row = db
        .query_one(Statement::from_string(
            db.get_database_backend(),
            "SELECT COUNT(*) AS n FROM waste_logs",
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get::<i64>("", "n").unwrap() as u64
}
