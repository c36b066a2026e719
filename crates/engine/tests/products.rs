use sea_orm::{Database, DatabaseConnection};

use engine::{
    AuditCmd, Engine, EngineError, IngredientLine, NewProduct, ProductPatch, RecipeCmd,
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

#[tokio::test]
async fn create_product_applies_defaults() {
    let (engine, _db) = engine_with_db().await;

    let product = engine
        .create_product(NewProduct::new(" croissant ", "Croissant", "Bakery").stock(12.0, 3.0))
        .await
        .unwrap();
    assert_eq!(product.firebase_id, "croissant");
    assert_eq!(product.unit, "pcs");
    assert_eq!(product.price, 0.0);
    assert_eq!(product.quantity, 3.0);

    let stored = engine.product("croissant").await.unwrap();
    assert_eq!(stored.name, "Croissant");
    assert_eq!(stored.inventory_a, 12.0);
    assert_eq!(stored.inventory_b, 3.0);
    assert_eq!(stored.image_uri, "");
}

#[tokio::test]
async fn duplicate_key_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    engine
        .create_product(NewProduct::new("p1", "Tea", "Drinks"))
        .await
        .unwrap();

    let err = engine
        .create_product(NewProduct::new("p1", "Other tea", "Drinks"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("p1".to_string()));
    assert_eq!(engine.product("p1").await.unwrap().name, "Tea");
}

#[tokio::test]
async fn negative_stock_is_rejected_on_create() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .create_product(NewProduct::new("p1", "Tea", "Drinks").stock(-1.0, 0.0))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidArgument(_)));
    assert!(engine.products().await.unwrap().is_empty());
}

#[tokio::test]
async fn update_product_leaves_stock_alone() {
    let (engine, _db) = engine_with_db().await;
    engine
        .create_product(NewProduct::new("p1", "Tea", "Drinks").stock(5.0, 2.0))
        .await
        .unwrap();

    let updated = engine
        .update_product(
            "p1",
            ProductPatch {
                name: Some("Green tea".to_string()),
                price: Some(3.5),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Green tea");
    assert_eq!(updated.price, 3.5);
    assert_eq!(updated.category, "Drinks");
    assert_eq!(updated.inventory_a, 5.0);
    assert_eq!(updated.inventory_b, 2.0);
    assert_eq!(updated.quantity, 2.0);

    let err = engine
        .update_product("p1", ProductPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidArgument(_)));

    let err = engine
        .update_product(
            "ghost",
            ProductPatch {
                price: Some(1.0),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("product ghost".to_string()));
}

#[tokio::test]
async fn products_are_listed_by_name() {
    let (engine, _db) = engine_with_db().await;
    for (id, name) in [("p1", "Scone"), ("p2", "Bagel"), ("p3", "Muffin")] {
        engine
            .create_product(NewProduct::new(id, name, "Bakery"))
            .await
            .unwrap();
    }

    let names: Vec<String> = engine
        .products()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, ["Bagel", "Muffin", "Scone"]);
}

#[tokio::test]
async fn product_with_recipe_cannot_be_deleted() {
    let (engine, _db) = engine_with_db().await;
    engine
        .create_product(NewProduct::new("latte", "Latte", "Drinks"))
        .await
        .unwrap();
    engine
        .create_product(NewProduct::new("milk", "Milk", "Dairy"))
        .await
        .unwrap();
    let recipe_id = engine
        .create_recipe(
            RecipeCmd::new("latte", "Latte").ingredient(IngredientLine::new("milk", "Milk", 200.0)),
        )
        .await
        .unwrap();

    let err = engine.delete_product("latte").await.unwrap_err();
    assert_eq!(
        err,
        EngineError::InUse("product latte (1 recipes)".to_string())
    );

    engine.delete_recipe(&recipe_id).await.unwrap();
    let deleted = engine.delete_product("latte").await.unwrap();
    assert_eq!(deleted.name, "Latte");

    let err = engine.product("latte").await.unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("product latte".to_string()));
}

#[tokio::test]
async fn audit_entries_require_an_actor() {
    let (engine, _db) = engine_with_db().await;

    let entry = engine
        .record_audit(AuditCmd::new("Inventory Transfer", "u1", "Maria").details("40 units"))
        .await
        .unwrap();
    assert_eq!(entry.action, "Inventory Transfer");
    assert_eq!(entry.details, "40 units");

    let entry = engine
        .record_audit(AuditCmd::new("Product Deleted", "u1", "Maria"))
        .await
        .unwrap();
    assert_eq!(entry.details, "");

    let err = engine
        .record_audit(AuditCmd::new("Product Deleted", "", "Maria"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidArgument("user id must not be empty".to_string())
    );
}
