use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{Engine, EngineError, Inventory, NewInventory, Quantity};
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

/// Milk in litres, filed under drinks.
async fn new_inventory(engine: &Engine) -> Inventory {
    let metric = engine.create_metric("Litres", "L").await.unwrap();
    let category = engine.create_category("Drinks").await.unwrap();
    engine
        .create_inventory(NewInventory {
            name: "Milk".to_string(),
            description: "Delicious Milk".to_string(),
            metric_id: Some(metric.id),
            category_id: Some(category.id),
        })
        .await
        .unwrap()
}

async fn new_location(engine: &Engine) -> Uuid {
    engine.create_location("Warehouse", None).await.unwrap().id
}

#[tokio::test]
async fn inventory_has_metric() {
    let (engine, _db) = engine_with_db().await;
    let item = new_inventory(&engine).await;

    assert!(engine.has_metric(item.id).await.unwrap());
    assert_eq!(
        engine.metric_symbol(item.id).await.unwrap(),
        Some("L".to_string())
    );
}

#[tokio::test]
async fn inventory_does_not_have_metric_once_deleted() {
    let (engine, _db) = engine_with_db().await;
    let item = new_inventory(&engine).await;
    let metric_id = item.metric_id.unwrap();

    engine.delete_metric(metric_id).await.unwrap();

    assert!(!engine.has_metric(item.id).await.unwrap());
    assert_eq!(engine.metric_symbol(item.id).await.unwrap(), None);
    // The item row still carries the dangling id.
    let reloaded = engine.inventory(item.id).await.unwrap();
    assert_eq!(reloaded.metric_id, Some(metric_id));
}

#[tokio::test]
async fn inventory_without_metric_id_has_no_metric() {
    let (engine, _db) = engine_with_db().await;
    let item = engine
        .create_inventory(NewInventory {
            name: "Bolts".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(!engine.has_metric(item.id).await.unwrap());
    assert!(!engine.has_category(item.id).await.unwrap());
}

#[tokio::test]
async fn set_inventory_metric_to_a_missing_metric() {
    let (engine, _db) = engine_with_db().await;
    let item = new_inventory(&engine).await;
    let dangling = Uuid::new_v4();

    let updated = engine
        .set_inventory_metric(item.id, Some(dangling))
        .await
        .unwrap();

    assert_eq!(updated.metric_id, Some(dangling));
    assert_eq!(engine.inventory(item.id).await.unwrap(), updated);
    assert!(!engine.has_metric(item.id).await.unwrap());
    assert_eq!(engine.metric_symbol(item.id).await.unwrap(), None);
}

#[tokio::test]
async fn set_inventory_metric_switches_and_clears() {
    let (engine, _db) = engine_with_db().await;
    let item = new_inventory(&engine).await;
    let kilos = engine.create_metric("Kilograms", "kg").await.unwrap();

    engine
        .set_inventory_metric(item.id, Some(kilos.id))
        .await
        .unwrap();
    assert_eq!(
        engine.metric_symbol(item.id).await.unwrap(),
        Some("kg".to_string())
    );

    let cleared = engine.set_inventory_metric(item.id, None).await.unwrap();
    assert_eq!(cleared.metric_id, None);
    assert!(!engine.has_metric(item.id).await.unwrap());
    // Other fields are left alone.
    assert_eq!(cleared.name, "Milk");
    assert_eq!(cleared.category_id, item.category_id);
}

#[tokio::test]
async fn rename_inventory_trims_input() {
    let (engine, _db) = engine_with_db().await;
    let item = new_inventory(&engine).await;

    let renamed = engine
        .rename_inventory(item.id, "  Oat milk ", " Barista edition  ")
        .await
        .unwrap();

    assert_eq!(renamed.name, "Oat milk");
    assert_eq!(renamed.description, "Barista edition");
    assert_eq!(renamed.metric_id, item.metric_id);
    assert_eq!(engine.inventory(item.id).await.unwrap(), renamed);

    let err = engine
        .rename_inventory(item.id, "   ", "")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidName("inventory name must not be empty".to_string())
    );
    assert_eq!(engine.inventory(item.id).await.unwrap().name, "Oat milk");
}

#[tokio::test]
async fn rename_unknown_inventory_fails() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .rename_inventory(Uuid::new_v4(), "Milk", "")
        .await
        .unwrap_err();

    assert_eq!(
        err,
        EngineError::KeyNotFound("inventory not exists".to_string())
    );
}

#[tokio::test]
async fn inventory_has_category() {
    let (engine, _db) = engine_with_db().await;
    let item = new_inventory(&engine).await;

    assert!(engine.has_category(item.id).await.unwrap());
    let category = engine.inventory_category(item.id).await.unwrap().unwrap();
    assert_eq!(category.name, "Drinks");
}

#[tokio::test]
async fn inventory_does_not_have_category_once_cleared() {
    let (engine, _db) = engine_with_db().await;
    let item = new_inventory(&engine).await;

    let updated = engine.set_inventory_category(item.id, None).await.unwrap();

    assert_eq!(updated.category_id, None);
    assert!(!engine.has_category(item.id).await.unwrap());
}

#[tokio::test]
async fn inventory_does_not_have_category_once_deleted() {
    let (engine, _db) = engine_with_db().await;
    let item = new_inventory(&engine).await;

    engine
        .delete_category(item.category_id.unwrap())
        .await
        .unwrap();

    assert!(!engine.has_category(item.id).await.unwrap());
}

#[tokio::test]
async fn inventory_round_trips_through_storage() {
    let (engine, _db) = engine_with_db().await;
    let metric_id = Uuid::new_v4();
    let category_id = Uuid::new_v4();

    let created = engine
        .create_inventory(NewInventory {
            name: " Milk ".to_string(),
            description: "Delicious Milk".to_string(),
            metric_id: Some(metric_id),
            category_id: Some(category_id),
        })
        .await
        .unwrap();
    assert_eq!(created.name, "Milk");

    let reloaded = engine.inventory(created.id).await.unwrap();
    assert_eq!(reloaded, created);
    assert_eq!(reloaded.metric_id, Some(metric_id));
    assert_eq!(reloaded.category_id, Some(category_id));

    assert_eq!(engine.inventories().await.unwrap(), vec![created]);
}

#[tokio::test]
async fn inventory_requires_a_name() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .create_inventory(NewInventory {
            name: "   ".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert_eq!(
        err,
        EngineError::InvalidName("inventory name must not be empty".to_string())
    );
}

#[tokio::test]
async fn inventory_create_stock_on_location() {
    let (engine, _db) = engine_with_db().await;
    let item = new_inventory(&engine).await;
    let location_id = new_location(&engine).await;

    let stock = engine
        .create_stock_on_location(item.id, 10, location_id)
        .await
        .unwrap();

    let stored = engine.stock_on_location(item.id, location_id).await.unwrap();
    assert_eq!(stored, stock);
    assert_eq!(stored.quantity, Quantity::from_units(10));
    assert_eq!(stored.inventory_id, item.id);
    assert_eq!(stored.location_id, location_id);
}

#[tokio::test]
async fn create_stock_accepts_decimal_strings() {
    let (engine, _db) = engine_with_db().await;
    let item = new_inventory(&engine).await;
    let location_id = new_location(&engine).await;

    let stock = engine
        .create_stock_on_location(item.id, "2,5", location_id)
        .await
        .unwrap();

    assert_eq!(stock.quantity.hundredths(), 250);
}

#[tokio::test]
async fn inventory_new_stock_on_location_is_not_persisted() {
    let (engine, _db) = engine_with_db().await;
    let item = new_inventory(&engine).await;
    let location_id = new_location(&engine).await;

    let stock = engine
        .new_stock_on_location(item.id, location_id)
        .await
        .unwrap();

    assert_eq!(stock.inventory_id, item.id);
    assert_eq!(stock.location_id, location_id);
    assert_eq!(stock.quantity, Quantity::ZERO);
    assert!(engine.stocks(item.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn inventory_new_stock_on_location_failure() {
    let (engine, _db) = engine_with_db().await;
    let item = new_inventory(&engine).await;
    let location_id = new_location(&engine).await;

    let stock = engine
        .new_stock_on_location(item.id, location_id)
        .await
        .unwrap();
    engine.save_stock(&stock).await.unwrap();

    let err = engine
        .new_stock_on_location(item.id, location_id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::StockAlreadyExists(_)));
}

#[tokio::test]
async fn duplicate_prepared_stock_is_rejected_by_the_unique_index() {
    let (engine, _db) = engine_with_db().await;
    let item = new_inventory(&engine).await;
    let location_id = new_location(&engine).await;

    // Both prepares pass: nothing is persisted yet.
    let first = engine
        .new_stock_on_location(item.id, location_id)
        .await
        .unwrap();
    let second = engine
        .new_stock_on_location(item.id, location_id)
        .await
        .unwrap();

    engine.save_stock(&first).await.unwrap();
    let err = engine.save_stock(&second).await.unwrap_err();

    assert_eq!(
        err,
        EngineError::StockAlreadyExists(format!(
            "item {} already has stock at location {location_id}",
            item.id
        ))
    );
    assert_eq!(engine.stocks(item.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn create_stock_twice_fails() {
    let (engine, _db) = engine_with_db().await;
    let item = new_inventory(&engine).await;
    let location_id = new_location(&engine).await;

    engine
        .create_stock_on_location(item.id, 10, location_id)
        .await
        .unwrap();
    let err = engine
        .create_stock_on_location(item.id, 5, location_id)
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::StockAlreadyExists(_)));
    assert_eq!(
        engine.total_stock(item.id).await.unwrap(),
        Quantity::from_units(10)
    );
}

#[tokio::test]
async fn inventory_invalid_quantity() {
    let (engine, _db) = engine_with_db().await;
    let item = new_inventory(&engine).await;
    let location_id = new_location(&engine).await;

    let err = engine
        .create_stock_on_location(item.id, "invalid quantity", location_id)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        EngineError::InvalidQuantity("'invalid quantity' is not a number".to_string())
    );
    assert!(engine.stocks(item.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn negative_quantity_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let item = new_inventory(&engine).await;
    let location_id = new_location(&engine).await;

    let err = engine
        .create_stock_on_location(item.id, -4, location_id)
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::InvalidQuantity(_)));
    assert!(engine.stocks(item.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn stock_on_missing_records_fails() {
    let (engine, _db) = engine_with_db().await;
    let item = new_inventory(&engine).await;
    let location_id = new_location(&engine).await;

    let err = engine
        .new_stock_on_location(Uuid::new_v4(), location_id)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::KeyNotFound("inventory not exists".to_string())
    );

    let err = engine
        .create_stock_on_location(item.id, 1, Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::KeyNotFound("location not exists".to_string())
    );
}

#[tokio::test]
async fn delete_inventory_removes_its_stock() {
    let (engine, db) = engine_with_db().await;
    let item = new_inventory(&engine).await;
    let location_id = new_location(&engine).await;
    engine
        .create_stock_on_location(item.id, 3, location_id)
        .await
        .unwrap();

    engine.delete_inventory(item.id).await.unwrap();

    assert!(matches!(
        engine.inventory(item.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
    // The location is free again.
    engine.delete_location(location_id).await.unwrap();
    let leftovers = Statement::from_string(
        db.get_database_backend(),
        "SELECT COUNT(*) AS n FROM stock_movements",
    );
    let row = db
        .query_one(leftovers)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.try_get::<i64>("", "n").unwrap(), 0);
}

#[tokio::test]
async fn metric_and_category_crud() {
    let (engine, _db) = engine_with_db().await;

    let metric = engine.create_metric("Kilograms", "kg").await.unwrap();
    let metric = engine
        .update_metric(metric.id, "Grams", "g")
        .await
        .unwrap();
    assert_eq!(engine.metric(metric.id).await.unwrap().symbol, "g");
    assert_eq!(engine.metrics().await.unwrap(), vec![metric.clone()]);

    let category = engine.create_category("Food").await.unwrap();
    let category = engine
        .rename_category(category.id, "Groceries")
        .await
        .unwrap();
    assert_eq!(engine.category(category.id).await.unwrap().name, "Groceries");
    assert_eq!(engine.categories().await.unwrap(), vec![category.clone()]);

    engine.delete_metric(metric.id).await.unwrap();
    assert!(matches!(
        engine.metric(metric.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(matches!(
        engine.delete_category(Uuid::new_v4()).await,
        Err(EngineError::KeyNotFound(_))
    ));
}
