use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use sea_orm::{Database, DatabaseConnection};

use engine::{
    Engine, EngineError, InventoryStock, NewInventory, ObserverError, Quantity, StockMovement,
    StockObserver,
};
use migration::MigratorTrait;
use uuid::Uuid;

async fn connect() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    db
}

async fn engine_with_db() -> Engine {
    Engine::builder()
        .database(connect().await)
        .build()
        .await
        .unwrap()
}

/// Creates an item and a location, returning their ids.
async fn item_and_location(engine: &Engine) -> (Uuid, Uuid) {
    let item = engine
        .create_inventory(NewInventory {
            name: "Milk".to_string(),
            description: "Delicious Milk".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    let location = engine.create_location("Warehouse", None).await.unwrap();
    (item.id, location.id)
}

#[derive(Default)]
struct CountingObserver {
    created: AtomicUsize,
    changed: AtomicUsize,
}

impl StockObserver for CountingObserver {
    fn stock_created(&self, _stock: &InventoryStock) -> Result<(), ObserverError> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn stock_changed(
        &self,
        _stock: &InventoryStock,
        _movement: Option<&StockMovement>,
    ) -> Result<(), ObserverError> {
        self.changed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct FailingObserver;

impl StockObserver for FailingObserver {
    fn stock_created(&self, _stock: &InventoryStock) -> Result<(), ObserverError> {
        Err("audit sink unavailable".into())
    }

    fn stock_changed(
        &self,
        _stock: &InventoryStock,
        _movement: Option<&StockMovement>,
    ) -> Result<(), ObserverError> {
        Err("audit sink unavailable".into())
    }
}

#[tokio::test]
async fn add_and_take_record_movements() {
    let engine = engine_with_db().await;
    let (item_id, location_id) = item_and_location(&engine).await;

    let stock = engine
        .create_stock_on_location(item_id, 10, location_id)
        .await
        .unwrap();
    engine
        .add_to_location(item_id, location_id, "2.5", Some("delivery"))
        .await
        .unwrap();
    let stock_after = engine
        .take_from_location(item_id, location_id, 4, None)
        .await
        .unwrap();

    assert_eq!(stock_after.quantity.hundredths(), 850);

    let movements = engine.stock_movements(stock.id).await.unwrap();
    let steps: Vec<(i64, i64)> = movements
        .iter()
        .map(|m| (m.before.hundredths(), m.after.hundredths()))
        .collect();
    assert_eq!(steps, vec![(0, 1000), (1000, 1250), (1250, 850)]);
    assert_eq!(movements[0].reason.as_deref(), Some("First record"));
    assert_eq!(movements[1].reason.as_deref(), Some("delivery"));
    assert_eq!(movements[2].reason, None);
}

#[tokio::test]
async fn taking_more_than_available_fails_without_writing() {
    let engine = engine_with_db().await;
    let (item_id, location_id) = item_and_location(&engine).await;
    let stock = engine
        .create_stock_on_location(item_id, 3, location_id)
        .await
        .unwrap();

    let err = engine
        .take_from_location(item_id, location_id, 5, Some("order"))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        EngineError::NotEnoughStock("only 3.00 available, 5.00 requested".to_string())
    );
    let stored = engine.stock_on_location(item_id, location_id).await.unwrap();
    assert_eq!(stored.quantity, Quantity::from_units(3));
    assert_eq!(engine.stock_movements(stock.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn adjusting_a_missing_stock_fails() {
    let engine = engine_with_db().await;
    let (item_id, location_id) = item_and_location(&engine).await;

    let err = engine
        .add_to_location(item_id, location_id, 1, None)
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::StockNotFound(_)));
}

#[tokio::test]
async fn invalid_adjustment_quantity_is_rejected() {
    let engine = engine_with_db().await;
    let (item_id, location_id) = item_and_location(&engine).await;
    engine
        .create_stock_on_location(item_id, 3, location_id)
        .await
        .unwrap();

    let err = engine
        .add_to_location(item_id, location_id, "lots", None)
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::InvalidQuantity(_)));
}

#[tokio::test]
async fn totals_cover_every_location() {
    let engine = engine_with_db().await;
    let (item_id, warehouse) = item_and_location(&engine).await;
    let shop = engine.create_location("Shop", None).await.unwrap().id;

    assert!(!engine.is_in_stock(item_id).await.unwrap());

    engine
        .create_stock_on_location(item_id, 10, warehouse)
        .await
        .unwrap();
    engine
        .create_stock_on_location(item_id, "0.75", shop)
        .await
        .unwrap();

    assert_eq!(engine.total_stock(item_id).await.unwrap().hundredths(), 1075);
    assert!(engine.is_in_stock(item_id).await.unwrap());
    assert!(engine.has_enough_stock(item_id, 10).await.unwrap());
    assert!(!engine.has_enough_stock(item_id, 11).await.unwrap());
    assert_eq!(engine.stocks(item_id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn update_quantity_and_rollback() {
    let engine = engine_with_db().await;
    let (item_id, location_id) = item_and_location(&engine).await;
    let stock = engine
        .create_stock_on_location(item_id, 10, location_id)
        .await
        .unwrap();

    let updated = engine
        .update_stock_quantity(stock.id, 4, Some("stocktake"))
        .await
        .unwrap();
    assert_eq!(updated.quantity, Quantity::from_units(4));

    let movements = engine.stock_movements(stock.id).await.unwrap();
    let stocktake = movements.last().unwrap();

    let restored = engine.rollback_movement(stocktake.id).await.unwrap();
    assert_eq!(restored.quantity, Quantity::from_units(10));

    let movements = engine.stock_movements(stock.id).await.unwrap();
    assert_eq!(movements.len(), 3);
    let rollback = movements.last().unwrap();
    assert_eq!(rollback.before, Quantity::from_units(4));
    assert_eq!(rollback.after, Quantity::from_units(10));
    assert_eq!(
        rollback.reason,
        Some(format!("Rolled back movement {}", stocktake.id))
    );
}

#[tokio::test]
async fn rollback_of_unknown_movement_fails() {
    let engine = engine_with_db().await;

    let err = engine.rollback_movement(Uuid::new_v4()).await.unwrap_err();

    assert_eq!(
        err,
        EngineError::KeyNotFound("movement not exists".to_string())
    );
}

#[tokio::test]
async fn move_stock_between_locations() {
    let engine = engine_with_db().await;
    let (item_id, warehouse) = item_and_location(&engine).await;
    let shop = engine.create_location("Shop", None).await.unwrap().id;
    let stock = engine
        .create_stock_on_location(item_id, 6, warehouse)
        .await
        .unwrap();

    let moved = engine.move_stock(item_id, warehouse, shop).await.unwrap();

    assert_eq!(moved.id, stock.id);
    assert_eq!(moved.location_id, shop);
    assert_eq!(moved.quantity, Quantity::from_units(6));
    assert!(matches!(
        engine.stock_on_location(item_id, warehouse).await,
        Err(EngineError::StockNotFound(_))
    ));
}

#[tokio::test]
async fn move_stock_onto_an_occupied_location_fails() {
    let engine = engine_with_db().await;
    let (item_id, warehouse) = item_and_location(&engine).await;
    let shop = engine.create_location("Shop", None).await.unwrap().id;
    engine
        .create_stock_on_location(item_id, 6, warehouse)
        .await
        .unwrap();
    engine
        .create_stock_on_location(item_id, 1, shop)
        .await
        .unwrap();

    let err = engine.move_stock(item_id, warehouse, shop).await.unwrap_err();
    assert!(matches!(err, EngineError::StockAlreadyExists(_)));

    let err = engine
        .move_stock(item_id, warehouse, warehouse)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidLocation(_)));
}

#[tokio::test]
async fn move_stock_from_an_empty_location_fails() {
    let engine = engine_with_db().await;
    let (item_id, warehouse) = item_and_location(&engine).await;
    let shop = engine.create_location("Shop", None).await.unwrap().id;

    let err = engine.move_stock(item_id, warehouse, shop).await.unwrap_err();

    assert_eq!(
        err,
        EngineError::StockNotFound(format!(
            "no stock of item {item_id} at location {warehouse}"
        ))
    );
    assert!(engine.stocks(item_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn move_stock_of_an_unknown_item_fails() {
    let engine = engine_with_db().await;
    let (_, warehouse) = item_and_location(&engine).await;
    let shop = engine.create_location("Shop", None).await.unwrap().id;

    let err = engine
        .move_stock(Uuid::new_v4(), warehouse, shop)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        EngineError::KeyNotFound("inventory not exists".to_string())
    );
}

#[tokio::test]
async fn move_stock_to_an_unknown_location_fails() {
    let engine = engine_with_db().await;
    let (item_id, warehouse) = item_and_location(&engine).await;
    engine
        .create_stock_on_location(item_id, 2, warehouse)
        .await
        .unwrap();

    let err = engine
        .move_stock(item_id, warehouse, Uuid::new_v4())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        EngineError::KeyNotFound("location not exists".to_string())
    );
    let stored = engine.stock_on_location(item_id, warehouse).await.unwrap();
    assert_eq!(stored.quantity, Quantity::from_units(2));
}

#[tokio::test]
async fn observer_is_notified_after_writes() {
    let observer = Arc::new(CountingObserver::default());
    let engine = Engine::builder()
        .database(connect().await)
        .observer(observer.clone())
        .build()
        .await
        .unwrap();
    let (item_id, location_id) = item_and_location(&engine).await;

    engine
        .create_stock_on_location(item_id, 10, location_id)
        .await
        .unwrap();
    engine
        .add_to_location(item_id, location_id, 1, None)
        .await
        .unwrap();
    // Failed writes are not reported.
    let _ = engine
        .create_stock_on_location(item_id, "bogus", location_id)
        .await;
    let _ = engine
        .take_from_location(item_id, location_id, 100, None)
        .await;

    assert_eq!(observer.created.load(Ordering::SeqCst), 1);
    assert_eq!(observer.changed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failing_observer_does_not_fail_the_write() {
    let engine = Engine::builder()
        .database(connect().await)
        .observer(Arc::new(FailingObserver))
        .build()
        .await
        .unwrap();
    let (item_id, location_id) = item_and_location(&engine).await;

    let stock = engine
        .create_stock_on_location(item_id, 10, location_id)
        .await
        .unwrap();
    engine
        .take_from_location(item_id, location_id, 2, None)
        .await
        .unwrap();

    let stored = engine.stock_on_location(item_id, location_id).await.unwrap();
    assert_eq!(stored.id, stock.id);
    assert_eq!(stored.quantity, Quantity::from_units(8));
}
