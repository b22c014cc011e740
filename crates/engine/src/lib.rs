//! Inventory stock ledger on top of sea-orm.
//!
//! The [`Engine`] owns a database connection and exposes every operation:
//! reference data (metrics, categories, locations), inventory items, and the
//! per-location stock rows with their movement history.
//!
//! Every operation runs in its own database transaction. Stock uniqueness per
//! `(inventory, location)` is enforced by a unique index and reported as
//! [`EngineError::StockAlreadyExists`].

pub use categories::Category;
pub use error::EngineError;
pub use inventories::{Inventory, NewInventory};
pub use inventory_stocks::InventoryStock;
pub use locations::Location;
pub use metrics::Metric;
pub use observer::{LogObserver, ObserverError, StockObserver};
pub use ops::{Engine, EngineBuilder};
pub use quantity::Quantity;
pub use stock_movements::StockMovement;

mod categories;
mod error;
mod inventories;
mod inventory_stocks;
mod locations;
mod metrics;
mod observer;
mod ops;
mod quantity;
mod stock_movements;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
