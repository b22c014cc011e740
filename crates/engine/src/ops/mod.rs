use std::{fmt, sync::Arc};

use sea_orm::DatabaseConnection;

use crate::{InventoryStock, LogObserver, ResultEngine, StockMovement, StockObserver};

mod categories;
mod inventories;
mod locations;
mod lookup;
mod metrics;
mod movements;
mod stocks;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

pub struct Engine {
    database: DatabaseConnection,
    observer: Arc<dyn StockObserver>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("database", &self.database)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    // Observer calls happen after commit; failures are reported, never returned.
    fn notify_created(&self, stock: &InventoryStock) {
        if let Err(err) = self.observer.stock_created(stock) {
            tracing::warn!("stock observer failed on create of {}: {err}", stock.id);
        }
    }

    fn notify_changed(&self, stock: &InventoryStock, movement: Option<&StockMovement>) {
        if let Err(err) = self.observer.stock_changed(stock, movement) {
            tracing::warn!("stock observer failed on change of {}: {err}", stock.id);
        }
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    observer: Option<Arc<dyn StockObserver>>,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Replace the default [`LogObserver`] audit hook.
    pub fn observer(mut self, observer: Arc<dyn StockObserver>) -> EngineBuilder {
        self.observer = Some(observer);
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            observer: self.observer.unwrap_or_else(|| Arc::new(LogObserver)),
        })
    }
}
