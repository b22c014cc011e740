//! Audit hook called after stock writes commit.
//!
//! The engine never lets an observer failure leak into the write path: the
//! error is logged and the committed write stands.

use crate::{InventoryStock, StockMovement};

pub type ObserverError = Box<dyn std::error::Error + Send + Sync>;

/// Receives a notification for every committed stock write.
pub trait StockObserver: Send + Sync {
    /// A stock row was persisted for a new `(inventory, location)` pair.
    fn stock_created(&self, stock: &InventoryStock) -> Result<(), ObserverError>;

    /// The quantity or location of an existing stock row changed.
    fn stock_changed(
        &self,
        stock: &InventoryStock,
        movement: Option<&StockMovement>,
    ) -> Result<(), ObserverError>;
}

/// Default observer: writes a human-readable audit line through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl StockObserver for LogObserver {
    fn stock_created(&self, stock: &InventoryStock) -> Result<(), ObserverError> {
        tracing::info!(
            target: "engine::audit",
            "Stock of {} created for item {} at location {}",
            stock.quantity,
            stock.inventory_id,
            stock.location_id
        );
        Ok(())
    }

    fn stock_changed(
        &self,
        stock: &InventoryStock,
        movement: Option<&StockMovement>,
    ) -> Result<(), ObserverError> {
        match movement {
            Some(movement) => tracing::info!(
                target: "engine::audit",
                "Stock {} changed from {} to {} ({})",
                stock.id,
                movement.before,
                movement.after,
                movement.reason.as_deref().unwrap_or("no reason given")
            ),
            None => tracing::info!(
                target: "engine::audit",
                "Stock {} of item {} moved to location {}",
                stock.id,
                stock.inventory_id,
                stock.location_id
            ),
        }
        Ok(())
    }
}
