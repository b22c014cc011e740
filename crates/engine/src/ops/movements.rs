use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, InventoryStock, Quantity, ResultEngine, StockMovement, inventory_stocks,
    stock_movements,
};

use super::{Engine, with_tx};

impl Engine {
    /// Return the movements of a stock row, oldest first.
    pub async fn stock_movements(&self, stock_id: Uuid) -> ResultEngine<Vec<StockMovement>> {
        with_tx!(self, |db_tx| {
            self.require_stock(&db_tx, stock_id).await?;
            let models = stock_movements::Entity::find()
                .filter(stock_movements::Column::StockId.eq(stock_id))
                .order_by_asc(stock_movements::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            models
                .into_iter()
                .map(StockMovement::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Undo a movement: the stock goes back to the movement's `before`
    /// quantity, and the rollback itself is recorded as a new movement.
    pub async fn rollback_movement(&self, movement_id: Uuid) -> ResultEngine<InventoryStock> {
        let (stock, movement) = with_tx!(self, |db_tx| {
            let movement = stock_movements::Entity::find_by_id(movement_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("movement not exists".to_string()))?;
            let movement = StockMovement::try_from(movement)?;
            let model = self.require_stock(&db_tx, movement.stock_id).await?;
            self.apply_quantity(
                &db_tx,
                model,
                movement.before,
                Some(format!("Rolled back movement {movement_id}")),
            )
            .await
        })?;
        self.notify_changed(&stock, Some(&movement));
        Ok(stock)
    }

    /// Write `after` as the stock's quantity and record the movement.
    pub(super) async fn apply_quantity(
        &self,
        db: &DatabaseTransaction,
        model: inventory_stocks::Model,
        after: Quantity,
        reason: Option<String>,
    ) -> ResultEngine<(InventoryStock, StockMovement)> {
        let before = Quantity::from_stored(model.quantity, "quantity")?;

        let active = inventory_stocks::ActiveModel {
            id: ActiveValue::Set(model.id),
            quantity: ActiveValue::Set(after.hundredths()),
            ..Default::default()
        };
        let updated = active.update(db).await?;

        let movement = StockMovement::new(model.id, before, after, reason, Utc::now());
        let movement_model: stock_movements::ActiveModel = (&movement).into();
        movement_model.insert(db).await?;

        Ok((InventoryStock::try_from(updated)?, movement))
    }
}
