use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, InventoryStock, Quantity, ResultEngine, StockMovement, inventory_stocks,
    stock_movements,
    util::{map_stock_conflict, normalize_optional_text},
};

use super::{Engine, with_tx};

const FIRST_RECORD_REASON: &str = "First record";

fn already_exists(inventory_id: Uuid, location_id: Uuid) -> EngineError {
    EngineError::StockAlreadyExists(format!(
        "item {inventory_id} already has stock at location {location_id}"
    ))
}

impl Engine {
    /// Prepare a stock row for `inventory_id` at `location_id` with quantity
    /// zero.
    ///
    /// Nothing is written: persist the result with [`Engine::save_stock`].
    /// Fails with `StockAlreadyExists` if the pair already has a row.
    pub async fn new_stock_on_location(
        &self,
        inventory_id: Uuid,
        location_id: Uuid,
    ) -> ResultEngine<InventoryStock> {
        with_tx!(self, |db_tx| {
            self.require_inventory(&db_tx, inventory_id).await?;
            self.require_location(&db_tx, location_id).await?;
            if self
                .find_stock_on_location(&db_tx, inventory_id, location_id)
                .await?
                .is_some()
            {
                return Err(already_exists(inventory_id, location_id));
            }
            Ok(InventoryStock::new(inventory_id, location_id))
        })
    }

    /// Persist a stock prepared with [`Engine::new_stock_on_location`].
    ///
    /// There is no pre-check here: the unique index on
    /// `(inventory_id, location_id)` rejects a duplicate and the violation is
    /// reported as `StockAlreadyExists`.
    pub async fn save_stock(&self, stock: &InventoryStock) -> ResultEngine<InventoryStock> {
        let saved = self.insert_stock(stock.clone(), false).await?;
        self.notify_created(&saved);
        Ok(saved)
    }

    /// Validate `quantity`, then create and persist the stock row for
    /// `inventory_id` at `location_id` in one step.
    ///
    /// `quantity` is anything convertible into a [`Quantity`]: an integer, a
    /// float, or a decimal string. Invalid input fails with `InvalidQuantity`
    /// before the database is touched. An existing row for the pair fails
    /// with `StockAlreadyExists`.
    pub async fn create_stock_on_location<Q>(
        &self,
        inventory_id: Uuid,
        quantity: Q,
        location_id: Uuid,
    ) -> ResultEngine<InventoryStock>
    where
        Q: TryInto<Quantity, Error = EngineError>,
    {
        let quantity = quantity.try_into()?;
        let mut stock = InventoryStock::new(inventory_id, location_id);
        stock.quantity = quantity;

        let saved = self.insert_stock(stock, true).await?;
        self.notify_created(&saved);
        Ok(saved)
    }

    async fn insert_stock(
        &self,
        stock: InventoryStock,
        precheck: bool,
    ) -> ResultEngine<InventoryStock> {
        let (inventory_id, location_id) = (stock.inventory_id, stock.location_id);
        with_tx!(self, |db_tx| {
            self.require_inventory(&db_tx, inventory_id).await?;
            self.require_location(&db_tx, location_id).await?;
            if precheck
                && self
                    .find_stock_on_location(&db_tx, inventory_id, location_id)
                    .await?
                    .is_some()
            {
                return Err(already_exists(inventory_id, location_id));
            }

            let active: inventory_stocks::ActiveModel = (&stock).into();
            active
                .insert(&db_tx)
                .await
                .map_err(|err| {
                    map_stock_conflict(err, || already_exists(inventory_id, location_id))
                })?;

            if !stock.quantity.is_zero() {
                let movement = StockMovement::new(
                    stock.id,
                    Quantity::ZERO,
                    stock.quantity,
                    Some(FIRST_RECORD_REASON.to_string()),
                    Utc::now(),
                );
                let movement_model: stock_movements::ActiveModel = (&movement).into();
                movement_model.insert(&db_tx).await?;
            }

            Ok(stock)
        })
    }

    /// Return every stock row of an item.
    pub async fn stocks(&self, inventory_id: Uuid) -> ResultEngine<Vec<InventoryStock>> {
        with_tx!(self, |db_tx| {
            self.require_inventory(&db_tx, inventory_id).await?;
            let models = inventory_stocks::Entity::find()
                .filter(inventory_stocks::Column::InventoryId.eq(inventory_id))
                .all(&db_tx)
                .await?;
            models
                .into_iter()
                .map(InventoryStock::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Return the stock row of an item at a location.
    pub async fn stock_on_location(
        &self,
        inventory_id: Uuid,
        location_id: Uuid,
    ) -> ResultEngine<InventoryStock> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_stock_on_location(&db_tx, inventory_id, location_id)
                .await?;
            InventoryStock::try_from(model)
        })
    }

    /// Sum of the item's quantities over every location.
    pub async fn total_stock(&self, inventory_id: Uuid) -> ResultEngine<Quantity> {
        self.stocks(inventory_id)
            .await?
            .iter()
            .try_fold(Quantity::ZERO, |total, stock| {
                total.checked_add(stock.quantity)
            })
    }

    /// `true` if the item has a positive quantity somewhere.
    pub async fn is_in_stock(&self, inventory_id: Uuid) -> ResultEngine<bool> {
        Ok(!self.total_stock(inventory_id).await?.is_zero())
    }

    /// `true` if the item's total quantity covers `quantity`.
    pub async fn has_enough_stock<Q>(&self, inventory_id: Uuid, quantity: Q) -> ResultEngine<bool>
    where
        Q: TryInto<Quantity, Error = EngineError>,
    {
        let quantity = quantity.try_into()?;
        Ok(self.total_stock(inventory_id).await? >= quantity)
    }

    /// Increase the item's quantity at a location.
    pub async fn add_to_location<Q>(
        &self,
        inventory_id: Uuid,
        location_id: Uuid,
        quantity: Q,
        reason: Option<&str>,
    ) -> ResultEngine<InventoryStock>
    where
        Q: TryInto<Quantity, Error = EngineError>,
    {
        let quantity = quantity.try_into()?;
        let reason = normalize_optional_text(reason);
        let (stock, movement) = self
            .adjust_on_location(inventory_id, location_id, reason, |before| {
                before.checked_add(quantity)
            })
            .await?;
        self.notify_changed(&stock, Some(&movement));
        Ok(stock)
    }

    /// Decrease the item's quantity at a location.
    ///
    /// Fails with `NotEnoughStock` when the location holds less than
    /// `quantity`; nothing is written in that case.
    pub async fn take_from_location<Q>(
        &self,
        inventory_id: Uuid,
        location_id: Uuid,
        quantity: Q,
        reason: Option<&str>,
    ) -> ResultEngine<InventoryStock>
    where
        Q: TryInto<Quantity, Error = EngineError>,
    {
        let quantity = quantity.try_into()?;
        let reason = normalize_optional_text(reason);
        let (stock, movement) = self
            .adjust_on_location(inventory_id, location_id, reason, |before| {
                before.checked_sub(quantity).ok_or_else(|| {
                    EngineError::NotEnoughStock(format!(
                        "only {before} available, {quantity} requested"
                    ))
                })
            })
            .await?;
        self.notify_changed(&stock, Some(&movement));
        Ok(stock)
    }

    /// Set the absolute quantity of a stock row.
    pub async fn update_stock_quantity<Q>(
        &self,
        stock_id: Uuid,
        quantity: Q,
        reason: Option<&str>,
    ) -> ResultEngine<InventoryStock>
    where
        Q: TryInto<Quantity, Error = EngineError>,
    {
        let quantity = quantity.try_into()?;
        let reason = normalize_optional_text(reason);
        let (stock, movement) = with_tx!(self, |db_tx| {
            let model = self.require_stock(&db_tx, stock_id).await?;
            self.apply_quantity(&db_tx, model, quantity, reason).await
        })?;
        self.notify_changed(&stock, Some(&movement));
        Ok(stock)
    }

    /// Move the whole stock row of an item from one location to another.
    ///
    /// Fails with `KeyNotFound` for an unknown item or target location, with
    /// `StockNotFound` if `from_location` holds no stock of the item and with
    /// `StockAlreadyExists` if `to_location` already does.
    pub async fn move_stock(
        &self,
        inventory_id: Uuid,
        from_location: Uuid,
        to_location: Uuid,
    ) -> ResultEngine<InventoryStock> {
        if from_location == to_location {
            return Err(EngineError::InvalidLocation(
                "source and target location are the same".to_string(),
            ));
        }
        let stock: ResultEngine<InventoryStock> = with_tx!(self, |db_tx| {
            self.require_inventory(&db_tx, inventory_id).await?;
            let model = self
                .require_stock_on_location(&db_tx, inventory_id, from_location)
                .await?;
            self.require_location(&db_tx, to_location).await?;
            if self
                .find_stock_on_location(&db_tx, inventory_id, to_location)
                .await?
                .is_some()
            {
                return Err(already_exists(inventory_id, to_location));
            }

            let active = inventory_stocks::ActiveModel {
                id: ActiveValue::Set(model.id),
                location_id: ActiveValue::Set(to_location),
                ..Default::default()
            };
            let updated = active.update(&db_tx).await.map_err(|err| {
                map_stock_conflict(err, || already_exists(inventory_id, to_location))
            })?;
            InventoryStock::try_from(updated)
        });
        let stock = stock?;
        self.notify_changed(&stock, None);
        Ok(stock)
    }

    async fn adjust_on_location<F>(
        &self,
        inventory_id: Uuid,
        location_id: Uuid,
        reason: Option<String>,
        next: F,
    ) -> ResultEngine<(InventoryStock, StockMovement)>
    where
        F: FnOnce(Quantity) -> ResultEngine<Quantity>,
    {
        with_tx!(self, |db_tx| {
            let model = self
                .require_stock_on_location(&db_tx, inventory_id, location_id)
                .await?;
            let before = Quantity::from_stored(model.quantity, "quantity")?;
            let after = next(before)?;
            self.apply_quantity(&db_tx, model, after, reason).await
        })
    }
}
