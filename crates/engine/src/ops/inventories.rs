use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Category, Inventory, Metric, NewInventory, ResultEngine, inventories, inventory_stocks,
    stock_movements,
    util::{normalize_required_name, normalize_text},
};

use super::{Engine, with_tx};

impl Engine {
    /// Add a new inventory item.
    ///
    /// `metric_id` and `category_id` are stored as given: they are not
    /// checked for existence.
    pub async fn create_inventory(&self, input: NewInventory) -> ResultEngine<Inventory> {
        let name = normalize_required_name(&input.name, "inventory")?;
        let description = normalize_text(&input.description);
        let inventory = Inventory::new(NewInventory {
            name,
            description,
            ..input
        });
        with_tx!(self, |db_tx| {
            let active: inventories::ActiveModel = (&inventory).into();
            active.insert(&db_tx).await?;
            Ok(inventory)
        })
    }

    /// Return an inventory item snapshot from DB.
    pub async fn inventory(&self, inventory_id: Uuid) -> ResultEngine<Inventory> {
        with_tx!(self, |db_tx| {
            let model = self.require_inventory(&db_tx, inventory_id).await?;
            Ok(Inventory::from(model))
        })
    }

    pub async fn inventories(&self) -> ResultEngine<Vec<Inventory>> {
        let models = inventories::Entity::find()
            .order_by_asc(inventories::Column::Name)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Inventory::from).collect())
    }

    /// Change name and description of an item.
    pub async fn rename_inventory(
        &self,
        inventory_id: Uuid,
        name: &str,
        description: &str,
    ) -> ResultEngine<Inventory> {
        let name = normalize_required_name(name, "inventory")?;
        let description = normalize_text(description);
        with_tx!(self, |db_tx| {
            self.require_inventory(&db_tx, inventory_id).await?;
            let active = inventories::ActiveModel {
                id: ActiveValue::Set(inventory_id),
                name: ActiveValue::Set(name),
                description: ActiveValue::Set(description),
                ..Default::default()
            };
            let model = active.update(&db_tx).await?;
            Ok(Inventory::from(model))
        })
    }

    /// Point an item at another metric, or clear it with `None`.
    pub async fn set_inventory_metric(
        &self,
        inventory_id: Uuid,
        metric_id: Option<Uuid>,
    ) -> ResultEngine<Inventory> {
        with_tx!(self, |db_tx| {
            self.require_inventory(&db_tx, inventory_id).await?;
            let active = inventories::ActiveModel {
                id: ActiveValue::Set(inventory_id),
                metric_id: ActiveValue::Set(metric_id),
                ..Default::default()
            };
            let model = active.update(&db_tx).await?;
            Ok(Inventory::from(model))
        })
    }

    /// Point an item at another category, or clear it with `None`.
    pub async fn set_inventory_category(
        &self,
        inventory_id: Uuid,
        category_id: Option<Uuid>,
    ) -> ResultEngine<Inventory> {
        with_tx!(self, |db_tx| {
            self.require_inventory(&db_tx, inventory_id).await?;
            let active = inventories::ActiveModel {
                id: ActiveValue::Set(inventory_id),
                category_id: ActiveValue::Set(category_id),
                ..Default::default()
            };
            let model = active.update(&db_tx).await?;
            Ok(Inventory::from(model))
        })
    }

    /// Delete an item together with its stock rows and their movements.
    pub async fn delete_inventory(&self, inventory_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_inventory(&db_tx, inventory_id).await?;

            let stock_ids: Vec<Uuid> = inventory_stocks::Entity::find()
                .filter(inventory_stocks::Column::InventoryId.eq(inventory_id))
                .all(&db_tx)
                .await?
                .into_iter()
                .map(|model| model.id)
                .collect();

            if !stock_ids.is_empty() {
                stock_movements::Entity::delete_many()
                    .filter(stock_movements::Column::StockId.is_in(stock_ids))
                    .exec(&db_tx)
                    .await?;
            }
            inventory_stocks::Entity::delete_many()
                .filter(inventory_stocks::Column::InventoryId.eq(inventory_id))
                .exec(&db_tx)
                .await?;
            inventories::Entity::delete_by_id(inventory_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Resolve the item's metric reference.
    ///
    /// Returns `None` when no metric is set or the referenced metric no
    /// longer exists.
    pub async fn inventory_metric(&self, inventory_id: Uuid) -> ResultEngine<Option<Metric>> {
        with_tx!(self, |db_tx| {
            let item = self.require_inventory(&db_tx, inventory_id).await?;
            let metric = match item.metric_id {
                Some(metric_id) => self.find_metric(&db_tx, metric_id).await?,
                None => None,
            };
            Ok(metric.map(Metric::from))
        })
    }

    /// Resolve the item's category reference, see [`Engine::inventory_metric`].
    pub async fn inventory_category(&self, inventory_id: Uuid) -> ResultEngine<Option<Category>> {
        with_tx!(self, |db_tx| {
            let item = self.require_inventory(&db_tx, inventory_id).await?;
            let category = match item.category_id {
                Some(category_id) => self.find_category(&db_tx, category_id).await?,
                None => None,
            };
            Ok(category.map(Category::from))
        })
    }

    /// `true` iff the item references a metric that currently exists.
    pub async fn has_metric(&self, inventory_id: Uuid) -> ResultEngine<bool> {
        Ok(self.inventory_metric(inventory_id).await?.is_some())
    }

    /// `true` iff the item references a category that currently exists.
    pub async fn has_category(&self, inventory_id: Uuid) -> ResultEngine<bool> {
        Ok(self.inventory_category(inventory_id).await?.is_some())
    }

    /// Symbol of the item's metric, e.g. `"L"`.
    pub async fn metric_symbol(&self, inventory_id: Uuid) -> ResultEngine<Option<String>> {
        Ok(self
            .inventory_metric(inventory_id)
            .await?
            .map(|metric| metric.symbol))
    }
}
