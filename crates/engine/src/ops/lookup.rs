use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, categories, inventories, inventory_stocks, locations, metrics,
};

use super::Engine;

/// Generates `find_*` and `require_*` lookups by primary key for an entity.
macro_rules! impl_lookup_by_id {
    ($find_fn:ident, $require_fn:ident, $module:ident, $err_msg:literal) => {
        pub(super) async fn $find_fn(
            &self,
            db: &DatabaseTransaction,
            id: Uuid,
        ) -> ResultEngine<Option<$module::Model>> {
            $module::Entity::find_by_id(id)
                .one(db)
                .await
                .map_err(Into::into)
        }

        pub(super) async fn $require_fn(
            &self,
            db: &DatabaseTransaction,
            id: Uuid,
        ) -> ResultEngine<$module::Model> {
            self.$find_fn(db, id)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound($err_msg.to_string()))
        }
    };
}

impl Engine {
    impl_lookup_by_id!(find_metric, require_metric, metrics, "metric not exists");

    impl_lookup_by_id!(
        find_category,
        require_category,
        categories,
        "category not exists"
    );

    impl_lookup_by_id!(
        find_location,
        require_location,
        locations,
        "location not exists"
    );

    impl_lookup_by_id!(
        find_inventory,
        require_inventory,
        inventories,
        "inventory not exists"
    );

    /// Return the stock row for an `(inventory, location)` pair, if any.
    pub(super) async fn find_stock_on_location(
        &self,
        db: &DatabaseTransaction,
        inventory_id: Uuid,
        location_id: Uuid,
    ) -> ResultEngine<Option<inventory_stocks::Model>> {
        inventory_stocks::Entity::find()
            .filter(inventory_stocks::Column::InventoryId.eq(inventory_id))
            .filter(inventory_stocks::Column::LocationId.eq(location_id))
            .one(db)
            .await
            .map_err(Into::into)
    }

    pub(super) async fn require_stock_on_location(
        &self,
        db: &DatabaseTransaction,
        inventory_id: Uuid,
        location_id: Uuid,
    ) -> ResultEngine<inventory_stocks::Model> {
        self.find_stock_on_location(db, inventory_id, location_id)
            .await?
            .ok_or_else(|| {
                EngineError::StockNotFound(format!(
                    "no stock of item {inventory_id} at location {location_id}"
                ))
            })
    }

    pub(super) async fn require_stock(
        &self,
        db: &DatabaseTransaction,
        stock_id: Uuid,
    ) -> ResultEngine<inventory_stocks::Model> {
        inventory_stocks::Entity::find_by_id(stock_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::StockNotFound(format!("no stock with id {stock_id}")))
    }
}
