use std::collections::HashSet;

use sea_orm::{
    ActiveValue, DatabaseTransaction, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use crate::{
    EngineError, Location, ResultEngine, inventory_stocks, locations,
    util::normalize_required_name,
};

use super::{Engine, with_tx};

impl Engine {
    /// Add a new location, optionally nested under `parent_id`.
    pub async fn create_location(
        &self,
        name: &str,
        parent_id: Option<Uuid>,
    ) -> ResultEngine<Location> {
        let name = normalize_required_name(name, "location")?;
        let location = Location {
            id: Uuid::new_v4(),
            name,
            parent_id,
        };
        with_tx!(self, |db_tx| {
            if let Some(parent_id) = parent_id {
                self.require_location(&db_tx, parent_id).await?;
            }
            let active = locations::ActiveModel {
                id: ActiveValue::Set(location.id),
                name: ActiveValue::Set(location.name.clone()),
                parent_id: ActiveValue::Set(location.parent_id),
            };
            active.insert(&db_tx).await?;
            Ok(location)
        })
    }

    pub async fn location(&self, location_id: Uuid) -> ResultEngine<Location> {
        with_tx!(self, |db_tx| {
            let model = self.require_location(&db_tx, location_id).await?;
            Ok(Location::from(model))
        })
    }

    pub async fn locations(&self) -> ResultEngine<Vec<Location>> {
        let models = locations::Entity::find()
            .order_by_asc(locations::Column::Name)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Location::from).collect())
    }

    pub async fn rename_location(&self, location_id: Uuid, name: &str) -> ResultEngine<Location> {
        let name = normalize_required_name(name, "location")?;
        with_tx!(self, |db_tx| {
            self.require_location(&db_tx, location_id).await?;
            let active = locations::ActiveModel {
                id: ActiveValue::Set(location_id),
                name: ActiveValue::Set(name),
                ..Default::default()
            };
            let model = active.update(&db_tx).await?;
            Ok(Location::from(model))
        })
    }

    /// Move a location under a new parent, or to the top level with `None`.
    ///
    /// Fails with `InvalidLocation` if `parent_id` is the location itself or
    /// one of its descendants.
    pub async fn set_location_parent(
        &self,
        location_id: Uuid,
        parent_id: Option<Uuid>,
    ) -> ResultEngine<Location> {
        with_tx!(self, |db_tx| {
            self.require_location(&db_tx, location_id).await?;
            if let Some(parent_id) = parent_id {
                if parent_id == location_id {
                    return Err(EngineError::InvalidLocation(
                        "a location cannot be its own parent".to_string(),
                    ));
                }
                self.require_location(&db_tx, parent_id).await?;
                let ancestors = self.ancestor_models(&db_tx, parent_id).await?;
                if ancestors.iter().any(|model| model.id == location_id) {
                    return Err(EngineError::InvalidLocation(format!(
                        "location {parent_id} is inside location {location_id}"
                    )));
                }
            }

            let active = locations::ActiveModel {
                id: ActiveValue::Set(location_id),
                parent_id: ActiveValue::Set(parent_id),
                ..Default::default()
            };
            let model = active.update(&db_tx).await?;
            Ok(Location::from(model))
        })
    }

    /// Return the direct children of a location.
    pub async fn location_children(&self, location_id: Uuid) -> ResultEngine<Vec<Location>> {
        with_tx!(self, |db_tx| {
            self.require_location(&db_tx, location_id).await?;
            let models = locations::Entity::find()
                .filter(locations::Column::ParentId.eq(location_id))
                .order_by_asc(locations::Column::Name)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(Location::from).collect())
        })
    }

    /// Return the chain of parents of a location, nearest first.
    pub async fn location_ancestors(&self, location_id: Uuid) -> ResultEngine<Vec<Location>> {
        with_tx!(self, |db_tx| {
            let models = self.ancestor_models(&db_tx, location_id).await?;
            Ok(models.into_iter().map(Location::from).collect())
        })
    }

    /// Delete a location.
    ///
    /// Restricted: a location that still has child locations or stock rows
    /// is reported as `LocationInUse` and left in place.
    pub async fn delete_location(&self, location_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_location(&db_tx, location_id).await?;

            let children = locations::Entity::find()
                .filter(locations::Column::ParentId.eq(location_id))
                .count(&db_tx)
                .await?;
            if children > 0 {
                return Err(EngineError::LocationInUse(format!(
                    "location {location_id} has {children} child location(s)"
                )));
            }

            let stocks = inventory_stocks::Entity::find()
                .filter(inventory_stocks::Column::LocationId.eq(location_id))
                .count(&db_tx)
                .await?;
            if stocks > 0 {
                return Err(EngineError::LocationInUse(format!(
                    "location {location_id} holds {stocks} stock row(s)"
                )));
            }

            locations::Entity::delete_by_id(location_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Walk `parent_id` links upwards from `location_id` (excluded).
    async fn ancestor_models(
        &self,
        db: &DatabaseTransaction,
        location_id: Uuid,
    ) -> ResultEngine<Vec<locations::Model>> {
        let start = self.require_location(db, location_id).await?;
        let mut seen = HashSet::from([start.id]);
        let mut ancestors = Vec::new();
        let mut next = start.parent_id;

        while let Some(parent_id) = next {
            if !seen.insert(parent_id) {
                return Err(EngineError::InvalidLocation(format!(
                    "location tree has a cycle at {parent_id}"
                )));
            }
            // A dangling parent ends the chain.
            let Some(parent) = self.find_location(db, parent_id).await? else {
                break;
            };
            next = parent.parent_id;
            ancestors.push(parent);
        }

        Ok(ancestors)
    }
}
