use sea_orm::{ActiveValue, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{Category, ResultEngine, categories, util::normalize_required_name};

use super::{Engine, with_tx};

impl Engine {
    /// Add a new category.
    pub async fn create_category(&self, name: &str) -> ResultEngine<Category> {
        let name = normalize_required_name(name, "category")?;
        let category = Category {
            id: Uuid::new_v4(),
            name,
        };
        with_tx!(self, |db_tx| {
            let active = categories::ActiveModel {
                id: ActiveValue::Set(category.id),
                name: ActiveValue::Set(category.name.clone()),
            };
            active.insert(&db_tx).await?;
            Ok(category)
        })
    }

    pub async fn category(&self, category_id: Uuid) -> ResultEngine<Category> {
        with_tx!(self, |db_tx| {
            let model = self.require_category(&db_tx, category_id).await?;
            Ok(Category::from(model))
        })
    }

    pub async fn categories(&self) -> ResultEngine<Vec<Category>> {
        let models = categories::Entity::find()
            .order_by_asc(categories::Column::Name)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Category::from).collect())
    }

    /// Renames an existing category.
    pub async fn rename_category(&self, category_id: Uuid, name: &str) -> ResultEngine<Category> {
        let name = normalize_required_name(name, "category")?;
        with_tx!(self, |db_tx| {
            self.require_category(&db_tx, category_id).await?;
            let active = categories::ActiveModel {
                id: ActiveValue::Set(category_id),
                name: ActiveValue::Set(name),
            };
            let model = active.update(&db_tx).await?;
            Ok(Category::from(model))
        })
    }

    /// Delete a category. Items keep their (now dangling) `category_id`.
    pub async fn delete_category(&self, category_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_category(&db_tx, category_id).await?;
            categories::Entity::delete_by_id(category_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
