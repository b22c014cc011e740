use sea_orm::{ActiveValue, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{Metric, ResultEngine, metrics, util::normalize_required_name};

use super::{Engine, with_tx};

impl Engine {
    /// Add a new unit of measure.
    pub async fn create_metric(&self, name: &str, symbol: &str) -> ResultEngine<Metric> {
        let name = normalize_required_name(name, "metric")?;
        let symbol = normalize_required_name(symbol, "metric symbol")?;
        let metric = Metric {
            id: Uuid::new_v4(),
            name,
            symbol,
        };
        with_tx!(self, |db_tx| {
            let active = metrics::ActiveModel {
                id: ActiveValue::Set(metric.id),
                name: ActiveValue::Set(metric.name.clone()),
                symbol: ActiveValue::Set(metric.symbol.clone()),
            };
            active.insert(&db_tx).await?;
            Ok(metric)
        })
    }

    /// Return a metric by id.
    pub async fn metric(&self, metric_id: Uuid) -> ResultEngine<Metric> {
        with_tx!(self, |db_tx| {
            let model = self.require_metric(&db_tx, metric_id).await?;
            Ok(Metric::from(model))
        })
    }

    /// Return every metric, ordered by name.
    pub async fn metrics(&self) -> ResultEngine<Vec<Metric>> {
        let models = metrics::Entity::find()
            .order_by_asc(metrics::Column::Name)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Metric::from).collect())
    }

    /// Change name and symbol of a metric.
    pub async fn update_metric(
        &self,
        metric_id: Uuid,
        name: &str,
        symbol: &str,
    ) -> ResultEngine<Metric> {
        let name = normalize_required_name(name, "metric")?;
        let symbol = normalize_required_name(symbol, "metric symbol")?;
        with_tx!(self, |db_tx| {
            self.require_metric(&db_tx, metric_id).await?;
            let active = metrics::ActiveModel {
                id: ActiveValue::Set(metric_id),
                name: ActiveValue::Set(name),
                symbol: ActiveValue::Set(symbol),
            };
            let model = active.update(&db_tx).await?;
            Ok(Metric::from(model))
        })
    }

    /// Delete a metric.
    ///
    /// Inventories referencing it are left untouched; they report
    /// `has_metric() == false` from now on.
    pub async fn delete_metric(&self, metric_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_metric(&db_tx, metric_id).await?;
            metrics::Entity::delete_by_id(metric_id).exec(&db_tx).await?;
            Ok(())
        })
    }
}
