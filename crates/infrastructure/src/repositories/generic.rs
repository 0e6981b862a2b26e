//! Generic PostgreSQL repository.

use async_trait::async_trait;
use pgcrud_domain::{EntityKey, Identifiable};
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use super::{distinct_keys, BasicCrud, EntityQueries, PersistentEntity, DEFAULT_BATCH_SIZE};
use crate::native::{
    bind_all, EntityFieldMapper, NativeParams, NativeRow, NativeStatement, SqlValue,
    MAX_BIND_PARAMETERS,
};
use crate::template::TransactionTemplate;
use crate::{Error, Result};

/// PostgreSQL implementation of [`BasicCrud`] for any persistent entity.
pub struct PgRepository<T> {
    template: TransactionTemplate,
    queries: Arc<EntityQueries>,
    batch_size: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T: PersistentEntity> PgRepository<T> {
    /// Repository with the default batch size, rolling back failed calls.
    pub fn new(pool: PgPool) -> Self {
        Self::with_settings(TransactionTemplate::new(pool), DEFAULT_BATCH_SIZE)
    }

    /// Rows per bulk insert are capped so one statement stays within
    /// [`MAX_BIND_PARAMETERS`].
    pub fn with_settings(template: TransactionTemplate, batch_size: usize) -> Self {
        let max_rows = MAX_BIND_PARAMETERS / T::COLUMNS.len().max(1);
        let capped = batch_size.max(1).min(max_rows);
        if capped != batch_size {
            warn!(
                entity = T::ENTITY_NAME,
                requested = batch_size,
                batch_size = capped,
                "Adjusted batch size"
            );
        }

        let queries = EntityQueries::for_entity::<T>();
        let descriptor = queries.descriptor();
        debug!(
            entity = descriptor.entity,
            id_field = descriptor.field,
            key_type = descriptor.key_type,
            "Resolved entity identifier"
        );

        Self {
            template,
            queries: Arc::new(queries),
            batch_size: capped,
            _marker: PhantomData,
        }
    }

    pub fn template(&self) -> &TransactionTemplate {
        &self.template
    }

    pub fn queries(&self) -> &EntityQueries {
        &self.queries
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Entities matching `condition`, ordered by identifier.
    ///
    /// `condition` refers to `binds` positionally (`$1`, `$2`, ...).
    pub async fn find_where(
        &self,
        operation: &'static str,
        condition: &str,
        binds: Vec<SqlValue>,
    ) -> Result<Vec<T>> {
        let sql = self.queries.select_where(condition);
        self.template
            .collection::<T, _>(operation, move |conn| {
                Box::pin(async move { bind_all(sqlx::query(&sql), &binds).fetch_all(&mut *conn).await })
            })
            .await
    }
}

impl<T> Clone for PgRepository<T> {
    fn clone(&self) -> Self {
        Self {
            template: self.template.clone(),
            queries: Arc::clone(&self.queries),
            batch_size: self.batch_size,
            _marker: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for PgRepository<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgRepository")
            .field("entity", &self.queries.descriptor().entity)
            .field("batch_size", &self.batch_size)
            .finish()
    }
}

#[async_trait]
impl<T: PersistentEntity> BasicCrud<T> for PgRepository<T> {
    #[instrument(skip(self), fields(entity = T::ENTITY_NAME))]
    async fn find_all(&self) -> Result<Vec<T>> {
        let queries = Arc::clone(&self.queries);
        let entities = self
            .template
            .collection::<T, _>("find_all", move |conn| {
                Box::pin(async move { sqlx::query(queries.select_all()).fetch_all(&mut *conn).await })
            })
            .await?;

        debug!(count = entities.len(), "Loaded all entities");
        Ok(entities)
    }

    #[instrument(skip(self), fields(entity = T::ENTITY_NAME))]
    async fn find_by_id(&self, id: T::Id) -> Result<Option<T>> {
        let queries = Arc::clone(&self.queries);
        self.template
            .single::<T, _>("find_by_id", move |conn| {
                Box::pin(async move {
                    sqlx::query(queries.select_by_id())
                        .bind(id.to_i64())
                        .fetch_optional(&mut *conn)
                        .await
                })
            })
            .await
    }

    #[instrument(skip(self), fields(entity = T::ENTITY_NAME))]
    async fn find_by_ids(&self, ids: &[T::Id]) -> Result<Vec<T>> {
        let keys = distinct_keys(ids);
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let queries = Arc::clone(&self.queries);
        self.template
            .collection::<T, _>("find_by_ids", move |conn| {
                Box::pin(async move {
                    sqlx::query(queries.select_by_ids())
                        .bind(keys)
                        .fetch_all(&mut *conn)
                        .await
                })
            })
            .await
    }

    #[instrument(skip(self, entity), fields(entity = T::ENTITY_NAME))]
    async fn save(&self, entity: T) -> Result<T> {
        if let Some(id) = entity.id() {
            warn!(%id, "Saving an entity that already has an identifier; a new row is inserted");
        }

        let queries = Arc::clone(&self.queries);
        let values = entity.column_values();
        let saved = self
            .template
            .single::<T, _>("save", move |conn| {
                Box::pin(async move {
                    bind_all(sqlx::query(&queries.insert_returning_row(1)), &values)
                        .fetch_optional(&mut *conn)
                        .await
                })
            })
            .await?
            .ok_or_else(|| Error::NotFound(format!("{} insert returned no row", T::ENTITY_NAME)))?;

        debug!(id = ?saved.id(), "Entity saved");
        Ok(saved)
    }

    #[instrument(skip(self, entities), fields(entity = T::ENTITY_NAME, count = entities.len()))]
    async fn save_all(&self, entities: Vec<T>) -> Result<Vec<T>> {
        if entities.is_empty() {
            return Ok(Vec::new());
        }

        let queries = Arc::clone(&self.queries);
        let batch_size = self.batch_size;
        let rows: Vec<Vec<SqlValue>> = entities.iter().map(PersistentEntity::column_values).collect();

        let (keys, fetched) = self
            .template
            .execute("save_all", move |conn| {
                Box::pin(async move {
                    let mut keys = Vec::with_capacity(rows.len());
                    for batch in rows.chunks(batch_size) {
                        let sql = queries.insert_returning_key(batch.len());
                        let inserted = bind_all(sqlx::query(&sql), &batch.concat())
                            .fetch_all(&mut *conn)
                            .await?;
                        for row in &inserted {
                            keys.push(row.try_get::<i64, _>(0)?);
                        }
                        debug!(batch = batch.len(), "Flushed insert batch");
                    }

                    let fetched = sqlx::query(queries.select_by_ids())
                        .bind(keys.clone())
                        .fetch_all(&mut *conn)
                        .await?;
                    Ok::<_, sqlx::Error>((keys, fetched))
                })
            })
            .await?;

        let saved = order_by_keys(TransactionTemplate::convert_all::<T>(&fetched)?, &keys);
        if saved.len() != entities.len() {
            warn!(
                requested = entities.len(),
                saved = saved.len(),
                "Batch save returned fewer entities than requested"
            );
        }

        debug!(count = saved.len(), "Entities saved");
        Ok(saved)
    }

    #[instrument(skip(self, entity), fields(entity = T::ENTITY_NAME, id = ?entity.id()))]
    async fn delete(&self, entity: &T) -> Result<bool> {
        let Some(id) = entity.id() else {
            warn!("Entity has no identifier; nothing to delete");
            return Ok(false);
        };

        let queries = Arc::clone(&self.queries);
        let removed = self
            .template
            .execute("delete", move |conn| {
                Box::pin(async move {
                    sqlx::query(queries.delete_by_id())
                        .bind(id.to_i64())
                        .execute(&mut *conn)
                        .await
                        .map(|result| result.rows_affected())
                })
            })
            .await?;

        debug!(removed, "Entity deleted");
        Ok(removed == 1)
    }

    #[instrument(skip(self), fields(entity = T::ENTITY_NAME))]
    async fn delete_by_ids(&self, ids: &[T::Id]) -> Result<bool> {
        let keys = distinct_keys(ids);
        if keys.is_empty() {
            return Ok(true);
        }

        let requested = keys.len() as u64;
        let queries = Arc::clone(&self.queries);
        let removed = self
            .template
            .execute("delete_by_ids", move |conn| {
                Box::pin(async move {
                    sqlx::query(queries.delete_by_ids())
                        .bind(keys)
                        .execute(&mut *conn)
                        .await
                        .map(|result| result.rows_affected())
                })
            })
            .await?;

        if removed != requested {
            warn!(requested, removed, "Not every requested entity was deleted");
            return Ok(false);
        }

        debug!(removed, "Entities deleted");
        Ok(true)
    }

    #[instrument(skip(self, entities), fields(entity = T::ENTITY_NAME, count = entities.len()))]
    async fn delete_all(&self, entities: &[T]) -> Result<bool> {
        let keys: Vec<i64> = entities
            .iter()
            .filter_map(|entity| entity.id().map(EntityKey::to_i64))
            .collect();
        if keys.is_empty() {
            return Ok(true);
        }

        let queries = Arc::clone(&self.queries);
        let batch_size = self.batch_size;
        let removed = self
            .template
            .execute("delete_all", move |conn| {
                Box::pin(async move {
                    let mut removed = 0;
                    for batch in keys.chunks(batch_size) {
                        removed += sqlx::query(queries.delete_by_ids())
                            .bind(batch.to_vec())
                            .execute(&mut *conn)
                            .await?
                            .rows_affected();
                    }
                    Ok::<_, sqlx::Error>(removed)
                })
            })
            .await?;

        debug!(removed, "Entities deleted");
        Ok(true)
    }

    #[instrument(skip(self, params, mapper), fields(entity = T::ENTITY_NAME))]
    async fn execute_select_query(
        &self,
        sql: &str,
        params: &NativeParams,
        mapper: Option<&dyn EntityFieldMapper<T>>,
    ) -> Result<Vec<T>> {
        if mapper.is_none() && !T::NATIVE_MAPPING {
            return Err(Error::native_select_not_implemented());
        }

        let statement = NativeStatement::prepare(sql, params)?;
        let rows = self
            .template
            .execute("execute_select_query", move |conn| {
                Box::pin(async move { statement.query().fetch_all(&mut *conn).await })
            })
            .await?;

        let entities = rows
            .iter()
            .map(|row| {
                let fields = NativeRow::from_pg_row(row)?;
                match mapper {
                    Some(mapper) => mapper.map(&fields),
                    None => T::from_native_row(&fields),
                }
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(count = entities.len(), "Native select mapped");
        Ok(entities)
    }

    #[instrument(skip(self, params), fields(entity = T::ENTITY_NAME))]
    async fn execute_update_query(&self, sql: &str, params: &NativeParams) -> Result<bool> {
        let statement = NativeStatement::prepare(sql, params)?;
        let affected = self
            .template
            .execute("execute_update_query", move |conn| {
                Box::pin(async move {
                    statement
                        .query()
                        .execute(&mut *conn)
                        .await
                        .map(|result| result.rows_affected())
                })
            })
            .await?;

        debug!(affected, "Native update executed");
        Ok(affected > 0)
    }
}

/// Arrange `entities` in the order of `keys`, dropping any without a match.
pub(crate) fn order_by_keys<T: Identifiable>(entities: Vec<T>, keys: &[i64]) -> Vec<T> {
    let mut by_key: HashMap<i64, T> = entities
        .into_iter()
        .filter_map(|entity| entity.id().map(|id| (id.to_i64(), entity)))
        .collect();

    keys.iter().filter_map(|key| by_key.remove(key)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pgcrud_domain::{CarEntity, TestEntity};

    fn created() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_order_by_keys_follows_insert_order() {
        let fetched = vec![
            TestEntity::with_id(1, true, created()),
            TestEntity::with_id(2, false, created()),
            TestEntity::with_id(3, true, created()),
        ];

        let ordered = order_by_keys(fetched, &[3, 1, 2]);
        let ids: Vec<_> = ordered.iter().filter_map(Identifiable::id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_order_by_keys_drops_missing() {
        let fetched = vec![CarEntity::with_id(10, true, created(), created())];
        let ordered = order_by_keys(fetched, &[10, 11]);
        assert_eq!(ordered.len(), 1);
    }

    #[tokio::test]
    async fn test_batch_size_is_at_least_one() {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        let repository = PgRepository::<CarEntity>::with_settings(TransactionTemplate::new(pool), 0);
        assert_eq!(repository.batch_size(), 1);
        assert_eq!(repository.queries().table(), "cars");
    }

    #[tokio::test]
    async fn test_batch_size_respects_bind_limit() {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        let template = TransactionTemplate::new(pool);

        let cars = PgRepository::<CarEntity>::with_settings(template.clone(), 25_000);
        assert_eq!(cars.batch_size(), MAX_BIND_PARAMETERS / 3);
        assert!(cars.batch_size() * CarEntity::COLUMNS.len() <= MAX_BIND_PARAMETERS);

        let entities = PgRepository::<TestEntity>::with_settings(template, 500);
        assert_eq!(entities.batch_size(), 500);
    }
}
