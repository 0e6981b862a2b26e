//! Repository implementations for data persistence.
//!
//! [`BasicCrud`] is the typed CRUD contract shared by every entity;
//! [`PgRepository`] implements it once for any [`PersistentEntity`].
//! Entity families add their own finders through extension traits
//! ([`TestEntityDao`], [`CarDao`]) implemented on `PgRepository<Entity>`.

mod car_repository;
mod factory;
mod generic;
mod test_entity_repository;

pub use car_repository::*;
pub use factory::*;
pub use generic::*;
pub use test_entity_repository::*;

use async_trait::async_trait;
use pgcrud_domain::{EntityKey, Identifiable, IdentifierDescriptor};
use sqlx::postgres::PgRow;
use std::fmt::Debug;

use crate::native::{EntityFieldMapper, NativeParams, NativeRow, SqlValue};
use crate::{Error, Result};

/// Rows per statement in bulk save and delete.
pub const DEFAULT_BATCH_SIZE: usize = 20;

/// An entity stored in one table with a generated identifier column.
pub trait PersistentEntity: Identifiable + Clone + Debug + Send + Sync + Unpin + 'static {
    /// Table holding the entity
    const TABLE: &'static str;

    /// Non-key columns, in the order of [`PersistentEntity::column_values`]
    const COLUMNS: &'static [&'static str];

    /// Build the entity from a row selected with [`EntityQueries`].
    fn from_row(row: &PgRow) -> Result<Self>;

    /// Values of [`PersistentEntity::COLUMNS`] as they are written.
    fn column_values(&self) -> Vec<SqlValue>;

    /// Whether [`PersistentEntity::from_native_row`] is implemented
    const NATIVE_MAPPING: bool = false;

    /// Build the entity from a native query row.
    ///
    /// Entities without a native mapping keep this default.
    fn from_native_row(_fields: &NativeRow) -> Result<Self> {
        Err(Error::native_select_not_implemented())
    }
}

/// Typed CRUD contract of a repository.
#[async_trait]
pub trait BasicCrud<T: PersistentEntity>: Send + Sync {
    /// All entities, ordered by identifier.
    async fn find_all(&self) -> Result<Vec<T>>;

    /// The entity with `id`, if any.
    async fn find_by_id(&self, id: T::Id) -> Result<Option<T>>;

    /// Entities whose identifier is in `ids`, ordered by identifier.
    async fn find_by_ids(&self, ids: &[T::Id]) -> Result<Vec<T>>;

    /// Persist one entity and return it with its generated identifier.
    async fn save(&self, entity: T) -> Result<T>;

    /// Persist `entities` in one transaction, returning them in input order.
    async fn save_all(&self, entities: Vec<T>) -> Result<Vec<T>>;

    /// Remove the entity's row; true iff exactly one row went away.
    async fn delete(&self, entity: &T) -> Result<bool>;

    /// Remove every row in `ids`; true iff all of them existed.
    async fn delete_by_ids(&self, ids: &[T::Id]) -> Result<bool>;

    /// Remove the rows of `entities` in batches.
    async fn delete_all(&self, entities: &[T]) -> Result<bool>;

    /// Run a native select and map each row with `mapper`, or with
    /// [`PersistentEntity::from_native_row`] when none is given.
    async fn execute_select_query(
        &self,
        sql: &str,
        params: &NativeParams,
        mapper: Option<&dyn EntityFieldMapper<T>>,
    ) -> Result<Vec<T>>;

    /// Run a native statement; true iff it touched at least one row.
    async fn execute_update_query(&self, sql: &str, params: &NativeParams) -> Result<bool>;
}

/// Query strings of one entity type, built once from its identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityQueries {
    descriptor: IdentifierDescriptor,
    table: &'static str,
    columns: &'static [&'static str],
    select_list: String,
    select_all: String,
    select_by_id: String,
    select_by_ids: String,
    delete_by_id: String,
    delete_by_ids: String,
}

impl EntityQueries {
    pub fn for_entity<T: PersistentEntity>() -> Self {
        let descriptor = IdentifierDescriptor::of::<T>();
        let key = descriptor.field;
        let table = T::TABLE;

        let select_list = std::iter::once(key)
            .chain(T::COLUMNS.iter().copied())
            .collect::<Vec<_>>()
            .join(", ");
        let select = format!("SELECT {select_list} FROM {table}");

        Self {
            descriptor,
            table,
            columns: T::COLUMNS,
            select_all: format!("{select} ORDER BY {key}"),
            select_by_id: format!("{select} WHERE {key} = $1"),
            select_by_ids: format!("{select} WHERE {key} = ANY($1) ORDER BY {key}"),
            delete_by_id: format!("DELETE FROM {table} WHERE {key} = $1"),
            delete_by_ids: format!("DELETE FROM {table} WHERE {key} = ANY($1)"),
            select_list,
        }
    }

    pub fn descriptor(&self) -> IdentifierDescriptor {
        self.descriptor
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    pub fn select_all(&self) -> &str {
        &self.select_all
    }

    pub fn select_by_id(&self) -> &str {
        &self.select_by_id
    }

    pub fn select_by_ids(&self) -> &str {
        &self.select_by_ids
    }

    pub fn delete_by_id(&self) -> &str {
        &self.delete_by_id
    }

    pub fn delete_by_ids(&self) -> &str {
        &self.delete_by_ids
    }

    /// Select of the full column list filtered by `condition`, ordered by identifier.
    pub fn select_where(&self, condition: &str) -> String {
        format!(
            "SELECT {} FROM {} WHERE {} ORDER BY {}",
            self.select_list, self.table, condition, self.descriptor.field
        )
    }

    /// Multi-row insert of `rows` entities returning the full column list.
    pub fn insert_returning_row(&self, rows: usize) -> String {
        format!("{} RETURNING {}", self.insert_prefix(rows), self.select_list)
    }

    /// Multi-row insert of `rows` entities returning the generated keys widened to BIGINT.
    pub fn insert_returning_key(&self, rows: usize) -> String {
        format!(
            "{} RETURNING {}::BIGINT",
            self.insert_prefix(rows),
            self.descriptor.field
        )
    }

    fn insert_prefix(&self, rows: usize) -> String {
        let width = self.columns.len();
        let values = (0..rows)
            .map(|row| {
                let placeholders = (1..=width)
                    .map(|col| format!("${}", row * width + col))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("({placeholders})")
            })
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "INSERT INTO {} ({}) VALUES {}",
            self.table,
            self.columns.join(", "),
            values
        )
    }
}

/// Widen identifiers for binding, dropping duplicates.
pub(crate) fn distinct_keys<K: EntityKey>(ids: &[K]) -> Vec<i64> {
    let mut keys: Vec<i64> = ids.iter().map(|id| id.to_i64()).collect();
    keys.sort_unstable();
    keys.dedup();
    keys
}
