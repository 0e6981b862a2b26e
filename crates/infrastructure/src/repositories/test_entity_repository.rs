//! Test entity repository.

use async_trait::async_trait;
use pgcrud_common::DateTimeConverter;
use pgcrud_domain::TestEntity;
use sqlx::{postgres::PgRow, Row};
use tracing::instrument;

use super::{BasicCrud, PersistentEntity, PgRepository};
use crate::native::SqlValue;
use crate::Result;

impl PersistentEntity for TestEntity {
    const TABLE: &'static str = "test_bean";
    const COLUMNS: &'static [&'static str] = &["active", "created"];

    fn from_row(row: &PgRow) -> Result<Self> {
        let created: String = row.try_get("created")?;
        Ok(Self {
            entity_id: Some(row.try_get("entity_id")?),
            active: row.try_get("active")?,
            created: DateTimeConverter.to_entity_attribute(&created)?,
        })
    }

    fn column_values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Bool(self.active),
            SqlValue::column_timestamp(&self.created),
        ]
    }
}

/// Repository operations for [`TestEntity`].
#[async_trait]
pub trait TestEntityDao: BasicCrud<TestEntity> {
    /// Entities with the given `active` flag, ordered by identifier.
    async fn find_by_active(&self, active: bool) -> Result<Vec<TestEntity>>;
}

/// PostgreSQL test entity repository.
pub type PgTestEntityRepository = PgRepository<TestEntity>;

#[async_trait]
impl TestEntityDao for PgRepository<TestEntity> {
    #[instrument(skip(self))]
    async fn find_by_active(&self, active: bool) -> Result<Vec<TestEntity>> {
        self.find_where("find_by_active", "active = $1", vec![SqlValue::Bool(active)])
            .await
    }
}
