//! Mock implementations of the repository traits.
//!
//! [`MockCrud`] keeps entities in memory and answers the bulk delete and
//! native query calls with canned values chosen through [`MockCrudBuilder`].

use async_trait::async_trait;
use chrono::NaiveDateTime;
use parking_lot::RwLock;
use pgcrud_domain::{CarEntity, EntityKey, Identifiable, TestEntity};
use pgcrud_infrastructure::{
    BasicCrud, CarDao, EntityFieldMapper, Error, NativeParams, PersistentEntity, Result,
    TestEntityDao,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// In-memory repository for any persistent entity.
pub struct MockCrud<T: PersistentEntity> {
    entities: Arc<RwLock<BTreeMap<T::Id, T>>>,
    delete_answer: bool,
    update_answer: bool,
    select_result: Option<Vec<T>>,
}

impl<T: PersistentEntity> MockCrud<T> {
    /// Empty mock answering `false` to deletes and updates.
    pub fn new() -> Self {
        MockCrudBuilder::new().build()
    }

    pub fn builder() -> MockCrudBuilder<T> {
        MockCrudBuilder::new()
    }

    pub fn count(&self) -> usize {
        self.entities.read().len()
    }

    pub fn clear(&self) {
        self.entities.write().clear();
    }

    /// Assigns `max(id) + 1` and inserts under one write lock.
    fn store(&self, mut entity: T) -> Result<T> {
        let mut entities = self.entities.write();
        let last = entities.keys().next_back().map_or(0, |id| id.to_i64());
        let id = T::Id::try_from_i64(last + 1)?;
        entity.set_id(id);
        entities.insert(id, entity.clone());
        drop(entities);

        info!(entity = T::ENTITY_NAME, %id, "Entity was saved");
        Ok(entity)
    }

    fn matching(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        self.entities
            .read()
            .values()
            .filter(|entity| predicate(entity))
            .cloned()
            .collect()
    }
}

impl<T: PersistentEntity> Default for MockCrud<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PersistentEntity> Clone for MockCrud<T> {
    fn clone(&self) -> Self {
        Self {
            entities: Arc::clone(&self.entities),
            delete_answer: self.delete_answer,
            update_answer: self.update_answer,
            select_result: self.select_result.clone(),
        }
    }
}

#[async_trait]
impl<T: PersistentEntity> BasicCrud<T> for MockCrud<T> {
    async fn find_all(&self) -> Result<Vec<T>> {
        Ok(self.entities.read().values().cloned().collect())
    }

    async fn find_by_id(&self, id: T::Id) -> Result<Option<T>> {
        Ok(self.entities.read().get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[T::Id]) -> Result<Vec<T>> {
        let entities = self.entities.read();
        Ok(entities
            .iter()
            .filter(|(id, _)| ids.contains(id))
            .map(|(_, entity)| entity.clone())
            .collect())
    }

    async fn save(&self, entity: T) -> Result<T> {
        self.store(entity)
    }

    async fn save_all(&self, entities: Vec<T>) -> Result<Vec<T>> {
        entities.into_iter().map(|entity| self.store(entity)).collect()
    }

    async fn delete(&self, _entity: &T) -> Result<bool> {
        Ok(self.delete_answer)
    }

    async fn delete_by_ids(&self, _ids: &[T::Id]) -> Result<bool> {
        Ok(self.delete_answer)
    }

    async fn delete_all(&self, _entities: &[T]) -> Result<bool> {
        Ok(self.delete_answer)
    }

    async fn execute_select_query(
        &self,
        _sql: &str,
        _params: &NativeParams,
        _mapper: Option<&dyn EntityFieldMapper<T>>,
    ) -> Result<Vec<T>> {
        self.select_result
            .clone()
            .ok_or_else(Error::native_select_not_implemented)
    }

    async fn execute_update_query(&self, _sql: &str, _params: &NativeParams) -> Result<bool> {
        Ok(self.update_answer)
    }
}

#[async_trait]
impl TestEntityDao for MockCrud<TestEntity> {
    async fn find_by_active(&self, active: bool) -> Result<Vec<TestEntity>> {
        Ok(self.matching(|entity| entity.active == active))
    }
}

#[async_trait]
impl CarDao for MockCrud<CarEntity> {
    async fn find_all_by_first_registration_date_after(
        &self,
        date: NaiveDateTime,
    ) -> Result<Vec<CarEntity>> {
        Ok(self.matching(|car| car.registered_since(date)))
    }
}

/// Builder for [`MockCrud`].
pub struct MockCrudBuilder<T: PersistentEntity> {
    existing: BTreeMap<T::Id, T>,
    delete_answer: bool,
    update_answer: bool,
    select_result: Option<Vec<T>>,
}

impl<T: PersistentEntity> MockCrudBuilder<T> {
    pub fn new() -> Self {
        Self {
            existing: BTreeMap::new(),
            delete_answer: false,
            update_answer: false,
            select_result: None,
        }
    }

    /// Seed the mock; entities without an identifier are skipped.
    pub fn with_existing_entities(mut self, entities: impl IntoIterator<Item = T>) -> Self {
        self.existing.extend(
            entities
                .into_iter()
                .filter_map(|entity| entity.id().map(|id| (id, entity))),
        );
        self
    }

    /// Answer of `delete`, `delete_by_ids` and `delete_all`.
    pub fn with_delete_answer(mut self, answer: bool) -> Self {
        self.delete_answer = answer;
        self
    }

    /// Answer of `execute_update_query`.
    pub fn with_update_answer(mut self, answer: bool) -> Self {
        self.update_answer = answer;
        self
    }

    /// Result of `execute_select_query`. Without one the call fails as not implemented.
    pub fn with_select_result(mut self, result: Vec<T>) -> Self {
        self.select_result = Some(result);
        self
    }

    pub fn build(self) -> MockCrud<T> {
        MockCrud {
            entities: Arc::new(RwLock::new(self.existing)),
            delete_answer: self.delete_answer,
            update_answer: self.update_answer,
            select_result: self.select_result,
        }
    }
}

impl<T: PersistentEntity> Default for MockCrudBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}
