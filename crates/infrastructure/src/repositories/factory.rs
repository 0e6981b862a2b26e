//! Repository factory.

use pgcrud_common::config::RepositoryConfig;
use pgcrud_domain::{CarEntity, TestEntity};
use sqlx::PgPool;
use std::sync::Arc;

use super::{CarDao, PersistentEntity, PgRepository, TestEntityDao, DEFAULT_BATCH_SIZE};
use crate::template::TransactionTemplate;

/// Hands out repositories sharing one pool and one set of settings.
#[derive(Debug, Clone)]
pub struct RepositoryFactory {
    template: TransactionTemplate,
    batch_size: usize,
}

impl RepositoryFactory {
    pub fn new(pool: PgPool) -> Self {
        Self {
            template: TransactionTemplate::new(pool),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Factory honouring the configured batch size and failure policy.
    pub fn from_config(pool: PgPool, config: &RepositoryConfig) -> Self {
        Self {
            template: TransactionTemplate::with_policy(pool, config.failure_policy),
            batch_size: config.batch_size,
        }
    }

    /// Generic repository for any persistent entity.
    pub fn repository<T: PersistentEntity>(&self) -> PgRepository<T> {
        PgRepository::with_settings(self.template.clone(), self.batch_size)
    }

    pub fn test_entity_repository(&self) -> Arc<dyn TestEntityDao> {
        Arc::new(self.repository::<TestEntity>())
    }

    pub fn car_repository(&self) -> Arc<dyn CarDao> {
        Arc::new(self.repository::<CarEntity>())
    }
}
