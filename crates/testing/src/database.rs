//! Test database setup.
//!
//! Connects to the PostgreSQL instance named by `DATABASE_URL`, applies the
//! schema and empties the entity tables between tests.

use anyhow::Context;
use pgcrud_infrastructure::{DatabaseConfig, DatabasePool, RepositoryFactory};
use sqlx::PgPool;

/// Test database wrapper
pub struct TestDatabase {
    pool: DatabasePool,
}

impl TestDatabase {
    /// Connect using `DATABASE_URL`, migrate and clean.
    pub async fn from_env() -> anyhow::Result<Self> {
        let url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set for database tests")?;
        Self::new_with_url(&url).await
    }

    /// Connect to `connection_string`, migrate and clean.
    pub async fn new_with_url(connection_string: &str) -> anyhow::Result<Self> {
        let config = DatabaseConfig::test_config(connection_string.to_string());
        let pool = DatabasePool::new(&config)
            .await
            .context("Failed to connect to test database")?;
        pool.migrate().await.context("Failed to migrate test database")?;

        let database = Self { pool };
        database.clean().await?;
        Ok(database)
    }

    /// Get a reference to the database pool
    pub fn pool(&self) -> &PgPool {
        self.pool.pool()
    }

    pub fn database_pool(&self) -> &DatabasePool {
        &self.pool
    }

    /// Factory over this database with default settings.
    pub fn factory(&self) -> RepositoryFactory {
        RepositoryFactory::new(self.pool().clone())
    }

    /// Empty every entity table and reset the identity sequences.
    pub async fn clean(&self) -> anyhow::Result<()> {
        sqlx::query("TRUNCATE TABLE test_bean, cars RESTART IDENTITY")
            .execute(self.pool())
            .await
            .context("Failed to truncate entity tables")?;
        Ok(())
    }
}
