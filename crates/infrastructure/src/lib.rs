//! Infrastructure layer for pgcrud
//!
//! This crate provides:
//! - Database access (PostgreSQL with sqlx) and embedded schema migrations
//! - A transaction template wrapping every unit of work
//! - A generic typed repository plus entity-specific repositories
//! - Native parameterized SQL with caller-supplied row mapping
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pgcrud_infrastructure::{
//!     database::{DatabaseConfig, DatabasePool},
//!     repositories::{BasicCrud, RepositoryFactory, TestEntityDao},
//! };
//!
//! let config = DatabaseConfig::test_config("postgres://localhost:5432/local-hib".to_string());
//! let pool = DatabasePool::connect(&config).await?;
//!
//! let repository = RepositoryFactory::new(pool.pool().clone()).test_entity_repository();
//! let active = repository.find_by_active(true).await?;
//! ```

pub mod database;
pub mod native;
pub mod repositories;
pub mod template;

pub use database::{DatabaseConfig, DatabasePool, HealthStatus, PoolStats, TransactionExt};
pub use native::{
    EntityFieldMapper, NativeParams, NativeRow, NativeStatement, ParamValue, SqlValue,
    MAX_BIND_PARAMETERS,
};
pub use repositories::{
    BasicCrud, CarDao, EntityQueries, PersistentEntity, PgCarRepository, PgRepository,
    PgTestEntityRepository, RepositoryFactory, TestEntityDao, DEFAULT_BATCH_SIZE,
};
pub use template::TransactionTemplate;

pub use pgcrud_common::config::FailurePolicy;

pub type Result<T> = std::result::Result<T, Error>;

/// Message raised when an entity has no native row mapping.
pub const NATIVE_SELECT_NOT_IMPLEMENTED: &str =
    "In order to use native SQL select query this method has to be implemented.";

/// Infrastructure-level errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A unit of work failed inside its transaction boundary
    #[error("Storage error during {operation}: {source}")]
    Storage {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// A raw result could not be converted into the expected type
    #[error("Result object is not type of {expected}: {reason}")]
    Cast {
        expected: &'static str,
        reason: String,
    },

    /// Native row mapping was not provided for the entity
    #[error("{0}")]
    NotImplemented(String),

    /// Native query parameter of a shape that cannot be bound
    #[error("Unsupported parameter: {0}")]
    UnsupportedParameter(String),

    /// Database errors outside a unit of work (pool setup)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration errors
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Stored timestamp in an unreadable format
    #[error("Conversion error: {0}")]
    Conversion(#[from] pgcrud_common::ConversionError),

    /// Domain rule violations
    #[error("Domain error: {0}")]
    Domain(#[from] pgcrud_domain::DomainError),

    /// Resource not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl Error {
    /// Wrap a failure raised inside a unit of work
    pub fn storage(operation: &'static str, source: sqlx::Error) -> Self {
        Self::Storage { operation, source }
    }

    /// Error returned by entities without a native row mapping
    pub fn native_select_not_implemented() -> Self {
        Self::NotImplemented(NATIVE_SELECT_NOT_IMPLEMENTED.to_string())
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Storage { .. } => "STORAGE_ERROR",
            Error::Cast { .. } => "CAST_ERROR",
            Error::NotImplemented(_) => "NOT_IMPLEMENTED",
            Error::UnsupportedParameter(_) => "UNSUPPORTED_PARAMETER",
            Error::Database(_) | Error::Migration(_) => "DATABASE_ERROR",
            Error::Conversion(_) => "CONVERSION_ERROR",
            Error::Domain(_) => "DOMAIN_ERROR",
            Error::NotFound(_) => "NOT_FOUND",
            Error::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }
}
