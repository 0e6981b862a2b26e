//! Common utilities shared by the pgcrud crates.
//!
//! This crate provides:
//! - Configuration management
//! - Telemetry (structured logging setup)
//! - The date-time column converter used by entity mappings

pub mod config;
pub mod datetime;
pub mod telemetry;

// Re-export commonly used types
pub use config::{
    AppConfig, DatabaseConfig, FailurePolicy, RepositoryConfig, SchemaAction, TelemetryConfig,
};
pub use datetime::{now, ConversionError, DateTimeConverter};
pub use telemetry::init_tracing;

/// Common error type used throughout the crate
pub type Result<T> = std::result::Result<T, anyhow::Error>;
