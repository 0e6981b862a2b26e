//! Configuration management for the application.
//!
//! Settings are loaded from configuration files and environment variables.
//!
//! ## Example Configuration
//!
//! ```toml
//! [database]
//! url = "postgres://localhost:5432/local-hib"
//! username = "postgres"
//! password = "postgres"
//! dialect = "postgres"
//! show_sql = true
//! schema_action = "update"
//!
//! [repository]
//! batch_size = 20
//! failure_policy = "rollback"
//!
//! [telemetry]
//! log_level = "debug"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration file read when no explicit path is given
pub const DEFAULT_SOURCE: &str = "config/default";

const SOURCE_EXTENSIONS: [&str; 7] = ["toml", "json", "yaml", "yml", "ini", "ron", "json5"];

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub repository: RepositoryConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL
    pub url: String,

    /// User name, overrides the one embedded in the URL
    #[serde(default)]
    pub username: Option<String>,

    /// Password, overrides the one embedded in the URL
    #[serde(default)]
    pub password: Option<String>,

    /// SQL dialect; only PostgreSQL is supported
    #[serde(default = "default_dialect")]
    pub dialect: String,

    /// Connection pool size
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,

    /// Connection timeout in seconds
    #[serde(default = "default_db_timeout")]
    pub timeout_seconds: u64,

    /// Log every executed statement
    #[serde(default)]
    pub show_sql: bool,

    /// What to do with the schema at startup
    #[serde(default)]
    pub schema_action: SchemaAction,
}

/// Schema handling at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SchemaAction {
    /// Apply pending migrations
    #[default]
    Update,
    /// Leave the schema untouched
    None,
}

/// Repository behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Rows per statement in bulk save/delete
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Transaction outcome when a unit of work fails
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

/// What the transaction template does with a transaction whose unit of work failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Discard partial work
    #[default]
    Rollback,
    /// Persist whatever the unit managed to write before failing
    Commit,
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Service name reported in logs
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Enable JSON logging format
    #[serde(default)]
    pub json_logging: bool,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// Default value functions
fn default_dialect() -> String {
    "postgres".to_string()
}

fn default_pool_size() -> u32 {
    10
}

fn default_db_timeout() -> u64 {
    30
}

fn default_batch_size() -> usize {
    20
}

fn default_service_name() -> String {
    "pgcrud".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            json_logging: false,
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and configuration files.
    ///
    /// The configuration is loaded in the following order (later sources override earlier ones):
    /// 1. Default values
    /// 2. config/default.toml (if exists)
    /// 3. config/{environment}.toml (if exists, where environment is from APP_ENV)
    /// 4. Environment variables (prefixed with APP_)
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use pgcrud_common::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load configuration");
    /// println!("Connecting to {}", config.database.url);
    /// ```
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, reading `path` instead of `config/default` when given.
    pub fn load_from(path: Option<&str>) -> Result<Self> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name(path.unwrap_or(DEFAULT_SOURCE)).required(path.is_some()))
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Self::environment())
            .build()
            .context("Failed to build configuration")?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        app_config.validate()?;

        Ok(app_config)
    }

    /// Environment overrides, e.g. `APP_DATABASE__URL=postgres://...`
    fn environment() -> config::Environment {
        config::Environment::with_prefix("APP")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    /// Whether a file for the configuration source `name` (extension
    /// omitted, as for [`AppConfig::load_from`]) exists.
    pub fn source_exists(name: &str) -> bool {
        SOURCE_EXTENSIONS
            .iter()
            .any(|ext| Path::new(&format!("{name}.{ext}")).is_file())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.database.url.is_empty() {
            anyhow::bail!("Database URL is required");
        }

        if !matches!(self.database.dialect.as_str(), "postgres" | "postgresql") {
            anyhow::bail!(
                "Unsupported SQL dialect '{}'. Only postgres is supported",
                self.database.dialect
            );
        }

        if self.database.pool_size == 0 {
            anyhow::bail!("Database pool size must be greater than 0");
        }

        if self.database.timeout_seconds == 0 {
            anyhow::bail!("Database timeout must be greater than 0");
        }

        if self.repository.batch_size == 0 {
            anyhow::bail!("Repository batch size must be greater than 0");
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.telemetry.log_level.as_str()) {
            anyhow::bail!(
                "Invalid log level '{}'. Must be one of: {}",
                self.telemetry.log_level,
                valid_log_levels.join(", ")
            );
        }

        Ok(())
    }

    /// Create a development configuration matching a local PostgreSQL install
    pub fn development() -> Self {
        Self {
            database: DatabaseConfig {
                url: "postgres://localhost:5432/local-hib".to_string(),
                username: Some("postgres".to_string()),
                password: Some("postgres".to_string()),
                dialect: default_dialect(),
                pool_size: 5,
                timeout_seconds: 30,
                show_sql: true,
                schema_action: SchemaAction::Update,
            },
            repository: RepositoryConfig::default(),
            telemetry: TelemetryConfig {
                service_name: "pgcrud-dev".to_string(),
                json_logging: false,
                log_level: "debug".to_string(),
            },
        }
    }
}
