//! pgcrud demo
//!
//! Connects to PostgreSQL, brings the schema up to date and walks through the
//! repository operations, printing every result.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use pgcrud_cli::demo::{self, DemoOptions};
use pgcrud_cli::output::{colors, OutputFormat, TableFormatter};
use pgcrud_common::config::{AppConfig, DEFAULT_SOURCE};
use pgcrud_common::telemetry;
use pgcrud_infrastructure::{DatabaseConfig, DatabasePool, HealthStatus, RepositoryFactory};

#[derive(Parser, Debug)]
#[command(name = "pgcrud-demo")]
#[command(author, version, about = "Typed repository demo over PostgreSQL")]
struct Cli {
    /// Database URL (overrides config)
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Configuration file (defaults to config/default)
    #[arg(short, long)]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Additionally save this many random test entities in one batch
    #[arg(long, value_name = "N")]
    batch: Option<usize>,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "table")]
    format: OutputFormat,
}

/// Development settings stand in only when no configuration file exists at all.
fn may_fall_back(cli: &Cli, default_source: &str) -> bool {
    cli.config.is_none() && !AppConfig::source_exists(default_source)
}

fn load_config(cli: &Cli) -> Result<(AppConfig, Option<anyhow::Error>)> {
    let (mut config, fallback) = match AppConfig::load_from(cli.config.as_deref()) {
        Ok(config) => (config, None),
        Err(e) if may_fall_back(cli, DEFAULT_SOURCE) => (AppConfig::development(), Some(e)),
        Err(e) => return Err(e),
    };

    if let Some(url) = &cli.database_url {
        config.database.url = url.clone();
    }
    if let Some(level) = &cli.log_level {
        config.telemetry.log_level = level.clone();
    }
    if cli.json_logs {
        config.telemetry.json_logging = true;
    }

    config.validate()?;
    Ok((config, fallback))
}

fn health_table(health: &HealthStatus) -> String {
    TableFormatter::key_value(vec![
        ("healthy", health.healthy.to_string()),
        ("latency", format!("{} ms", health.latency.as_millis())),
        (
            "schema version",
            health
                .schema_version
                .map_or_else(|| "none".to_string(), |version| version.to_string()),
        ),
        ("connections", format!("{} ({} idle)", health.pool.size, health.pool.idle)),
    ])
}

async fn run(cli: Cli) -> Result<()> {
    let (config, fallback) = load_config(&cli)?;
    telemetry::init_from_config(&config.telemetry)?;
    if let Some(e) = fallback {
        warn!(error = %format!("{e:#}"), "No configuration file found, using development settings");
    }

    let pool = DatabasePool::connect(&DatabaseConfig::from(&config.database))
        .await
        .context("Failed to connect to database")?;

    let health = pool.health_check().await;
    info!(healthy = health.healthy, schema_version = ?health.schema_version, "Connected");
    println!("{}", colors::bold("Database"));
    println!("{}\n", health_table(&health));
    if let Some(error) = &health.error {
        pool.close().await;
        anyhow::bail!("Database health check failed: {error}");
    }

    let factory = RepositoryFactory::from_config(pool.pool().clone(), &config.repository);
    let options = DemoOptions {
        batch: cli.batch,
        format: cli.format,
    };

    let outcome = demo::run(
        &*factory.test_entity_repository(),
        &*factory.car_repository(),
        &options,
    )
    .await;
    pool.close().await;

    for section in outcome?.sections {
        println!("{}", colors::bold(&section.title));
        println!("{}\n", section.body);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", colors::error("Error:"), e);
        std::process::exit(1);
    }

    Ok(())
}
