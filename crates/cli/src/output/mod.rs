//! Output formatting for CLI

use anyhow::Result;
use pgcrud_domain::{CarEntity, TestEntity};
use serde::{Deserialize, Serialize};

mod formatters;
mod table;

pub use formatters::JsonFormatter;
pub use table::TableFormatter;

/// Output format enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Table output (default)
    #[default]
    Table,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Table => write!(f, "table"),
        }
    }
}

/// Entities that render as one table row
pub trait TableRow {
    /// Column headers
    fn headers() -> Vec<&'static str>;

    /// Cells of this entity
    fn cells(&self) -> Vec<String>;
}

fn key_cell<K: ToString>(id: Option<K>) -> String {
    id.map_or_else(|| "-".to_string(), |id| id.to_string())
}

impl TableRow for TestEntity {
    fn headers() -> Vec<&'static str> {
        vec!["entity_id", "active", "created"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            key_cell(self.entity_id),
            self.active.to_string(),
            self.created.to_string(),
        ]
    }
}

impl TableRow for CarEntity {
    fn headers() -> Vec<&'static str> {
        vec!["id", "active", "first_registration_date", "created"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            key_cell(self.id),
            self.active.to_string(),
            self.first_registration_date.to_string(),
            self.created.to_string(),
        ]
    }
}

/// Render entities in the requested format
pub fn render<T: TableRow + Serialize>(entities: &[T], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => JsonFormatter::format(&entities),
        OutputFormat::Table => Ok(TableFormatter::entities(entities)),
    }
}

/// Color helpers
pub mod colors {
    use colored::*;

    pub fn error(s: &str) -> ColoredString {
        s.red()
    }

    pub fn bold(s: &str) -> ColoredString {
        s.bold()
    }
}
