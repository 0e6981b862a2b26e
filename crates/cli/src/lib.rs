//! pgcrud demo library
//!
//! The demonstration flow behind the `pgcrud-demo` binary and the
//! formatting of entity lists for the terminal.

pub mod demo;
pub mod output;

pub use demo::{DemoOptions, DemoReport};
pub use output::{JsonFormatter, OutputFormat, TableFormatter};

/// Re-export common types
pub use anyhow::{Context, Result};
