//! Output formatters

use anyhow::Result;
use serde::Serialize;

/// JSON formatter
pub struct JsonFormatter;

impl JsonFormatter {
    /// Format a value as pretty JSON
    pub fn format<T: Serialize + ?Sized>(value: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pgcrud_domain::TestEntity;

    #[test]
    fn test_unsaved_entity_omits_key() {
        let created = pgcrud_common::now();
        let json = JsonFormatter::format(&TestEntity::new(false, created)).unwrap();
        assert!(!json.contains("entity_id"));
        assert!(json.contains("\"active\": false"));
    }
}
