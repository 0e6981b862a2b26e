//! Table formatting utilities

use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, *};

use super::TableRow;

/// Table formatter
pub struct TableFormatter;

impl TableFormatter {
    /// Create a new table with default styling
    pub fn new() -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_content_arrangement(ContentArrangement::Dynamic);
        table
    }

    /// One row per entity; an empty slice renders a single "no rows" line
    pub fn entities<T: TableRow>(entities: &[T]) -> String {
        let mut table = Self::new();
        table.set_header(T::headers());

        if entities.is_empty() {
            let mut empty = vec![String::new(); T::headers().len()];
            empty[0] = "(no rows)".to_string();
            table.add_row(empty);
        }
        for entity in entities {
            table.add_row(entity.cells());
        }

        table.to_string()
    }

    /// Create a key-value table
    pub fn key_value(items: Vec<(&str, String)>) -> String {
        let mut table = Self::new();

        for (key, value) in items {
            table.add_row(vec![key, &value]);
        }

        table.to_string()
    }
}
