//! DateTime utilities.
//!
//! Entity timestamps are stored as text. [`DateTimeConverter`] maps between
//! the in-memory `NaiveDateTime` and that column representation.

use chrono::{NaiveDateTime, Timelike, Utc};

/// Column representation written by the converter.
///
/// Fixed width with microsecond precision, so text ordering matches
/// chronological ordering.
pub const COLUMN_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

const ACCEPTED_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// A stored value that could not be read back as a date-time
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Failed to convert '{value}' to a date-time")]
pub struct ConversionError {
    /// The offending column value
    pub value: String,
}

/// Converts entity timestamps to and from their column representation.
///
/// # Examples
///
/// ```
/// use pgcrud_common::datetime::DateTimeConverter;
///
/// let converter = DateTimeConverter;
/// let value = converter.to_entity_attribute("2023-12-01T12:30:45").unwrap();
/// assert_eq!(converter.to_database_column(&value), "2023-12-01 12:30:45.000000");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeConverter;

impl DateTimeConverter {
    /// Format a timestamp for storage
    pub fn to_database_column(&self, value: &NaiveDateTime) -> String {
        value.format(COLUMN_FORMAT).to_string()
    }

    /// Parse a stored timestamp
    pub fn to_entity_attribute(&self, column: &str) -> Result<NaiveDateTime, ConversionError> {
        let trimmed = column.trim();
        ACCEPTED_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
            .ok_or_else(|| ConversionError {
                value: column.to_string(),
            })
    }
}

/// Current UTC time truncated to the precision the converter stores.
pub fn now() -> NaiveDateTime {
    truncate_to_micros(Utc::now().naive_utc())
}

/// Drop sub-microsecond precision.
pub fn truncate_to_micros(value: NaiveDateTime) -> NaiveDateTime {
    let nanos = value.nanosecond();
    value.with_nanosecond(nanos - nanos % 1_000).unwrap_or(value)
}
