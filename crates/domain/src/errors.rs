//! Error types for the pgcrud domain.

/// Result alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Errors raised by domain types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// A stored key does not fit the entity's key type
    #[error("Key {value} is out of range for {key_type}")]
    KeyOutOfRange {
        /// The raw key value
        value: i64,
        /// Name of the target key type
        key_type: &'static str,
    },

    /// An operation required a persisted entity but the identifier is unset
    #[error("{entity} has no identifier")]
    MissingIdentifier {
        /// Entity name
        entity: &'static str,
    },
}

impl DomainError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::KeyOutOfRange { .. } => "KEY_OUT_OF_RANGE",
            Self::MissingIdentifier { .. } => "MISSING_IDENTIFIER",
        }
    }
}
