//! Generic flagged and timestamped record.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::identifiers::Identifiable;

/// Record stored in the `test_bean` table.
///
/// Its key column is `entity_id` rather than `id`, which exercises the
/// repositories' identifier lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestEntity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<i32>,
    pub active: bool,
    pub created: NaiveDateTime,
}

impl TestEntity {
    /// Create an unsaved entity
    pub fn new(active: bool, created: NaiveDateTime) -> Self {
        Self {
            entity_id: None,
            active,
            created,
        }
    }

    /// Create an entity with a known identifier
    pub fn with_id(entity_id: i32, active: bool, created: NaiveDateTime) -> Self {
        Self {
            entity_id: Some(entity_id),
            active,
            created,
        }
    }
}

impl Identifiable for TestEntity {
    type Id = i32;

    const ENTITY_NAME: &'static str = "TestEntity";
    const ID_FIELD: &'static str = "entity_id";

    fn id(&self) -> Option<i32> {
        self.entity_id
    }

    fn set_id(&mut self, id: i32) {
        self.entity_id = Some(id);
    }
}

impl fmt::Display for TestEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.entity_id {
            Some(id) => write!(f, "TestEntity#{id}")?,
            None => write!(f, "TestEntity#new")?,
        }
        write!(f, " (active={}, created={})", self.active, self.created)
    }
}
