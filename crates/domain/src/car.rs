//! Vehicle records.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::identifiers::Identifiable;

/// Vehicle stored in the `cars` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarEntity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub active: bool,
    pub first_registration_date: NaiveDateTime,
    pub created: NaiveDateTime,
}

impl CarEntity {
    /// Create an unsaved car
    pub fn new(active: bool, first_registration_date: NaiveDateTime, created: NaiveDateTime) -> Self {
        Self {
            id: None,
            active,
            first_registration_date,
            created,
        }
    }

    /// Create a car with a known identifier
    pub fn with_id(
        id: i64,
        active: bool,
        first_registration_date: NaiveDateTime,
        created: NaiveDateTime,
    ) -> Self {
        Self {
            id: Some(id),
            active,
            first_registration_date,
            created,
        }
    }

    /// Whether the car was first registered at or after `date`
    pub fn registered_since(&self, date: NaiveDateTime) -> bool {
        self.first_registration_date >= date
    }
}

impl Identifiable for CarEntity {
    type Id = i64;

    const ENTITY_NAME: &'static str = "CarEntity";
    const ID_FIELD: &'static str = "id";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}

impl fmt::Display for CarEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "CarEntity#{id}")?,
            None => write!(f, "CarEntity#new")?,
        }
        write!(
            f,
            " (active={}, first_registration_date={}, created={})",
            self.active, self.first_registration_date, self.created
        )
    }
}
