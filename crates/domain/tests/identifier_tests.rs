//! Tests for identifier handling across entity types

use chrono::{NaiveDate, NaiveDateTime};
use pgcrud_domain::{CarEntity, EntityKey, Identifiable, IdentifierDescriptor, TestEntity};
use proptest::prelude::*;

fn timestamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 4, 5)
        .unwrap()
        .and_hms_micro_opt(6, 7, 8, 9)
        .unwrap()
}

// ============================================================================
// Descriptor Tests
// ============================================================================

#[test]
fn test_entity_reports_entity_id_as_identifier() {
    let descriptor = IdentifierDescriptor::of::<TestEntity>();

    assert_eq!(descriptor.field, "entity_id");
    assert_eq!(descriptor.key_type, "i32");
}

#[test]
fn test_descriptors_differ_between_entity_families() {
    assert_ne!(
        IdentifierDescriptor::of::<TestEntity>(),
        IdentifierDescriptor::of::<CarEntity>()
    );
}

// ============================================================================
// Identity Lifecycle Tests
// ============================================================================

#[test]
fn test_new_entities_have_no_identifier() {
    let entity = TestEntity::new(false, timestamp());
    let car = CarEntity::new(true, timestamp(), timestamp());

    assert!(entity.is_new());
    assert!(car.is_new());
    assert_eq!(entity.identifier(), ("entity_id", None));
}

#[test]
fn test_set_id_marks_entity_persisted() {
    let mut entity = TestEntity::new(false, timestamp());
    entity.set_id(12);

    assert!(!entity.is_new());
    assert_eq!(entity.id(), Some(12));
    assert_eq!(entity, TestEntity::with_id(12, false, timestamp()));
}

proptest! {
    #[test]
    fn prop_i32_keys_survive_widening(key in any::<i32>()) {
        prop_assert_eq!(i32::try_from_i64(key.to_i64()), Ok(key));
    }

    #[test]
    fn prop_out_of_range_keys_are_rejected(raw in (i64::from(i32::MAX) + 1)..i64::MAX) {
        prop_assert!(i32::try_from_i64(raw).is_err());
    }
}
