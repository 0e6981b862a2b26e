//! Test fixtures for generating entities with realistic data.
//!
//! Persisted fixtures carry identifiers `1..=n`; the `new_*` helpers build
//! unsaved entities for save tests.

use chrono::{Duration, NaiveDateTime};
use fake::{Fake, Faker};
use pgcrud_common::now;
use pgcrud_domain::{CarEntity, TestEntity};
use std::collections::BTreeMap;

/// Random point within the last ten years, truncated to microseconds.
pub fn past_timestamp() -> NaiveDateTime {
    let days: i64 = (0..3650).fake();
    let seconds: i64 = (0..86_400).fake();
    now() - Duration::days(days) - Duration::seconds(seconds)
}

/// Unsaved car with random flag and registration date.
pub fn new_car_entity() -> CarEntity {
    CarEntity::new(Faker.fake(), past_timestamp(), now())
}

/// Unsaved test entity with a random flag.
pub fn new_test_entity() -> TestEntity {
    TestEntity::new(Faker.fake(), now())
}

/// Cars with identifiers `1..=n`.
pub fn generate_car_entities(n: usize) -> Vec<CarEntity> {
    (1..=n as i64)
        .map(|id| CarEntity::with_id(id, Faker.fake(), past_timestamp(), now()))
        .collect()
}

/// Test entities with identifiers `1..=n`.
pub fn generate_test_entities(n: usize) -> Vec<TestEntity> {
    (1..=n as i32)
        .map(|id| TestEntity::with_id(id, Faker.fake(), now()))
        .collect()
}

/// Cars keyed by identifier.
pub fn generate_car_entities_map(n: usize) -> BTreeMap<i64, CarEntity> {
    generate_car_entities(n)
        .into_iter()
        .filter_map(|car| car.id.map(|id| (id, car)))
        .collect()
}

/// Test entities keyed by identifier.
pub fn generate_test_entities_map(n: usize) -> BTreeMap<i32, TestEntity> {
    generate_test_entities(n)
        .into_iter()
        .filter_map(|entity| entity.entity_id.map(|id| (id, entity)))
        .collect()
}
