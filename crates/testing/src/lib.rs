//! Testing utilities for pgcrud
//!
//! This crate provides:
//! - Entity fixtures with generated data
//! - An in-memory mock of the repository traits
//! - Test database setup against a live PostgreSQL
//!
//! # Examples
//!
//! ```
//! use pgcrud_testing::{fixtures::generate_car_entities, mocks::MockCrud};
//!
//! let cars = MockCrud::builder()
//!     .with_existing_entities(generate_car_entities(10))
//!     .with_delete_answer(true)
//!     .build();
//! assert_eq!(cars.count(), 10);
//! ```

pub mod database;
pub mod fixtures;
pub mod mocks;

// Re-export commonly used types
pub use database::TestDatabase;
pub use fixtures::*;
pub use mocks::*;

// Re-export testing dependencies for convenience
pub use fake;
pub use proptest;
