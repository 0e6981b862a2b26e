//! pgcrud domain types
//!
//! This crate provides the entity model persisted by the repository layer.
//! It has no knowledge of the database: entities are plain records, and the
//! only persistence-facing contract is the [`Identifiable`] trait, which
//! tells the repositories which field carries the identity of a record.
//!
//! ## Architecture
//!
//! - **identifiers**: identifier keys and the per-entity identifier descriptor
//! - **test_entity**: generic flagged/timestamped record
//! - **car**: vehicle record with an active flag and two dates
//! - **errors**: domain error type
//!
//! ## Usage
//!
//! ```rust
//! use pgcrud_domain::{Identifiable, IdentifierDescriptor, TestEntity};
//!
//! let descriptor = IdentifierDescriptor::of::<TestEntity>();
//! assert_eq!(descriptor.field, "entity_id");
//! assert_eq!(descriptor.key_type, "i32");
//!
//! let entity = TestEntity::new(true, chrono::Utc::now().naive_utc());
//! assert!(entity.is_new());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod car;
pub mod errors;
pub mod identifiers;
pub mod test_entity;

pub use car::CarEntity;
pub use errors::{DomainError, DomainResult};
pub use identifiers::{EntityKey, Identifiable, IdentifierDescriptor};
pub use test_entity::TestEntity;
