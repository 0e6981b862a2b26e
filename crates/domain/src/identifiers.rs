//! Entity identifiers.
//!
//! Every persisted entity carries exactly one identifier field, assigned by
//! the store on first save. Instead of discovering that field at runtime, each
//! entity type declares it through [`Identifiable`], and the repositories read
//! the declaration once through an [`IdentifierDescriptor`].

use std::fmt::{Debug, Display};
use std::hash::Hash;

use crate::errors::{DomainError, DomainResult};

/// Scalar key types an entity can be identified by.
///
/// Keys travel to the database widened to `i64`, which every supported
/// integer column compares against.
pub trait EntityKey: Copy + Eq + Ord + Hash + Debug + Display + Send + Sync + 'static {
    /// Rust name of the key type
    const TYPE_NAME: &'static str;

    /// Widen the key for binding
    fn to_i64(self) -> i64;

    /// Narrow a raw store value back into the key type
    fn try_from_i64(value: i64) -> DomainResult<Self>;
}

macro_rules! impl_entity_key {
    ($ty:ty, $name:expr) => {
        impl EntityKey for $ty {
            const TYPE_NAME: &'static str = $name;

            #[inline]
            fn to_i64(self) -> i64 {
                i64::from(self)
            }

            fn try_from_i64(value: i64) -> DomainResult<Self> {
                <$ty>::try_from(value).map_err(|_| DomainError::KeyOutOfRange {
                    value,
                    key_type: $name,
                })
            }
        }
    };
}

impl_entity_key!(i32, "i32");
impl_entity_key!(i64, "i64");

/// An entity with a single identifier field.
pub trait Identifiable: Send + Sync {
    /// Key type of the identifier field
    type Id: EntityKey;

    /// Entity name used in logs and error messages
    const ENTITY_NAME: &'static str;

    /// Column holding the identifier
    const ID_FIELD: &'static str;

    /// Current identifier, `None` until the entity has been saved
    fn id(&self) -> Option<Self::Id>;

    /// Assign the identifier generated by the store
    fn set_id(&mut self, id: Self::Id);

    /// Identifier field name and value
    fn identifier(&self) -> (&'static str, Option<Self::Id>) {
        (Self::ID_FIELD, self.id())
    }

    /// Whether the entity has never been saved
    fn is_new(&self) -> bool {
        self.id().is_none()
    }

    /// Identifier of a persisted entity
    fn require_id(&self) -> DomainResult<Self::Id> {
        self.id().ok_or(DomainError::MissingIdentifier {
            entity: Self::ENTITY_NAME,
        })
    }
}

/// Identifier metadata of an entity type, resolved at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifierDescriptor {
    /// Entity name
    pub entity: &'static str,
    /// Identifier column
    pub field: &'static str,
    /// Key type name
    pub key_type: &'static str,
}

impl IdentifierDescriptor {
    /// Describe the identifier of `T`
    pub fn of<T: Identifiable>() -> Self {
        Self {
            entity: T::ENTITY_NAME,
            field: T::ID_FIELD,
            key_type: <T::Id as EntityKey>::TYPE_NAME,
        }
    }
}
