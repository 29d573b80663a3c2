//! Component types and identifiers.
//!
//! Components are plain data records attached to entities. Each distinct component type
//! is assigned a dense [`Id`] by the owning registry's [`TypeRegistry`] the first time it
//! is seen. Ids start at zero and follow first-use order, which lets stores and membership
//! records be indexed directly by id.
//!
//! ```ignore
//! use rusty_ecs::ecs::Component;
//!
//! #[derive(Component, Default)]
//! struct Position { x: f32, y: f32 }
//! ```
//!
//! [`TypeRegistry`]: crate::ecs::registry::TypeRegistry

use crate::ecs::registry;

/// Derive macro implementing [`Component`] for a type.
pub use rusty_ecs_macros::Component;

/// A component identifier. Dense and stable for the lifetime of the owning registry.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl Id {
    /// Construct a new component Id from a raw u32 value.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the index of this component if it were to live in indexable storage (e.g. Vec)
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for Id {
    #[inline]
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<usize> for Id {
    #[inline]
    fn from(value: usize) -> Self {
        Self::new(value as u32)
    }
}

/// A trait representing a component in the ECS.
///
/// At present this only sets the required trait bounds for a type to be stored. A value is
/// constructed on attach (from `Default` or a caller supplied value) and dropped exactly once on
/// detach, on owning entity destruction, or on store teardown.
pub trait Component: 'static + Sized + Send + Sync {}

/// Export convenience type for component type information.
pub type Info = registry::TypeInfo;
