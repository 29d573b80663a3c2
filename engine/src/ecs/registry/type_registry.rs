//! Dense component type ids.
//!
//! [`TypeRegistry`] hands out a small integer [`component::Id`] for every distinct Rust type the
//! first time it is registered, starting at zero in first-use order. The same type always maps
//! to the same id for the lifetime of the registry instance.
//!
//! Each [`Registry`] owns its own `TypeRegistry`; there is no process-wide counter, so two
//! registries (or two tests) never observe each other's assignments.
//!
//! # Example
//!
//! ```rust,ignore
//! let types = TypeRegistry::new();
//!
//! let pos_id = types.register::<Position>();
//! let vel_id = types.register::<Velocity>();
//!
//! assert_eq!(pos_id.index(), 0);
//! assert_eq!(vel_id.index(), 1);
//! assert_eq!(types.register::<Position>(), pos_id);
//! ```
//!
//! [`Registry`]: crate::ecs::Registry

use std::{
    alloc::Layout,
    any::{TypeId as StdTypeId, type_name},
    sync::{
        RwLock,
        atomic::{AtomicU32, Ordering},
    },
};

use dashmap::DashMap;

use crate::ecs::component;

/// Metadata about a registered type.
///
/// This is the capability record a store is created from: the dense id, the Rust type identity
/// used to check downcasts, a readable name for diagnostics, and the memory layout of one
/// instance.
#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
    /// The dense component id.
    id: component::Id,

    /// The Rust TypeId for runtime type checking.
    type_id: StdTypeId,

    /// The type name as reported by `std::any::type_name`.
    name: &'static str,

    /// The memory layout of the type.
    layout: Layout,
}

impl TypeInfo {
    /// Construct TypeInfo for type `T`.
    pub(crate) fn new<T: 'static>(id: component::Id) -> Self {
        Self {
            id,
            type_id: StdTypeId::of::<T>(),
            name: type_name::<T>(),
            layout: Layout::new::<T>(),
        }
    }

    /// Get the component id.
    #[inline]
    pub fn id(&self) -> component::Id {
        self.id
    }

    /// Get the Rust TypeId.
    #[inline]
    pub fn type_id(&self) -> StdTypeId {
        self.type_id
    }

    /// Get the type name.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Get the memory layout.
    #[inline]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Byte size of one instance.
    #[inline]
    pub fn size(&self) -> usize {
        self.layout.size()
    }

    /// Check if this is a zero-sized type.
    #[inline]
    pub fn is_zero_sized(&self) -> bool {
        self.layout.size() == 0
    }

    /// Check if this info describes `T`.
    #[inline]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == StdTypeId::of::<T>()
    }
}

/// A registry of component types owned by a single [`Registry`](crate::ecs::Registry).
pub struct TypeRegistry {
    /// Map from Rust TypeId to our Id. Lock-free reads via sharded concurrent hashmap.
    type_map: DashMap<StdTypeId, component::Id>,

    /// Registered type entries, indexed by id. Protected by RwLock for rare writes.
    types: RwLock<Vec<TypeInfo>>,

    /// Next available type identifier.
    next_id: AtomicU32,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create a new, empty type registry.
    #[inline]
    pub fn new() -> Self {
        Self {
            type_map: DashMap::new(),
            types: RwLock::new(Vec::new()),
            next_id: AtomicU32::new(0),
        }
    }

    /// Register a type, returning its id.
    ///
    /// If the type is already registered, returns the existing id.
    pub fn register<T: 'static>(&self) -> component::Id {
        let std_type_id = StdTypeId::of::<T>();

        // Fast path: already registered (lock-free read)
        if let Some(existing_id) = self.type_map.get(&std_type_id) {
            return *existing_id;
        }

        match self.type_map.entry(std_type_id) {
            dashmap::Entry::Occupied(occupied) => *occupied.get(),
            dashmap::Entry::Vacant(vacant) => {
                let id = component::Id::new(self.next_id.fetch_add(1, Ordering::Relaxed));

                let mut types = self.types.write().unwrap_or_else(|e| e.into_inner());
                debug_assert_eq!(types.len(), id.index());
                types.push(TypeInfo::new::<T>(id));
                vacant.insert(id);

                id
            }
        }
    }

    /// Register a type and return its full type info.
    pub fn register_info<T: 'static>(&self) -> TypeInfo {
        let id = self.register::<T>();
        self.get_info(id).unwrap_or_else(|| TypeInfo::new::<T>(id))
    }

    /// Get the id for a type, if registered.
    #[inline]
    pub fn get<T: 'static>(&self) -> Option<component::Id> {
        self.type_map
            .get(&StdTypeId::of::<T>())
            .map(|entry| *entry.value())
    }

    /// Get type info by id.
    #[inline]
    pub fn get_info(&self, id: component::Id) -> Option<TypeInfo> {
        let types = self.types.read().unwrap_or_else(|e| e.into_inner());
        types.get(id.index()).copied()
    }

    /// Get type info for a type, if registered.
    #[inline]
    pub fn get_info_of<T: 'static>(&self) -> Option<TypeInfo> {
        let id = self.get::<T>()?;
        self.get_info(id)
    }

    /// Get the number of registered types.
    #[inline]
    pub fn len(&self) -> usize {
        self.next_id.load(Ordering::Relaxed) as usize
    }

    /// Check if the registry is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Position {
        #[allow(dead_code)]
        x: f32,
        #[allow(dead_code)]
        y: f32,
    }

    struct Velocity {
        #[allow(dead_code)]
        dx: f32,
        #[allow(dead_code)]
        dy: f32,
    }

    struct Marker;

    #[test]
    fn register_assigns_dense_ids_in_first_use_order() {
        // Given
        let types = TypeRegistry::new();

        // When
        let vel_id = types.register::<Velocity>();
        let pos_id = types.register::<Position>();

        // Then
        assert_eq!(vel_id, component::Id::new(0));
        assert_eq!(pos_id, component::Id::new(1));
        assert_eq!(types.len(), 2);
    }

    #[test]
    fn register_is_idempotent() {
        // Given
        let types = TypeRegistry::new();
        let first = types.register::<Position>();

        // When
        let second = types.register::<Position>();

        // Then
        assert_eq!(first, second);
        assert_eq!(types.len(), 1);
    }

    #[test]
    fn registries_do_not_share_ids() {
        // Given
        let a = TypeRegistry::new();
        let b = TypeRegistry::new();

        // When
        a.register::<Position>();
        let vel_in_a = a.register::<Velocity>();
        let vel_in_b = b.register::<Velocity>();

        // Then
        assert_eq!(vel_in_a.index(), 1);
        assert_eq!(vel_in_b.index(), 0);
        assert!(b.get::<Position>().is_none());
    }

    #[test]
    fn get_unregistered_returns_none() {
        // Given
        let types = TypeRegistry::new();

        // Then
        assert!(types.is_empty());
        assert!(types.get::<Position>().is_none());
        assert!(types.get_info_of::<Position>().is_none());
        assert!(types.get_info(component::Id::new(0)).is_none());
    }

    #[test]
    fn type_info_describes_the_type() {
        // Given
        let types = TypeRegistry::new();
        let id = types.register::<Position>();
        types.register::<Marker>();

        // When
        let info = types.get_info(id).unwrap();
        let marker = types.get_info_of::<Marker>().unwrap();

        // Then
        assert_eq!(info.id(), id);
        assert_eq!(info.size(), std::mem::size_of::<Position>());
        assert_eq!(info.layout(), Layout::new::<Position>());
        assert!(info.is::<Position>());
        assert!(!info.is::<Velocity>());
        assert!(info.name().ends_with("Position"));
        assert!(!info.is_zero_sized());
        assert!(marker.is_zero_sized());
        assert_eq!(marker.type_id(), StdTypeId::of::<Marker>());
    }

    #[test]
    fn register_info_matches_lookup() {
        // Given
        let types = TypeRegistry::new();
        types.register::<Marker>();

        // When
        let info = types.register_info::<Velocity>();

        // Then
        assert_eq!(info.id(), component::Id::new(1));
        assert_eq!(types.get_info_of::<Velocity>().map(|i| i.id()), Some(info.id()));
        assert_eq!(types.register_info::<Velocity>().id(), info.id());
    }
}
