use std::collections::HashMap;

use crate::ecs::{entity::Entity, storage::row::Row};

/// Trait for a sparse index mapping entity ids to dense rows.
///
/// Entity ids may have large gaps and arrive in any order. The index resolves an entity to the
/// row of its component in a packed store in O(1) average time.
///
/// # Example
///
/// ```ignore
/// use storage::index::{Index, HashIndex};
///
/// let mut index = HashIndex::new();
///
/// index.insert(entity1, Row::new(0));   // Entity 1 is at row 0
/// index.insert(entity105, Row::new(1)); // Entity 105 is at row 1
///
/// assert_eq!(index.get(entity105), Some(Row::new(1)));
/// assert_eq!(index.get(entity999), None);
/// ```
pub trait Index {
    /// Insert a row for the given entity.
    ///
    /// If the entity already has a row, the old value is replaced.
    fn insert(&mut self, entity: Entity, row: Row);

    /// Get the row for the given entity if it exists.
    fn get(&self, entity: Entity) -> Option<Row>;

    /// Remove the row for the given entity.
    ///
    /// Returns the old row if it existed, or `None` if not present.
    fn remove(&mut self, entity: Entity) -> Option<Row>;

    /// Drop every mapping.
    fn clear(&mut self);

    /// Check if the index contains a mapping for the given entity.
    #[inline]
    fn contains(&self, entity: Entity) -> bool {
        self.get(entity).is_some()
    }
}

/// A hash-based sparse index backed by `std::collections::HashMap`.
///
/// Memory is proportional to the number of live entries rather than to the largest entity id,
/// which suits component types that only a few entities carry.
#[derive(Debug, Default)]
pub struct HashIndex {
    map: HashMap<Entity, Row>,
}

impl HashIndex {
    /// Create a new empty HashIndex.
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Create a new HashIndex with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity(capacity),
        }
    }

    /// Get the number of entries in the index.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the index is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Index for HashIndex {
    #[inline]
    fn insert(&mut self, entity: Entity, row: Row) {
        self.map.insert(entity, row);
    }

    #[inline]
    fn get(&self, entity: Entity) -> Option<Row> {
        self.map.get(&entity).copied()
    }

    #[inline]
    fn remove(&mut self, entity: Entity) -> Option<Row> {
        self.map.remove(&entity)
    }

    fn clear(&mut self) {
        self.map.clear();
    }
}
