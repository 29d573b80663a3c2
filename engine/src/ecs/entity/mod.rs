//! Entity identities for the ECS.
//!
//! An [`Entity`] is an opaque numeric handle. It carries no payload and no generation: once an
//! entity is destroyed its id goes back to the [`Allocator`] and the next allocation may hand
//! out the very same value.
//!
//! # Recycling
//!
//! Freed ids are queued in a FIFO dead pool. Allocation drains the pool oldest-first before
//! advancing the fresh id counter:
//!
//! ```rust,ignore
//! let a = allocator.alloc(); // Entity(0)
//! let b = allocator.alloc(); // Entity(1)
//! allocator.free(a);
//! allocator.free(b);
//! assert_eq!(allocator.alloc(), a); // oldest freed id first
//! ```
//!
//! The allocator does not know about components. The registry only calls [`Allocator::free`]
//! after it has cleared the entity's membership record, so a recycled id never inherits stale
//! component associations.

use std::fmt;

use crossbeam::queue::SegQueue;

/// An entity identifier value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl From<u32> for Id {
    /// Get an id from a raw value.
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// An entity in the ECS. Equality is identity of the underlying id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity {
    id: Id,
}

impl Entity {
    /// Construct an entity from an id.
    #[inline]
    pub const fn new(id: Id) -> Self {
        Self { id }
    }

    /// Get the id of this entity.
    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Get the index of this entity if it were to live in indexable storage (e.g. Vec)
    #[inline]
    pub fn index(&self) -> usize {
        self.id.0 as usize
    }
}

impl From<u32> for Entity {
    #[inline]
    fn from(value: u32) -> Self {
        Self::new(Id(value))
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.id.0)
    }
}

/// An allocator for entities in the ECS.
///
/// Allocates unique entity ids and recycles freed ids in FIFO order.
///
/// The allocator is owned by a registry and requires `&mut self` for all mutation, so no atomics
/// are needed for the fresh id counter.
#[derive(Default, Debug)]
pub struct Allocator {
    /// Pool of ids available for reuse, oldest first.
    dead_pool: SegQueue<Id>,

    /// Next fresh id to allocate.
    next_id: u32,
}

impl Allocator {
    /// Construct a new entity allocator starting from id 0.
    #[inline]
    pub const fn new() -> Self {
        Self {
            dead_pool: SegQueue::new(),
            next_id: 0,
        }
    }

    /// Allocate a new entity, either by reusing the oldest freed id or by taking the next
    /// fresh id.
    pub fn alloc(&mut self) -> Entity {
        if let Some(id) = self.dead_pool.pop() {
            return Entity::new(id);
        }

        let id = Id(self.next_id);
        self.next_id += 1;
        Entity::new(id)
    }

    /// Allocate many new entities at once.
    ///
    /// Reuses ids from the dead pool first, then allocates new ids as needed.
    pub fn alloc_many(&mut self, count: usize) -> Vec<Entity> {
        let mut alloced = Vec::with_capacity(count);
        while alloced.len() < count {
            match self.dead_pool.pop() {
                Some(id) => alloced.push(Entity::new(id)),
                None => break,
            }
        }

        // Allocate remaining as new sequential ids
        let remaining = (count - alloced.len()) as u32;
        if remaining > 0 {
            let start_id = self.next_id;
            self.next_id += remaining;
            alloced.extend((start_id..self.next_id).map(|id| Entity::new(Id(id))));
        }

        alloced
    }

    /// Return an entity id to the pool for reuse.
    ///
    /// The caller is responsible for only freeing entities it allocated, once.
    pub fn free(&mut self, entity: Entity) {
        self.dead_pool.push(entity.id());
    }

    /// Number of allocated ids that have not been freed.
    #[inline]
    pub fn live(&self) -> usize {
        self.next_id as usize - self.dead_pool.len()
    }

    /// Number of freed ids waiting to be reused.
    #[inline]
    pub fn pending(&self) -> usize {
        self.dead_pool.len()
    }
}

#[test]
fn allocator_uniqueness() {
    // Given
    let mut allocator = Allocator::default();

    // When
    let mut entities = Vec::new();
    for _ in 0..200 {
        entities.push(allocator.alloc());
    }

    // Then - No dupes generated
    let pre_len = entities.len();
    entities.sort();
    entities.dedup();
    assert_eq!(pre_len, entities.len());
}

#[test]
fn allocator_reuse_is_fifo() {
    // Given
    let mut allocator = Allocator::default();
    let entities: Vec<_> = (0..5).map(|_| allocator.alloc()).collect();

    // When - Free in a scrambled order
    allocator.free(entities[3]);
    allocator.free(entities[0]);
    allocator.free(entities[4]);

    // Then - Reused oldest freed first, then fresh ids
    assert_eq!(allocator.alloc(), entities[3]);
    assert_eq!(allocator.alloc(), entities[0]);
    assert_eq!(allocator.alloc(), entities[4]);
    assert_eq!(allocator.alloc(), Entity::from(5));
}

#[test]
fn allocator_empty_pool_allocates_new() {
    // Given
    let mut allocator = Allocator::default();

    // When - Allocate without any freed entities
    let e1 = allocator.alloc();
    let e2 = allocator.alloc();

    // Then - Should allocate new sequential ids
    assert_eq!(e1.index(), 0);
    assert_eq!(e2.index(), 1);

    // When - Free one entity
    allocator.free(e1);

    // Then
    assert_eq!(allocator.pending(), 1);
    assert_eq!(allocator.live(), 1);

    // When - Allocate again (should reuse from pool)
    let e1_reused = allocator.alloc();

    // Then - Same id comes back and compares equal
    assert_eq!(e1_reused, e1);
    assert_eq!(allocator.pending(), 0);

    // When - Allocate again (pool empty)
    let e3 = allocator.alloc();

    // Then
    assert_eq!(e3.index(), 2);
    assert_eq!(allocator.live(), 3);
}

#[test]
fn allocator_large_scale_reuse() {
    // Given
    let mut allocator = Allocator::default();
    let mut entities: Vec<_> = (0..1000).map(|_| allocator.alloc()).collect();

    // When - Free half of them and allocate 500 more
    for e in entities.drain(0..500) {
        allocator.free(e);
    }
    let reused: Vec<_> = (0..500).map(|_| allocator.alloc()).collect();

    // Then - Ids come from the freed range in freeing order
    for (i, e) in reused.iter().enumerate() {
        assert_eq!(e.index(), i);
    }
    assert_eq!(allocator.live(), 1000);
}

#[test]
fn allocator_alloc_many_from_empty() {
    // Given
    let mut allocator = Allocator::default();

    // When
    let entities = allocator.alloc_many(5);

    // Then - Should get sequential new ids
    assert_eq!(entities.len(), 5);
    for (i, e) in entities.iter().enumerate() {
        assert_eq!(e.index(), i);
    }
    assert_eq!(allocator.next_id, 5);
}

#[test]
fn allocator_alloc_many_mixed() {
    // Given
    let mut allocator = Allocator::default();
    for e in allocator.alloc_many(3) {
        allocator.free(e);
    }
    assert_eq!(allocator.pending(), 3);

    // When - Allocate 5 (more than pool size)
    let entities = allocator.alloc_many(5);

    // Then - 3 reused + 2 new
    let ids: Vec<_> = entities.iter().map(|e| e.index()).collect();
    assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    assert_eq!(allocator.pending(), 0);
    assert_eq!(allocator.next_id, 5);
}

#[test]
fn entity_index_and_display() {
    // Given
    let e1 = Entity::from(0);
    let e2 = Entity::from(42);

    // Then
    assert_eq!(e1.index(), 0);
    assert_eq!(e2.index(), 42);
    assert_eq!(e2.id(), Id::from(42));
    assert_eq!(e2.to_string(), "Entity(42)");
    assert!(e1 < e2);
}
