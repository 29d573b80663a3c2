//! Per entity membership records.
//!
//! A record is a bitset over component ids: bit `k` is set exactly when the entity has an entry
//! in the store for component `k`. A missing record means the entity is not alive.

use fixedbitset::FixedBitSet;

use crate::ecs::{component, entity::Entity};

/// Membership records indexed by entity.
#[derive(Debug, Default)]
pub struct Membership {
    records: Vec<Option<FixedBitSet>>,
    alive: usize,
}

impl Membership {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            alive: 0,
        }
    }

    /// Start an empty record for `entity`, sized for `components` known component ids.
    pub fn insert_entity(&mut self, entity: Entity, components: usize) {
        let index = entity.index();
        if index >= self.records.len() {
            self.records.resize_with(index + 1, || None);
        }
        debug_assert!(self.records[index].is_none(), "{entity} already has a record");
        if self.records[index].is_none() {
            self.alive += 1;
        }
        self.records[index] = Some(FixedBitSet::with_capacity(components));
    }

    /// Remove the record of `entity`, returning it if the entity was alive.
    pub fn remove_entity(&mut self, entity: Entity) -> Option<FixedBitSet> {
        let record = self.records.get_mut(entity.index())?.take()?;
        self.alive -= 1;
        Some(record)
    }

    /// Check if `entity` has a record.
    #[inline]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.record(entity).is_some()
    }

    /// Number of entities with a record.
    #[inline]
    pub fn len(&self) -> usize {
        self.alive
    }

    /// Check if no entity has a record.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.alive == 0
    }

    /// Record that `entity` owns component `id`. Returns false if the entity is not alive.
    pub fn add(&mut self, entity: Entity, id: component::Id) -> bool {
        match self.record_mut(entity) {
            Some(bits) => {
                bits.grow(id.index() + 1);
                bits.insert(id.index());
                true
            }
            None => false,
        }
    }

    /// Record that `entity` no longer owns component `id`.
    pub fn remove(&mut self, entity: Entity, id: component::Id) {
        if let Some(bits) = self.record_mut(entity) {
            if id.index() < bits.len() {
                bits.set(id.index(), false);
            }
        }
    }

    /// Check if `entity` owns component `id`.
    #[inline]
    pub fn contains(&self, entity: Entity, id: component::Id) -> bool {
        self.record(entity)
            .is_some_and(|bits| bits.contains(id.index()))
    }

    /// Component ids owned by `entity`, in id order. Empty for dead entities.
    pub fn components(&self, entity: Entity) -> Vec<component::Id> {
        self.record(entity)
            .map(|bits| bits.ones().map(component::Id::from).collect())
            .unwrap_or_default()
    }

    /// Entities with a record, in id order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, record)| record.is_some())
            .map(|(index, _)| Entity::from(index as u32))
    }

    #[inline]
    fn record(&self, entity: Entity) -> Option<&FixedBitSet> {
        self.records.get(entity.index()).and_then(Option::as_ref)
    }

    #[inline]
    fn record_mut(&mut self, entity: Entity) -> Option<&mut FixedBitSet> {
        self.records.get_mut(entity.index()).and_then(Option::as_mut)
    }
}
