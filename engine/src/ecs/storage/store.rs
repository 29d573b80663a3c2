//! Packed sparse-set storage for a single component type.
//!
//! A [`ComponentStore`] keeps three structures in lock step:
//!
//! - `dense`: the component values, packed with no gaps
//! - `entities`: the owning entity of each dense slot
//! - `index`: entity to dense [`Row`]
//!
//! Appends go to the end. Removal moves the last slot into the hole (swap-remove), so the
//! buffers stay contiguous at the cost of iteration order. Every mutation that can reorder or
//! resize the store bumps its generation, which detached cursors use to notice that the store
//! changed underneath them.

use log::warn;

use crate::ecs::{
    component::Component,
    entity::Entity,
    error::EcsError,
    registry::TypeInfo,
    storage::{
        index::{HashIndex, Index},
        row::Row,
    },
};

/// Packed storage of all instances of component `C`.
#[derive(Debug)]
pub struct ComponentStore<C: Component> {
    info: TypeInfo,
    dense: Vec<C>,
    entities: Vec<Entity>,
    index: HashIndex,
    generation: u64,
}

impl<C: Component> ComponentStore<C> {
    /// Create an empty store with room for `capacity` instances before reallocating.
    pub fn with_capacity(info: TypeInfo, capacity: usize) -> Self {
        debug_assert!(info.is::<C>(), "type info for '{}' used for another type", info.name());
        Self {
            info,
            dense: Vec::with_capacity(capacity),
            entities: Vec::with_capacity(capacity),
            index: HashIndex::with_capacity(capacity),
            generation: 0,
        }
    }

    /// Type information of the stored component.
    #[inline]
    pub fn info(&self) -> &TypeInfo {
        &self.info
    }

    /// Attach `value` to `entity`, appending it to the packed buffer.
    ///
    /// Fails with [`EcsError::DuplicateComponent`] if the entity already has an entry; the store
    /// is left untouched in that case.
    pub fn insert(&mut self, entity: Entity, value: C) -> Result<&mut C, EcsError> {
        if self.index.contains(entity) {
            let err = EcsError::DuplicateComponent {
                entity,
                component: self.info.name(),
            };
            warn!("{err}");
            return Err(err);
        }

        let row = Row::new(self.dense.len());
        self.dense.push(value);
        self.entities.push(entity);
        self.index.insert(entity, row);
        self.generation += 1;

        #[cfg(debug_assertions)]
        self.verify_invariants();

        Ok(&mut self.dense[row.index()])
    }

    /// Attach a default constructed component to `entity`.
    pub fn emplace(&mut self, entity: Entity) -> Result<&mut C, EcsError>
    where
        C: Default,
    {
        self.insert(entity, C::default())
    }

    /// Get the component of `entity`, if present.
    #[inline]
    pub fn get(&self, entity: Entity) -> Option<&C> {
        self.index.get(entity).map(|row| &self.dense[row.index()])
    }

    /// Get the component of `entity` mutably, if present.
    #[inline]
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut C> {
        self.index.get(entity).map(|row| &mut self.dense[row.index()])
    }

    /// Check if `entity` has an entry.
    #[inline]
    pub fn contains(&self, entity: Entity) -> bool {
        self.index.contains(entity)
    }

    /// Detach the component of `entity` and hand it back.
    ///
    /// If the entity is not in the last slot, the last slot's value and owner are moved into the
    /// vacated slot and the moved entity's index entry is repointed.
    pub fn take(&mut self, entity: Entity) -> Option<C> {
        let row = self.index.remove(entity)?;
        let index = row.index();
        let last_index = self.dense.len() - 1;

        let value = self.dense.swap_remove(index);
        self.entities.swap_remove(index);

        if index != last_index {
            // Repoint the entity that was moved into the vacated row
            let moved = self.entities[index];
            self.index.insert(moved, row);
        }
        self.generation += 1;

        #[cfg(debug_assertions)]
        self.verify_invariants();

        Some(value)
    }

    /// Detach and drop the component of `entity`. Returns whether anything was removed.
    #[inline]
    pub fn remove(&mut self, entity: Entity) -> bool {
        self.take(entity).is_some()
    }

    /// Number of live entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Check if the store holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Number of instances the packed buffer holds before it must grow.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.dense.capacity()
    }

    /// Owning entities in dense order.
    #[inline]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Iterate `(entity, component)` pairs in dense order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &C)> + '_ {
        self.entities.iter().copied().zip(self.dense.iter())
    }

    /// Iterate `(entity, component)` pairs in dense order with mutable access.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut C)> + '_ {
        self.entities.iter().copied().zip(self.dense.iter_mut())
    }

    /// Structural change counter, bumped by every insert, removal and teardown.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Drop every live component exactly once and empty the store.
    ///
    /// Returns the number of instances dropped. The store stays usable and empty afterwards.
    pub fn teardown(&mut self) -> usize {
        let dropped = self.dense.len();
        self.dense.clear();
        self.entities.clear();
        self.index.clear();
        self.generation += 1;
        dropped
    }

    /// Split the store into the read-only entity lookup parts and the mutable component slice.
    ///
    /// Views use this to hand out `&mut C` for individual rows while still probing the index.
    #[inline]
    pub(crate) fn split_mut(&mut self) -> (&[Entity], &HashIndex, &mut [C]) {
        (&self.entities, &self.index, &mut self.dense)
    }

    /// Verify the packed buffers and the index have the same length.
    ///
    /// # Panics
    /// Panics if any length differs.
    #[cfg(debug_assertions)]
    pub fn verify_invariants(&self) {
        assert_eq!(
            self.dense.len(),
            self.entities.len(),
            "store '{}' holds {} values but {} owners",
            self.info.name(),
            self.dense.len(),
            self.entities.len()
        );
        assert_eq!(
            self.entities.len(),
            self.index.len(),
            "store '{}' holds {} owners but {} index entries",
            self.info.name(),
            self.entities.len(),
            self.index.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::atomic::{AtomicIsize, Ordering},
    };

    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::ecs::component;

    #[derive(Debug, Default, Clone, Copy, PartialEq)]
    struct Position {
        x: i32,
        y: i32,
    }
    impl Component for Position {}

    fn position_store() -> ComponentStore<Position> {
        ComponentStore::with_capacity(TypeInfo::new::<Position>(component::Id::new(0)), 4)
    }

    fn entity(id: u32) -> Entity {
        Entity::from(id)
    }

    #[test]
    fn emplace_then_find_returns_default() {
        // Given
        let mut store = position_store();

        // When
        let created = store.emplace(entity(3)).unwrap();
        created.x = 9;

        // Then
        assert_eq!(store.get(entity(3)), Some(&Position { x: 9, y: 0 }));
        assert!(store.contains(entity(3)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.entities(), &[entity(3)]);
    }

    #[test]
    fn emplace_default_value() {
        // Given
        let mut store = position_store();

        // When
        store.emplace(entity(0)).unwrap();

        // Then
        assert_eq!(store.get(entity(0)), Some(&Position::default()));
    }

    #[test]
    fn duplicate_insert_fails_and_keeps_value() {
        // Given
        let mut store = position_store();
        store.insert(entity(1), Position { x: 1, y: 1 }).unwrap();
        let generation = store.generation();

        // When
        let result = store.insert(entity(1), Position { x: 2, y: 2 });

        // Then
        assert!(matches!(
            result,
            Err(EcsError::DuplicateComponent { entity: e, .. }) if e == entity(1)
        ));
        assert_eq!(store.get(entity(1)), Some(&Position { x: 1, y: 1 }));
        assert_eq!(store.len(), 1);
        assert_eq!(store.generation(), generation);
    }

    #[test]
    fn remove_then_find_returns_none() {
        // Given
        let mut store = position_store();
        store.emplace(entity(1)).unwrap();

        // When
        let removed = store.remove(entity(1));

        // Then
        assert!(removed);
        assert_eq!(store.get(entity(1)), None);
        assert!(!store.contains(entity(1)));
        assert!(store.is_empty());
    }

    #[test]
    fn remove_missing_is_benign() {
        // Given
        let mut store = position_store();
        store.emplace(entity(1)).unwrap();
        let generation = store.generation();

        // When
        let removed = store.remove(entity(2));

        // Then
        assert!(!removed);
        assert_eq!(store.len(), 1);
        assert_eq!(store.generation(), generation);
    }

    #[test]
    fn swap_remove_keeps_other_values() {
        // Given
        let mut store = position_store();
        for i in 0..5 {
            store.insert(entity(i), Position { x: i as i32, y: -(i as i32) }).unwrap();
        }

        // When - Remove from the middle
        let taken = store.take(entity(1));

        // Then - Last entity moved into the hole
        assert_eq!(taken, Some(Position { x: 1, y: -1 }));
        assert_eq!(store.entities(), &[entity(0), entity(4), entity(2), entity(3)]);
        for i in [0, 2, 3, 4] {
            assert_eq!(store.get(entity(i)), Some(&Position { x: i as i32, y: -(i as i32) }));
        }
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn swap_remove_last_slot() {
        // Given
        let mut store = position_store();
        store.insert(entity(0), Position { x: 0, y: 0 }).unwrap();
        store.insert(entity(1), Position { x: 1, y: 1 }).unwrap();

        // When
        assert!(store.remove(entity(1)));

        // Then
        assert_eq!(store.entities(), &[entity(0)]);
        assert_eq!(store.get(entity(0)), Some(&Position { x: 0, y: 0 }));
    }

    #[test]
    fn grows_past_initial_capacity() {
        // Given
        let mut store = position_store();
        assert!(store.capacity() >= 4);

        // When
        for i in 0..100 {
            store.insert(entity(i), Position { x: i as i32, y: 0 }).unwrap();
        }

        // Then
        assert_eq!(store.len(), 100);
        assert!(store.capacity() >= 100);
        assert_eq!(store.get(entity(77)), Some(&Position { x: 77, y: 0 }));
    }

    #[test]
    fn iter_mut_updates_in_place() {
        // Given
        let mut store = position_store();
        for i in 0..3 {
            store.insert(entity(i), Position { x: i as i32, y: 0 }).unwrap();
        }

        // When
        for (_, position) in store.iter_mut() {
            position.y = position.x * 10;
        }

        // Then
        let collected: Vec<_> = store.iter().map(|(e, p)| (e.index(), p.y)).collect();
        assert_eq!(collected, vec![(0, 0), (1, 10), (2, 20)]);
    }

    #[test]
    fn generation_tracks_structural_changes() {
        // Given
        let mut store = position_store();
        let start = store.generation();

        // When
        store.emplace(entity(0)).unwrap();
        let after_insert = store.generation();
        store.get_mut(entity(0)).unwrap().x = 5;
        let after_write = store.generation();
        store.remove(entity(0));
        let after_remove = store.generation();

        // Then - Writes through a reference do not reorder the store
        assert!(after_insert > start);
        assert_eq!(after_write, after_insert);
        assert!(after_remove > after_write);
    }

    static LIVE: AtomicIsize = AtomicIsize::new(0);

    #[derive(Debug)]
    struct Tracked;

    impl Default for Tracked {
        fn default() -> Self {
            LIVE.fetch_add(1, Ordering::SeqCst);
            Tracked
        }
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            let previous = LIVE.fetch_sub(1, Ordering::SeqCst);
            assert!(previous > 0, "Tracked dropped more often than constructed");
        }
    }

    impl Component for Tracked {}

    #[test]
    fn teardown_drops_each_instance_once() {
        // Given
        let mut store =
            ComponentStore::<Tracked>::with_capacity(TypeInfo::new::<Tracked>(component::Id::new(0)), 2);
        for i in 0..10 {
            store.emplace(entity(i)).unwrap();
        }
        store.remove(entity(4));
        assert_eq!(LIVE.load(Ordering::SeqCst), 9);

        // When
        let dropped = store.teardown();

        // Then
        assert_eq!(dropped, 9);
        assert_eq!(LIVE.load(Ordering::SeqCst), 0);
        assert!(store.is_empty());
        assert!(!store.contains(entity(0)));

        // When - A second teardown has nothing left to drop
        assert_eq!(store.teardown(), 0);
        assert_eq!(LIVE.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn random_churn_matches_model() {
        // Given
        let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
        let mut store = position_store();
        let mut model: HashMap<Entity, Position> = HashMap::new();

        // When - A long random sequence of inserts and removes over 64 ids
        for step in 0..5_000 {
            let e = entity(rng.gen_range(0..64));
            if rng.gen_bool(0.55) {
                let value = Position { x: step, y: -step };
                let inserted = store.insert(e, value).is_ok();
                assert_eq!(inserted, !model.contains_key(&e));
                model.entry(e).or_insert(value);
            } else {
                assert_eq!(store.remove(e), model.remove(&e).is_some());
            }

            // Then - Size always equals the net count
            assert_eq!(store.len(), model.len());
        }

        // Then - Every surviving value is intact
        for (e, value) in &model {
            assert_eq!(store.get(*e), Some(value));
        }
        let mut owners = store.entities().to_vec();
        owners.sort();
        owners.dedup();
        assert_eq!(owners.len(), model.len());
    }
}
