//! Component storage.
//!
//! Every component type lives in its own [`ComponentStore`]. The registry keeps the stores
//! together in [`Storage`], a table indexed by dense component id, behind the object safe
//! [`ErasedStore`] seam so that operations which do not know the concrete type (entity
//! destruction, teardown, membership probes) can still reach them.

pub mod index;
pub mod row;
pub mod store;

use std::any::Any;

use crate::ecs::{component, entity::Entity, registry::TypeInfo};

pub use row::Row;
pub use store::ComponentStore;

/// Type-erased operations over a [`ComponentStore`].
pub trait ErasedStore: Any {
    /// Type information of the stored component.
    fn info(&self) -> &TypeInfo;

    /// Check if `entity` has an entry.
    fn contains(&self, entity: Entity) -> bool;

    /// Detach and drop the component of `entity`.
    fn remove(&mut self, entity: Entity) -> bool;

    /// Number of live entries.
    fn len(&self) -> usize;

    /// Owning entities in dense order.
    fn entities(&self) -> &[Entity];

    /// Structural change counter.
    fn generation(&self) -> u64;

    /// Drop every live component and empty the store.
    fn teardown(&mut self) -> usize;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<C: component::Component> ErasedStore for ComponentStore<C> {
    #[inline]
    fn info(&self) -> &TypeInfo {
        ComponentStore::info(self)
    }

    #[inline]
    fn contains(&self, entity: Entity) -> bool {
        ComponentStore::contains(self, entity)
    }

    #[inline]
    fn remove(&mut self, entity: Entity) -> bool {
        ComponentStore::remove(self, entity)
    }

    #[inline]
    fn len(&self) -> usize {
        ComponentStore::len(self)
    }

    #[inline]
    fn entities(&self) -> &[Entity] {
        ComponentStore::entities(self)
    }

    #[inline]
    fn generation(&self) -> u64 {
        ComponentStore::generation(self)
    }

    fn teardown(&mut self) -> usize {
        ComponentStore::teardown(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A mutable slot per component id, used to hand out disjoint store borrows.
pub type StoreSlots<'w> = Vec<Option<&'w mut (dyn ErasedStore + 'static)>>;

/// All component stores of a registry, indexed by component id.
#[derive(Default)]
pub struct Storage {
    stores: Vec<Option<Box<dyn ErasedStore>>>,
}

impl Storage {
    /// Create an empty storage table.
    pub fn new() -> Self {
        Self { stores: Vec::new() }
    }

    /// Check if a store exists for `id`.
    #[inline]
    pub fn contains(&self, id: component::Id) -> bool {
        matches!(self.stores.get(id.index()), Some(Some(_)))
    }

    /// Get the store for `id`, creating it with `capacity` if missing.
    ///
    /// # Panics
    /// Panics if the existing store for `info.id()` holds a different type than `C`.
    pub fn get_or_create<C: component::Component>(
        &mut self,
        info: TypeInfo,
        capacity: usize,
    ) -> &mut ComponentStore<C> {
        let index = info.id().index();
        if index >= self.stores.len() {
            self.stores.resize_with(index + 1, || None);
        }

        self.stores[index]
            .get_or_insert_with(|| {
                Box::new(ComponentStore::<C>::with_capacity(info, capacity)) as Box<dyn ErasedStore>
            })
            .as_any_mut()
            .downcast_mut::<ComponentStore<C>>()
            .unwrap_or_else(|| panic!("store {} does not hold '{}'", index, info.name()))
    }

    /// Get the erased store for `id`.
    #[inline]
    pub fn get(&self, id: component::Id) -> Option<&(dyn ErasedStore + 'static)> {
        self.stores.get(id.index()).and_then(|store| store.as_deref())
    }

    /// Get the erased store for `id` mutably.
    #[inline]
    pub fn get_mut(&mut self, id: component::Id) -> Option<&mut (dyn ErasedStore + 'static)> {
        self.stores
            .get_mut(id.index())
            .and_then(|store| store.as_deref_mut())
    }

    /// Get the typed store for `id`.
    #[inline]
    pub fn typed<C: component::Component>(&self, id: component::Id) -> Option<&ComponentStore<C>> {
        self.get(id)?.as_any().downcast_ref()
    }

    /// Get the typed store for `id` mutably.
    #[inline]
    pub fn typed_mut<C: component::Component>(
        &mut self,
        id: component::Id,
    ) -> Option<&mut ComponentStore<C>> {
        self.get_mut(id)?.as_any_mut().downcast_mut()
    }

    /// Borrow every store mutably at once, one slot per component id.
    pub(crate) fn slots(&mut self) -> StoreSlots<'_> {
        self.stores
            .iter_mut()
            .map(|store| store.as_deref_mut())
            .collect()
    }

    /// Iterate all existing stores mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut (dyn ErasedStore + 'static)> + '_ {
        self.stores.iter_mut().filter_map(|store| store.as_deref_mut())
    }

    /// Number of existing stores.
    pub fn len(&self) -> usize {
        self.stores.iter().filter(|store| store.is_some()).count()
    }

    /// Check if there are no stores.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
