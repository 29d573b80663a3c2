//! The registry: entities, their components, and the stores holding them.
//!
//! A [`Registry`] owns one [`ComponentStore`] per component type, a membership record per
//! entity, the entity allocator, and its own [`TypeRegistry`].
//!
//! # Store creation
//!
//! Stores are created lazily. The first `insert`/`emplace` of a type, or the first view that
//! names it, creates its store with [`Config::default_capacity`]. [`Registry::register`] creates
//! a store up front with an explicit capacity and rejects a second registration of the same
//! type. Lookups never create stores: asking about a type that was never stored simply finds
//! nothing.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut registry = Registry::new();
//!
//! let e = registry.create();
//! registry.insert(e, Position { x: 1, y: 2 })?;
//! registry.emplace::<Velocity>(e)?.dx = 3;
//!
//! for (entity, (position, velocity)) in registry.view::<(&mut Position, &Velocity)>() {
//!     position.x += velocity.dx;
//! }
//!
//! registry.destroy(e);
//! ```

mod config;
mod membership;
mod type_registry;

use std::marker::PhantomData;

use log::{debug, trace, warn};

use crate::ecs::{
    component::{self, Component},
    entity::{self, Entity},
    error::EcsError,
    query::{Cursor, Data, View},
    storage::{ComponentStore, Storage},
};

pub use config::{Config, DEFAULT_CAPACITY};
pub use membership::Membership;
pub use type_registry::{TypeInfo, TypeRegistry};

/// Entity and component storage for one simulation.
///
/// The registry is single threaded: it is neither `Send` nor `Sync`. Callers that need to share
/// one across threads must serialize all access themselves.
pub struct Registry {
    /// Settings for lazily created stores.
    config: Config,

    /// Dense ids for the component types seen by this registry.
    types: TypeRegistry,

    /// Entity id allocation and recycling.
    entities: entity::Allocator,

    /// Which components each live entity owns.
    membership: Membership,

    /// One store per component id.
    storage: Storage,

    _not_send: PhantomData<*mut ()>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Create an empty registry with the default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create an empty registry.
    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            types: TypeRegistry::new(),
            entities: entity::Allocator::new(),
            membership: Membership::new(),
            storage: Storage::new(),
            _not_send: PhantomData,
        }
    }

    /// The configuration this registry was created with.
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The component types known to this registry.
    #[inline]
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// Get the id of component `C`, if it has been seen.
    #[inline]
    pub fn component_id<C: Component>(&self) -> Option<component::Id> {
        self.types.get::<C>()
    }

    /// Create the store for `C` with room for `capacity` instances.
    ///
    /// Fails with [`EcsError::DuplicateRegistration`] if the store already exists, whether it was
    /// registered explicitly or created on first use.
    pub fn register<C: Component>(&mut self, capacity: usize) -> Result<component::Id, EcsError> {
        let info = self.types.register_info::<C>();
        if self.storage.contains(info.id()) {
            let err = EcsError::DuplicateRegistration {
                component: info.name(),
            };
            warn!("{err}");
            return Err(err);
        }

        self.storage.get_or_create::<C>(info, capacity);
        debug!(
            "registered component '{}' as {:?} with capacity {}",
            info.name(),
            info.id(),
            capacity
        );
        Ok(info.id())
    }

    /// Make sure a store exists for `C`, returning its id.
    pub(crate) fn ensure_store<C: Component>(&mut self) -> component::Id {
        Self::store_for_write::<C>(&self.types, &mut self.storage, self.config.default_capacity)
            .info()
            .id()
    }

    fn store_for_write<'s, C: Component>(
        types: &TypeRegistry,
        storage: &'s mut Storage,
        capacity: usize,
    ) -> &'s mut ComponentStore<C> {
        let info = types.register_info::<C>();
        if !storage.contains(info.id()) {
            debug!(
                "creating store for component '{}' as {:?} with capacity {}",
                info.name(),
                info.id(),
                capacity
            );
        }
        storage.get_or_create::<C>(info, capacity)
    }

    #[inline]
    fn store<C: Component>(&self) -> Option<&ComponentStore<C>> {
        let id = self.types.get::<C>()?;
        self.storage.typed::<C>(id)
    }

    #[inline]
    fn store_mut<C: Component>(&mut self) -> Option<&mut ComponentStore<C>> {
        let id = self.types.get::<C>()?;
        self.storage.typed_mut::<C>(id)
    }

    /// Create a new entity with no components.
    ///
    /// The oldest destroyed id is reused first; otherwise a fresh id is issued.
    pub fn create(&mut self) -> Entity {
        let entity = self.entities.alloc();
        self.membership.insert_entity(entity, self.types.len());
        trace!("created {entity}");
        entity
    }

    /// Create `count` entities with no components.
    pub fn create_many(&mut self, count: usize) -> Vec<Entity> {
        let entities = self.entities.alloc_many(count);
        for &entity in &entities {
            self.membership.insert_entity(entity, self.types.len());
        }
        trace!("created {} entities", entities.len());
        entities
    }

    /// Destroy `entity`, dropping every component it owns and recycling its id.
    ///
    /// Destroying an unknown or already destroyed entity does nothing.
    pub fn destroy(&mut self, entity: Entity) {
        let Some(record) = self.membership.remove_entity(entity) else {
            debug!("ignoring destroy of unknown {entity}");
            return;
        };

        for index in record.ones() {
            if let Some(store) = self.storage.get_mut(component::Id::from(index)) {
                let removed = store.remove(entity);
                debug_assert!(removed, "{entity} missing from store {index}");
            }
        }

        // The record is gone, so the recycled id starts without components.
        self.entities.free(entity);
        trace!("destroyed {entity}");
    }

    /// Check if `entity` is alive.
    #[inline]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.membership.is_alive(entity)
    }

    /// Number of live entities.
    #[inline]
    pub fn len(&self) -> usize {
        self.membership.len()
    }

    /// Check if there are no live entities.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.membership.is_empty()
    }

    /// Attach `value` as component `C` of `entity`.
    ///
    /// Fails with [`EcsError::UnknownEntity`] if the entity is not alive, or with
    /// [`EcsError::DuplicateComponent`] if it already owns a `C`. Nothing changes on failure.
    pub fn insert<C: Component>(&mut self, entity: Entity, value: C) -> Result<&mut C, EcsError> {
        if !self.membership.is_alive(entity) {
            return Err(EcsError::UnknownEntity(entity));
        }

        let store =
            Self::store_for_write::<C>(&self.types, &mut self.storage, self.config.default_capacity);
        let id = store.info().id();
        let component = store.insert(entity, value)?;
        self.membership.add(entity, id);
        Ok(component)
    }

    /// Attach a default constructed component `C` to `entity`.
    ///
    /// Fails like [`insert`](Registry::insert).
    pub fn emplace<C: Component + Default>(&mut self, entity: Entity) -> Result<&mut C, EcsError> {
        self.insert(entity, C::default())
    }

    /// Detach component `C` from `entity` and return it.
    pub fn take<C: Component>(&mut self, entity: Entity) -> Option<C> {
        let id = self.types.get::<C>()?;
        let value = self.storage.typed_mut::<C>(id)?.take(entity)?;
        self.membership.remove(entity, id);
        Some(value)
    }

    /// Detach and drop component `C` of `entity`. Returns whether anything was removed.
    pub fn remove<C: Component>(&mut self, entity: Entity) -> bool {
        self.take::<C>(entity).is_some()
    }

    /// Get component `C` of `entity`.
    #[inline]
    pub fn find<C: Component>(&self, entity: Entity) -> Option<&C> {
        self.store::<C>()?.get(entity)
    }

    /// Get component `C` of `entity` mutably.
    #[inline]
    pub fn find_mut<C: Component>(&mut self, entity: Entity) -> Option<&mut C> {
        self.store_mut::<C>()?.get_mut(entity)
    }

    /// Check if `entity` owns component `C`.
    #[inline]
    pub fn has<C: Component>(&self, entity: Entity) -> bool {
        self.store::<C>().is_some_and(|store| store.contains(entity))
    }

    /// Number of entities owning component `C`.
    #[inline]
    pub fn count<C: Component>(&self) -> usize {
        self.store::<C>().map_or(0, |store| store.len())
    }

    /// Component ids owned by `entity`, in id order.
    pub fn components(&self, entity: Entity) -> Vec<component::Id> {
        self.membership.components(entity)
    }

    /// View every entity owning all components of `D`.
    ///
    /// # Panics
    /// Panics if `D` names the same component more than once.
    pub fn view<D: Data>(&mut self) -> View<'_, D> {
        View::new(self)
    }

    /// Create a detached cursor over every entity owning all components of `D`.
    ///
    /// # Panics
    /// Panics if `D` names the same component more than once.
    pub fn cursor<D: Data>(&mut self) -> Cursor {
        Cursor::new::<D>(self)
    }

    /// Destroy every entity and drop every component. Stores stay registered.
    pub fn clear(&mut self) {
        let dropped = self.teardown_stores();
        let live: Vec<Entity> = self.membership.entities().collect();
        for &entity in &live {
            self.membership.remove_entity(entity);
            self.entities.free(entity);
        }
        debug!(
            "cleared {} entities and {} components",
            live.len(),
            dropped
        );
    }

    fn teardown_stores(&mut self) -> usize {
        self.storage.iter_mut().map(|store| store.teardown()).sum()
    }

    #[inline]
    pub(crate) fn storage(&self) -> &Storage {
        &self.storage
    }

    #[inline]
    pub(crate) fn split_for_view(&mut self) -> (&TypeRegistry, &mut Storage) {
        (&self.types, &mut self.storage)
    }
}

impl Drop for Registry {
    fn drop(&mut self) {
        let dropped = self.teardown_stores();
        debug!(
            "registry teardown dropped {} components from {} stores",
            dropped,
            self.storage.len()
        );
    }
}
