//! Component sets a view can iterate.
//!
//! The [`Data`] trait is implemented by:
//! - `&C`: shared access to component `C`
//! - `&mut C`: exclusive access to component `C`
//! - Tuples of `Data` types, nested or flat, up to 26 elements
//!
//! Each implementation knows how to claim its store out of the registry's [`StoreSlots`],
//! report the size of its smallest store, probe an entity for membership, and fetch the
//! components of a matching entity.
//!
//! # Examples
//!
//! ```rust,ignore
//! registry.view::<&Position>();
//! registry.view::<(&Position, &mut Velocity)>();
//! registry.view::<(&Position, (&Velocity, &mut Health))>();
//! ```

use std::{any::type_name, marker::PhantomData};

use crate::ecs::{
    component::{self, Component},
    entity::Entity,
    registry::{Registry, TypeRegistry},
    storage::{
        ComponentStore, StoreSlots,
        index::{HashIndex, Index},
    },
};

/// Types that can be used as the component set of a view.
pub trait Data: Sized {
    /// What the view yields for one matching entity.
    type Item<'w>;

    /// Claimed store handles for one iteration pass.
    type State<'w>;

    /// Make sure a store exists for every component and append the component ids, in order.
    fn register(registry: &mut Registry, ids: &mut Vec<component::Id>);

    /// Claim the stores of this set out of `slots`.
    ///
    /// # Panics
    /// Panics if a component's slot was already claimed, i.e. the same component is requested
    /// more than once.
    fn borrow<'w>(types: &TypeRegistry, slots: &mut StoreSlots<'w>) -> Self::State<'w>;

    /// Fold the smallest entity list of this set into `current`.
    ///
    /// On ties the list seen first is kept.
    fn smallest<'w>(state: &Self::State<'w>, current: Option<&'w [Entity]>)
    -> Option<&'w [Entity]>;

    /// Check that `entity` is present in every store of this set other than `driver`.
    ///
    /// Each store that is actually consulted increments `probes`.
    fn contains<'w>(
        state: &Self::State<'w>,
        entity: Entity,
        driver: &[Entity],
        probes: &mut usize,
    ) -> bool;

    /// Fetch the components of `entity`.
    ///
    /// # Safety
    ///
    /// The caller must not fetch the same entity twice while an earlier item for it is alive,
    /// otherwise exclusive references would alias.
    unsafe fn fetch<'w>(state: &Self::State<'w>, entity: Entity) -> Option<Self::Item<'w>>;
}

/// Exclusive access to the rows of one store during a view pass.
pub struct MutState<'w, C> {
    entities: &'w [Entity],
    index: &'w HashIndex,
    dense: *mut C,
    len: usize,
    _marker: PhantomData<&'w mut [C]>,
}

/// Claim the store for `C` out of `slots`.
fn claim<'w, C: Component>(
    types: &TypeRegistry,
    slots: &mut StoreSlots<'w>,
) -> &'w mut ComponentStore<C> {
    let name = type_name::<C>();
    let id = types
        .get::<C>()
        .unwrap_or_else(|| panic!("component '{name}' has no store"));
    let store = slots
        .get_mut(id.index())
        .and_then(Option::take)
        .unwrap_or_else(|| panic!("component '{name}' is requested more than once in a view"));
    store
        .as_any_mut()
        .downcast_mut::<ComponentStore<C>>()
        .unwrap_or_else(|| panic!("store {} does not hold '{name}'", id.index()))
}

#[inline]
fn pick<'w>(entities: &'w [Entity], current: Option<&'w [Entity]>) -> Option<&'w [Entity]> {
    match current {
        Some(current) if current.len() <= entities.len() => Some(current),
        _ => Some(entities),
    }
}

impl<C: Component> Data for &C {
    type Item<'w> = &'w C;
    type State<'w> = &'w ComponentStore<C>;

    fn register(registry: &mut Registry, ids: &mut Vec<component::Id>) {
        ids.push(registry.ensure_store::<C>());
    }

    fn borrow<'w>(types: &TypeRegistry, slots: &mut StoreSlots<'w>) -> Self::State<'w> {
        claim::<C>(types, slots)
    }

    #[inline]
    fn smallest<'w>(
        state: &Self::State<'w>,
        current: Option<&'w [Entity]>,
    ) -> Option<&'w [Entity]> {
        let store: &'w ComponentStore<C> = *state;
        pick(store.entities(), current)
    }

    #[inline]
    fn contains<'w>(
        state: &Self::State<'w>,
        entity: Entity,
        driver: &[Entity],
        probes: &mut usize,
    ) -> bool {
        if std::ptr::eq(state.entities(), driver) {
            return true;
        }
        *probes += 1;
        state.contains(entity)
    }

    #[inline]
    unsafe fn fetch<'w>(state: &Self::State<'w>, entity: Entity) -> Option<Self::Item<'w>> {
        let store: &'w ComponentStore<C> = *state;
        store.get(entity)
    }
}

impl<C: Component> Data for &mut C {
    type Item<'w> = &'w mut C;
    type State<'w> = MutState<'w, C>;

    fn register(registry: &mut Registry, ids: &mut Vec<component::Id>) {
        ids.push(registry.ensure_store::<C>());
    }

    fn borrow<'w>(types: &TypeRegistry, slots: &mut StoreSlots<'w>) -> Self::State<'w> {
        let (entities, index, dense) = claim::<C>(types, slots).split_mut();
        MutState {
            entities,
            index,
            len: dense.len(),
            dense: dense.as_mut_ptr(),
            _marker: PhantomData,
        }
    }

    #[inline]
    fn smallest<'w>(
        state: &Self::State<'w>,
        current: Option<&'w [Entity]>,
    ) -> Option<&'w [Entity]> {
        pick(state.entities, current)
    }

    #[inline]
    fn contains<'w>(
        state: &Self::State<'w>,
        entity: Entity,
        driver: &[Entity],
        probes: &mut usize,
    ) -> bool {
        if std::ptr::eq(state.entities, driver) {
            return true;
        }
        *probes += 1;
        state.index.contains(entity)
    }

    #[inline]
    unsafe fn fetch<'w>(state: &Self::State<'w>, entity: Entity) -> Option<Self::Item<'w>> {
        let row = state.index.get(entity)?.index();
        if row >= state.len {
            return None;
        }
        // SAFETY: `row` is in bounds of the claimed slice, the slice is borrowed exclusively for
        // 'w, and the caller guarantees each entity (and so each row) is fetched once.
        Some(unsafe { &mut *state.dense.add(row) })
    }
}

macro_rules! impl_data_tuple {
    ($($name: ident),*) => {
        #[allow(non_snake_case)]
        impl<$($name: Data),*> Data for ($($name,)*) {
            type Item<'w> = ($($name::Item<'w>,)*);
            type State<'w> = ($($name::State<'w>,)*);

            fn register(registry: &mut Registry, ids: &mut Vec<component::Id>) {
                $($name::register(registry, ids);)*
            }

            fn borrow<'w>(types: &TypeRegistry, slots: &mut StoreSlots<'w>) -> Self::State<'w> {
                ($($name::borrow(types, slots),)*)
            }

            #[inline]
            fn smallest<'w>(
                state: &Self::State<'w>,
                current: Option<&'w [Entity]>,
            ) -> Option<&'w [Entity]> {
                let ($($name,)*) = state;
                $(let current = $name::smallest($name, current);)*
                current
            }

            #[inline]
            fn contains<'w>(
                state: &Self::State<'w>,
                entity: Entity,
                driver: &[Entity],
                probes: &mut usize,
            ) -> bool {
                let ($($name,)*) = state;
                true $(&& $name::contains($name, entity, driver, probes))*
            }

            #[inline]
            unsafe fn fetch<'w>(state: &Self::State<'w>, entity: Entity) -> Option<Self::Item<'w>> {
                let ($($name,)*) = state;
                // SAFETY: forwarded from the caller; distinct elements claim distinct stores.
                unsafe { Some(($($name::fetch($name, entity)?,)*)) }
            }
        }
    };
}

crate::all_tuples!(impl_data_tuple);
