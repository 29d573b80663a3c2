use std::marker::PhantomData;

use crate::ecs::{
    entity::Entity,
    query::{Data, assert_disjoint},
    registry::Registry,
};

/// A restartable view over every entity owning all components of `D`.
///
/// The view holds the registry exclusively, so no store can change while it, or an iterator
/// obtained from it, is alive.
pub struct View<'w, D: Data> {
    registry: &'w mut Registry,
    _marker: PhantomData<fn() -> D>,
}

impl<'w, D: Data> View<'w, D> {
    /// Create a view, creating any missing store.
    ///
    /// # Panics
    /// Panics if `D` names the same component more than once.
    pub(crate) fn new(registry: &'w mut Registry) -> Self {
        let mut ids = Vec::new();
        D::register(registry, &mut ids);
        assert_disjoint(&ids, registry.types());

        Self {
            registry,
            _marker: PhantomData,
        }
    }

    /// Start a new pass. The driving store is chosen against the current store sizes.
    pub fn iter(&mut self) -> ViewIter<'_, D> {
        ViewIter::new(self.registry)
    }
}

impl<'w, D: Data> IntoIterator for View<'w, D> {
    type Item = (Entity, D::Item<'w>);
    type IntoIter = ViewIter<'w, D>;

    fn into_iter(self) -> Self::IntoIter {
        ViewIter::new(self.registry)
    }
}

/// One pass over a [`View`].
///
/// Walks the driving store in dense order; the order is unspecified and changes with removals.
pub struct ViewIter<'w, D: Data> {
    state: D::State<'w>,
    driver: &'w [Entity],
    position: usize,
    probes: usize,
}

impl<'w, D: Data> ViewIter<'w, D> {
    fn new(registry: &'w mut Registry) -> Self {
        let (types, storage) = registry.split_for_view();
        let mut slots = storage.slots();
        let state = D::borrow(types, &mut slots);
        let driver = D::smallest(&state, None).unwrap_or(&[]);

        Self {
            state,
            driver,
            position: 0,
            probes: 0,
        }
    }

    /// Number of entities in the driving store.
    #[inline]
    pub fn candidates(&self) -> usize {
        self.driver.len()
    }

    /// Membership probes issued against non-driving stores so far.
    #[inline]
    pub fn probes(&self) -> usize {
        self.probes
    }
}

impl<'w, D: Data> Iterator for ViewIter<'w, D> {
    type Item = (Entity, D::Item<'w>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&entity) = self.driver.get(self.position) {
            self.position += 1;
            if !D::contains(&self.state, entity, self.driver, &mut self.probes) {
                continue;
            }
            // SAFETY: entities in the driving store are unique and the position only moves
            // forward, so no entity is fetched twice during this pass.
            if let Some(item) = unsafe { D::fetch(&self.state, entity) } {
                return Some((entity, item));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.driver.len() - self.position))
    }
}
