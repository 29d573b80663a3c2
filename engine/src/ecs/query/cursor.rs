use log::{trace, warn};

use crate::ecs::{
    component,
    entity::Entity,
    error::EcsError,
    query::{Data, assert_disjoint},
    registry::Registry,
};

/// A store taking part in a cursor, with the generation it had when the pass started.
#[derive(Debug, Clone, Copy)]
struct Stamp {
    id: component::Id,
    generation: u64,
}

/// A detached view position that fails fast when the stores it walks change.
///
/// Unlike [`View`](super::View), a cursor does not borrow the registry between steps, so the
/// caller may mutate the registry while holding one. Any insert, removal, destroy or teardown
/// touching a participating store makes the following [`next`](Cursor::next) return
/// [`EcsError::ViewInvalidated`] until the cursor is [restarted](Cursor::restart).
///
/// A cursor must only be advanced against the registry that created it.
#[derive(Debug, Clone)]
pub struct Cursor {
    ids: Vec<component::Id>,
    stamps: Vec<Stamp>,
    driver: Option<component::Id>,
    position: usize,
    probes: usize,
}

impl Cursor {
    /// Create a cursor over the components of `D`, creating any missing store.
    ///
    /// # Panics
    /// Panics if `D` names the same component more than once.
    pub(crate) fn new<D: Data>(registry: &mut Registry) -> Self {
        let mut ids = Vec::new();
        D::register(registry, &mut ids);
        assert_disjoint(&ids, registry.types());

        let mut cursor = Self {
            ids,
            stamps: Vec::new(),
            driver: None,
            position: 0,
            probes: 0,
        };
        cursor.restart(registry);
        cursor
    }

    /// Rewind to the start, re-resolving the driving store and re-stamping every store.
    pub fn restart(&mut self, registry: &Registry) {
        let storage = registry.storage();
        self.stamps = self
            .ids
            .iter()
            .filter_map(|&id| {
                storage.get(id).map(|store| Stamp {
                    id,
                    generation: store.generation(),
                })
            })
            .collect();
        self.driver = self
            .ids
            .iter()
            .copied()
            .filter_map(|id| storage.get(id).map(|store| (id, store.len())))
            .min_by_key(|&(_, len)| len)
            .map(|(id, _)| id);
        self.position = 0;
        self.probes = 0;
        trace!("cursor restarted with driving store {:?}", self.driver);
    }

    /// Advance to the next entity owning every component.
    ///
    /// Returns `Ok(None)` once the pass is exhausted.
    pub fn next(&mut self, registry: &Registry) -> Result<Option<Entity>, EcsError> {
        let storage = registry.storage();
        for stamp in &self.stamps {
            let current = storage.get(stamp.id).map(|store| store.generation());
            if current != Some(stamp.generation) {
                let component = registry
                    .types()
                    .get_info(stamp.id)
                    .map(|info| info.name())
                    .unwrap_or("<unregistered>");
                let err = EcsError::ViewInvalidated { component };
                warn!("{err}");
                return Err(err);
            }
        }

        let Some(driver_id) = self.driver else {
            return Ok(None);
        };
        let Some(driver) = storage.get(driver_id) else {
            return Ok(None);
        };

        'candidates: while let Some(&entity) = driver.entities().get(self.position) {
            self.position += 1;
            for stamp in &self.stamps {
                if stamp.id == driver_id {
                    continue;
                }
                self.probes += 1;
                if !storage.get(stamp.id).is_some_and(|store| store.contains(entity)) {
                    continue 'candidates;
                }
            }
            return Ok(Some(entity));
        }
        Ok(None)
    }

    /// Membership probes issued against non-driving stores during this pass.
    #[inline]
    pub fn probes(&self) -> usize {
        self.probes
    }
}
