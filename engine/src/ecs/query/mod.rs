//! Views over entities that own a fixed set of component types.
//!
//! A [`View`] borrows the registry exclusively and yields `(Entity, items)` for every entity
//! that owns all requested components. Each pass starts from the smallest participating store
//! (the driving store) and probes the others, so the work is bounded by the rarest component.
//!
//! A [`Cursor`] is the detached counterpart: it holds no borrow, and instead checks each
//! participating store's generation on every step. Mutating a store the cursor walks makes the
//! next step fail with [`EcsError::ViewInvalidated`](crate::ecs::EcsError::ViewInvalidated).

mod cursor;
mod data;
mod view;

use fixedbitset::FixedBitSet;

use crate::ecs::{component, registry::TypeRegistry};

pub use cursor::Cursor;
pub use data::{Data, MutState};
pub use view::{View, ViewIter};

/// Panic if a component id appears more than once in a view's component set.
fn assert_disjoint(ids: &[component::Id], types: &TypeRegistry) {
    let mut seen = FixedBitSet::new();
    for id in ids {
        seen.grow(id.index() + 1);
        if seen.put(id.index()) {
            let name = types
                .get_info(*id)
                .map(|info| info.name())
                .unwrap_or("<unregistered>");
            panic!("component '{name}' is requested more than once in a view");
        }
    }
}
