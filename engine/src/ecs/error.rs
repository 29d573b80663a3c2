//! Errors raised by registry operations.
//!
//! Every variant is a precondition the caller violated. Benign absence (looking up a component
//! an entity does not have, destroying a dead entity) is reported through `Option`/`bool`
//! instead and never produces an error.

use thiserror::Error;

use crate::ecs::entity::Entity;

/// Errors that can occur while manipulating a registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// A store for the component type already exists.
    #[error("component '{component}' is already registered")]
    DuplicateRegistration {
        /// The component type name.
        component: &'static str,
    },

    /// The entity already owns an instance of the component type.
    #[error("{entity} already has component '{component}'")]
    DuplicateComponent {
        /// The entity that was targeted.
        entity: Entity,
        /// The component type name.
        component: &'static str,
    },

    /// The entity was never created or has been destroyed.
    #[error("{0} is not alive")]
    UnknownEntity(Entity),

    /// A store taking part in a cursor changed after the cursor was positioned.
    #[error("view invalidated: store for '{component}' changed during iteration")]
    ViewInvalidated {
        /// The component type name of the changed store.
        component: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        // Given
        let entity = Entity::from(3);

        // Then
        assert_eq!(
            EcsError::DuplicateRegistration { component: "Position" }.to_string(),
            "component 'Position' is already registered"
        );
        assert_eq!(
            EcsError::DuplicateComponent {
                entity,
                component: "Position"
            }
            .to_string(),
            "Entity(3) already has component 'Position'"
        );
        assert_eq!(EcsError::UnknownEntity(entity).to_string(), "Entity(3) is not alive");
        assert_eq!(
            EcsError::ViewInvalidated { component: "Velocity" }.to_string(),
            "view invalidated: store for 'Velocity' changed during iteration"
        );
    }
}
