//! Kernel error types.

use thiserror::Error;

use crate::component::Capability;
use crate::entity::EntityId;

/// Errors surfaced by the entity manager and the controller cascades.
///
/// These are programming errors in the fail-fast sense: the caller
/// constructed or referenced something inconsistent, and the operation
/// aborts loudly instead of degrading. Expected absences (a missing
/// component tag, removing a non-child) are `Option`s and no-ops, not
/// errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EcsError {
    /// The entity id is not registered, or no longer live.
    #[error("entity {0} not found")]
    EntityNotFound(EntityId),

    /// A cascade observed a composite entity without a required peer
    /// component. Composite entities must be assembled atomically.
    #[error("entity {entity} is missing required component {capability:?}")]
    MissingComponent {
        /// The partially assembled entity.
        entity: EntityId,
        /// The absent peer.
        capability: Capability,
    },

    /// The attach would make an entity its own ancestor.
    #[error("attaching {child} under {parent} would create a hierarchy cycle")]
    HierarchyCycle {
        /// The prospective parent.
        parent: EntityId,
        /// The entity being attached.
        child: EntityId,
    },
}
