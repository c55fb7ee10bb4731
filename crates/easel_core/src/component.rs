//! Core [`Component`] trait and capability tags.
//!
//! Every piece of data attached to an entity implements [`Component`]. Each
//! component kind claims exactly one [`Capability`] variant; the variant is
//! the map key inside an entity and the unit of filter membership, so lookup
//! never compares strings at runtime.

use std::any::Any;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// Capability tag, one variant per component kind.
///
/// Two different component kinds can never share a tag: the binding is part
/// of each kind's [`Component::kind`] implementation, and adding a new kind
/// means adding a variant here. Filters treat capabilities as set members,
/// so the discriminant doubles as a bit position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Capability {
    /// Spatial placement: position, rotation, scale.
    Transform,
    /// Projection parameters and the cached projection matrix.
    Projection,
    /// Look-at target, cached view matrix, and viewport state.
    View,
    /// A GUI element's bounding rectangle.
    GuiElement,
    /// Text content rendered inside a GUI element.
    GuiText,
    /// A mesh slot.
    MeshFilter,
    /// Material state for drawing a mesh.
    MeshRenderer,
}

impl Capability {
    /// Every capability, in declaration order.
    pub const ALL: [Capability; 7] = [
        Capability::Transform,
        Capability::Projection,
        Capability::View,
        Capability::GuiElement,
        Capability::GuiText,
        Capability::MeshFilter,
        Capability::MeshRenderer,
    ];

    /// The bit this capability occupies in a filter mask.
    #[must_use]
    pub const fn bit(self) -> u32 {
        1 << self as u32
    }
}

/// Book-keeping shared by every component: staleness, participation, and the
/// back-reference to the owning entity.
///
/// `dirty` defaults to `true`: freshly created state counts as stale, so
/// the first controller pass that sees a new component recomputes whatever
/// derives from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentState {
    /// Set when upstream data changed and derived state must be recomputed.
    pub dirty: bool,
    /// Cleared to exclude the component from processing without detaching it.
    pub enabled: bool,
    /// The entity this component is attached to, if any. Set on attach,
    /// cleared on detach; a component is attached to at most one entity.
    pub owner: Option<EntityId>,
}

impl ComponentState {
    /// Fresh state: dirty, enabled, unattached.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dirty: true,
            enabled: true,
            owner: None,
        }
    }
}

impl Default for ComponentState {
    fn default() -> Self {
        Self::new()
    }
}

/// The core component trait.
///
/// Concrete kinds embed a [`ComponentState`] and expose it through
/// [`state`](Component::state)/[`state_mut`](Component::state_mut); the
/// dirty/enabled/owner accessors are provided on top of that. The trait is
/// object-safe, so entities can store components as `Box<dyn Component>` and
/// hand them back out for typed access via [`as_any`](Component::as_any).
///
/// # Examples
///
/// ```rust
/// use easel_core::{Capability, Component, ComponentState};
///
/// #[derive(Debug, Default)]
/// struct Label {
///     state: ComponentState,
///     text: String,
/// }
///
/// impl Component for Label {
///     fn kind() -> Capability {
///         Capability::GuiText
///     }
///     fn state(&self) -> &ComponentState {
///         &self.state
///     }
///     fn state_mut(&mut self) -> &mut ComponentState {
///         &mut self.state
///     }
///     fn as_any(&self) -> &dyn std::any::Any {
///         self
///     }
///     fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
///         self
///     }
/// }
/// ```
pub trait Component: Any + fmt::Debug {
    /// The capability tag this component kind claims.
    fn kind() -> Capability
    where
        Self: Sized;

    /// Shared book-keeping state.
    fn state(&self) -> &ComponentState;

    /// Mutable access to the shared state.
    fn state_mut(&mut self) -> &mut ComponentState;

    /// Upcast for typed downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for typed downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Returns `true` if derived state must be recomputed.
    fn is_dirty(&self) -> bool {
        self.state().dirty
    }

    /// Mark or clear the staleness flag.
    fn set_dirty(&mut self, dirty: bool) {
        self.state_mut().dirty = dirty;
    }

    /// Returns `true` if the component participates in processing.
    fn is_enabled(&self) -> bool {
        self.state().enabled
    }

    /// Include or exclude the component from processing.
    fn set_enabled(&mut self, enabled: bool) {
        self.state_mut().enabled = enabled;
    }

    /// The entity this component is attached to.
    fn owner(&self) -> Option<EntityId> {
        self.state().owner
    }

    /// Returns `true` if the component is attached to an entity.
    fn has_owner(&self) -> bool {
        self.state().owner.is_some()
    }

    /// Set or clear the owning entity. Attach and detach go through the
    /// entity's component map, which keeps this in sync.
    fn set_owner(&mut self, owner: Option<EntityId>) {
        self.state_mut().owner = owner;
    }
}

impl dyn Component {
    /// Downcast a component reference to its concrete kind.
    #[must_use]
    pub fn downcast_ref<C: Component>(&self) -> Option<&C> {
        self.as_any().downcast_ref()
    }

    /// Downcast a mutable component reference to its concrete kind.
    #[must_use]
    pub fn downcast_mut<C: Component>(&mut self) -> Option<&mut C> {
        self.as_any_mut().downcast_mut()
    }
}
