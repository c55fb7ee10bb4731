//! Entity identity and the capability-keyed component map.
//!
//! An [`EntityId`] is a lightweight `u64` sequence number minted by the
//! [`EntityManager`](crate::manager::EntityManager); ids are never reused.
//! The [`Entity`] itself carries a uuid for display identity, a mutable name,
//! the component map, id-based parent/child links, and its observer list.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::component::{Capability, Component};
use crate::events::{ComponentEvent, ObserverId, ObserverList};

/// A unique entity identifier.
///
/// Ids are monotonically assigned by the manager that owns the entity and
/// are never reassigned after removal. Hierarchy links are expressed in ids,
/// so entities never hold references to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl EntityId {
    /// The null / invalid entity sentinel.
    pub const INVALID: EntityId = EntityId(0);

    /// Create an entity id from a raw `u64`.
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` identifier.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }

    /// Returns `true` if this is a valid (non-zero) id.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A dynamically composed entity: identity plus a map from capability tag to
/// exactly one component instance.
///
/// Entities are minted by
/// [`EntityManager::create_entity`](crate::manager::EntityManager::create_entity),
/// assembled while detached, and registered immediately afterwards.
/// Component attach/detach on a
/// *registered* entity should go through the manager so cached query results
/// stay exact; the methods here are the assembly primitives and the point
/// where lifecycle events fire.
pub struct Entity {
    id: EntityId,
    uuid: Uuid,
    name: String,
    components: HashMap<Capability, Box<dyn Component>>,
    parent: Option<EntityId>,
    children: Vec<EntityId>,
    observers: ObserverList,
}

impl Entity {
    /// Build an entity around a freshly minted id. Only the manager mints
    /// ids, so this stays crate-internal.
    pub(crate) fn new(id: EntityId) -> Self {
        Self {
            id,
            uuid: Uuid::new_v4(),
            name: String::new(),
            components: HashMap::new(),
            parent: None,
            children: Vec::new(),
            observers: ObserverList::new(),
        }
    }

    /// The manager-assigned sequence id.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// The generated display identifier (random v4 uuid).
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// The mutable display name. Empty by default.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the entity.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    // ── Components ──────────────────────────────────────────────────────────

    /// Attach a component under its kind's capability tag.
    ///
    /// The component's owner is set to this entity and observers are
    /// notified. A prior occupant of the same tag is silently replaced and
    /// handed back with its owner cleared; no removal event fires for it,
    /// and any external handles it holds are the caller's to release.
    pub fn add_component<C: Component>(&mut self, component: C) -> Option<Box<dyn Component>> {
        let tag = C::kind();
        let mut boxed: Box<dyn Component> = Box::new(component);
        boxed.set_owner(Some(self.id));

        let mut replaced = self.components.insert(tag, boxed);
        if let Some(old) = replaced.as_mut() {
            old.set_owner(None);
        }

        if let Some(component) = self.components.get(&tag) {
            self.observers.notify(&ComponentEvent::Added {
                entity: self.id,
                capability: tag,
                component: component.as_ref(),
            });
        }
        replaced
    }

    /// The component under `tag`, type-erased. `None` is an expected
    /// absence, never an error.
    #[must_use]
    pub fn get_component(&self, tag: Capability) -> Option<&dyn Component> {
        self.components.get(&tag).map(|c| c.as_ref())
    }

    /// Mutable access to the component under `tag`.
    pub fn get_component_mut(&mut self, tag: Capability) -> Option<&mut dyn Component> {
        self.components.get_mut(&tag).map(|c| c.as_mut())
    }

    /// Typed access to the component of kind `C`.
    #[must_use]
    pub fn component<C: Component>(&self) -> Option<&C> {
        self.components.get(&C::kind())?.downcast_ref()
    }

    /// Typed mutable access to the component of kind `C`.
    pub fn component_mut<C: Component>(&mut self) -> Option<&mut C> {
        self.components.get_mut(&C::kind())?.downcast_mut()
    }

    /// O(1) presence check.
    #[must_use]
    pub fn has_component(&self, tag: Capability) -> bool {
        self.components.contains_key(&tag)
    }

    /// Detach and return the component under `tag`, clearing its owner and
    /// notifying observers. An absent tag is a silent no-op: `None`, no
    /// event.
    pub fn remove_component(&mut self, tag: Capability) -> Option<Box<dyn Component>> {
        let mut component = self.components.remove(&tag)?;
        component.set_owner(None);
        self.observers.notify(&ComponentEvent::Removed {
            entity: self.id,
            capability: tag,
            component: component.as_ref(),
        });
        Some(component)
    }

    /// The capability tags currently attached, in unspecified order.
    pub fn capabilities(&self) -> impl Iterator<Item = Capability> + '_ {
        self.components.keys().copied()
    }

    /// Bitmask over the attached capability tags, for filter matching.
    #[must_use]
    pub fn capability_mask(&self) -> u32 {
        self.components.keys().fold(0, |mask, tag| mask | tag.bit())
    }

    // ── Hierarchy ───────────────────────────────────────────────────────────

    /// The owning parent, if attached.
    #[must_use]
    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    /// Returns `true` if the entity is attached under a parent.
    #[must_use]
    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    /// The attached children, in attach order.
    #[must_use]
    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    pub(crate) fn set_parent(&mut self, parent: Option<EntityId>) {
        self.parent = parent;
    }

    pub(crate) fn attach_child(&mut self, child: EntityId) {
        self.children.push(child);
    }

    /// Drop `child` from the children sequence. Returns `false` if it was
    /// not attached here.
    pub(crate) fn detach_child(&mut self, child: EntityId) -> bool {
        let before = self.children.len();
        self.children.retain(|c| *c != child);
        self.children.len() != before
    }

    // ── Observers ───────────────────────────────────────────────────────────

    /// Subscribe to this entity's component lifecycle events.
    pub fn subscribe(&mut self, observer: impl FnMut(&ComponentEvent<'_>) + 'static) -> ObserverId {
        self.observers.subscribe(observer)
    }

    /// Unsubscribe a previously registered observer.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut capabilities: Vec<Capability> = self.capabilities().collect();
        capabilities.sort_unstable();
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("uuid", &self.uuid)
            .field("name", &self.name)
            .field("capabilities", &capabilities)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
