//! The entity registry: an owning arena with capability-filtered queries.
//!
//! [`EntityManager`] mints identities, owns every live entity, keeps the
//! parent/child relation consistent, and answers capability-filtered queries
//! from cached buckets. Buckets are maintained eagerly: one is built the
//! first time its filter is queried and kept exact by every subsequent
//! mutation that goes through the manager, so per-tick query cost is a
//! bucket copy rather than an arena scan.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::component::{Capability, Component};
use crate::entity::{Entity, EntityId};
use crate::error::EcsError;
use crate::filter::{CapabilityFilter, FilterKey};

/// What happens to an entity's children when it is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovePolicy {
    /// Children stay live with their parent link cleared.
    Orphan,
    /// Children are removed recursively and dropped.
    Cascade,
}

/// The owning arena of live entities plus the filter-indexed query cache.
#[derive(Debug)]
pub struct EntityManager {
    next_id: u64,
    entities: HashMap<EntityId, Entity>,
    buckets: HashMap<FilterKey, BTreeSet<EntityId>>,
}

impl Default for EntityManager {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityManager {
    /// Create an empty manager. Ids start at 1 (0 is
    /// [`EntityId::INVALID`]).
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 1,
            entities: HashMap::new(),
            buckets: HashMap::new(),
        }
    }

    // ── Entity lifecycle ────────────────────────────────────────────────────

    /// Mint a detached entity with a fresh identity.
    ///
    /// The entity is not yet live: assemble its components, then register it
    /// with [`add_entity`](Self::add_entity). Every mint consumes an id, so
    /// ids stay unique even for entities that are never registered.
    #[must_use]
    pub fn create_entity(&mut self) -> Entity {
        let id = EntityId::from_raw(self.next_id);
        self.next_id += 1;
        Entity::new(id)
    }

    /// Mint a detached entity with a display name.
    #[must_use]
    pub fn create_named(&mut self, name: impl Into<String>) -> Entity {
        let mut entity = self.create_entity();
        entity.set_name(name);
        entity
    }

    /// Register an assembled entity, making it visible to queries.
    pub fn add_entity(&mut self, entity: Entity) -> EntityId {
        let id = entity.id();
        let mask = entity.capability_mask();
        debug!(entity = %id, name = entity.name(), "entity registered");
        self.entities.insert(id, entity);
        self.reindex(id, mask);
        id
    }

    /// Remove an entity, detaching it from its parent and applying `policy`
    /// to its children.
    ///
    /// Returns the removed entity so held external handles can be released;
    /// children removed by [`RemovePolicy::Cascade`] are dropped outright.
    /// A removed id is never reassigned.
    pub fn remove_entity(&mut self, id: EntityId, policy: RemovePolicy) -> Result<Entity, EcsError> {
        let entity = self
            .entities
            .remove(&id)
            .ok_or(EcsError::EntityNotFound(id))?;

        if let Some(parent_id) = entity.parent()
            && let Some(parent) = self.entities.get_mut(&parent_id)
        {
            parent.detach_child(id);
        }

        for child_id in entity.children().to_vec() {
            match policy {
                RemovePolicy::Orphan => {
                    if let Some(child) = self.entities.get_mut(&child_id) {
                        child.set_parent(None);
                    }
                }
                RemovePolicy::Cascade => {
                    if self.entities.contains_key(&child_id) {
                        self.remove_entity(child_id, RemovePolicy::Cascade)?;
                    }
                }
            }
        }

        self.drop_from_index(id);
        debug!(entity = %id, ?policy, "entity removed");
        Ok(entity)
    }

    /// Returns `true` if the entity is live.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Shared access to a live entity.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Mutable access to a live entity. Use this for component *state*;
    /// attaching or detaching components on a registered entity should go
    /// through [`add_component`](Self::add_component) /
    /// [`remove_component`](Self::remove_component) so query buckets stay
    /// exact.
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Number of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Every live entity id, sorted.
    #[must_use]
    pub fn entity_ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.entities.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    // ── Component operations ────────────────────────────────────────────────

    /// Attach a component to a live entity, keeping query buckets exact.
    ///
    /// Replaces and returns any prior occupant of the same capability tag.
    pub fn add_component<C: Component>(
        &mut self,
        id: EntityId,
        component: C,
    ) -> Result<Option<Box<dyn Component>>, EcsError> {
        let entity = self
            .entities
            .get_mut(&id)
            .ok_or(EcsError::EntityNotFound(id))?;
        let replaced = entity.add_component(component);
        let mask = entity.capability_mask();
        self.reindex(id, mask);
        Ok(replaced)
    }

    /// Detach a component from a live entity, keeping query buckets exact.
    ///
    /// An absent tag is a silent no-op returning `Ok(None)`.
    pub fn remove_component(
        &mut self,
        id: EntityId,
        tag: Capability,
    ) -> Result<Option<Box<dyn Component>>, EcsError> {
        let entity = self
            .entities
            .get_mut(&id)
            .ok_or(EcsError::EntityNotFound(id))?;
        let removed = entity.remove_component(tag);
        let mask = entity.capability_mask();
        self.reindex(id, mask);
        Ok(removed)
    }

    // ── Queries ─────────────────────────────────────────────────────────────

    /// Entities whose component map is a superset of the filter's tags,
    /// sorted by id.
    ///
    /// The result is a snapshot consistent with live state at call time:
    /// controllers iterate it freely while mutating the manager, and
    /// structural changes they make never affect the pass in flight.
    #[must_use]
    pub fn entities_matching(&mut self, filter: &CapabilityFilter) -> Vec<EntityId> {
        let key = filter.key();
        if !self.buckets.contains_key(&key) {
            let bucket: BTreeSet<EntityId> = self
                .entities
                .iter()
                .filter(|(_, entity)| key.matches(entity.capability_mask()))
                .map(|(id, _)| *id)
                .collect();
            debug!(tags = ?filter.tags(), matched = bucket.len(), "filter bucket built");
            self.buckets.insert(key, bucket);
        }
        self.buckets
            .get(&key)
            .map(|bucket| bucket.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Re-evaluate one entity against every cached bucket.
    fn reindex(&mut self, id: EntityId, mask: u32) {
        for (key, bucket) in &mut self.buckets {
            if key.matches(mask) {
                bucket.insert(id);
            } else {
                bucket.remove(&id);
            }
        }
    }

    /// Drop one entity from every cached bucket.
    fn drop_from_index(&mut self, id: EntityId) {
        for bucket in self.buckets.values_mut() {
            bucket.remove(&id);
        }
    }

    // ── Hierarchy ───────────────────────────────────────────────────────────

    /// Attach `child` under `parent`.
    ///
    /// The child is detached from any previous parent first, so the
    /// parent-link/children-sequence invariant holds atomically: after this
    /// returns, exactly one children sequence contains the child and the
    /// child's parent link names that entity. Attaching an entity under
    /// itself or under one of its own descendants is an error.
    pub fn add_child(&mut self, parent: EntityId, child: EntityId) -> Result<(), EcsError> {
        if !self.entities.contains_key(&parent) {
            return Err(EcsError::EntityNotFound(parent));
        }
        if !self.entities.contains_key(&child) {
            return Err(EcsError::EntityNotFound(child));
        }
        if parent == child || self.is_ancestor(child, parent) {
            return Err(EcsError::HierarchyCycle { parent, child });
        }

        let previous = self.entities.get(&child).and_then(Entity::parent);
        if let Some(prev_id) = previous
            && let Some(prev) = self.entities.get_mut(&prev_id)
        {
            prev.detach_child(child);
        }
        if let Some(p) = self.entities.get_mut(&parent) {
            p.attach_child(child);
        }
        if let Some(c) = self.entities.get_mut(&child) {
            c.set_parent(Some(parent));
        }
        Ok(())
    }

    /// Detach `child` from `parent`. Detaching an entity that is not a
    /// child of `parent` is a silent no-op.
    pub fn remove_child(&mut self, parent: EntityId, child: EntityId) -> Result<(), EcsError> {
        if !self.entities.contains_key(&child) {
            return Err(EcsError::EntityNotFound(child));
        }
        let detached = self
            .entities
            .get_mut(&parent)
            .ok_or(EcsError::EntityNotFound(parent))?
            .detach_child(child);
        if detached && let Some(c) = self.entities.get_mut(&child) {
            c.set_parent(None);
        }
        Ok(())
    }

    /// Returns `true` if `candidate` is an ancestor of `of`.
    fn is_ancestor(&self, candidate: EntityId, of: EntityId) -> bool {
        let mut current = self.entities.get(&of).and_then(Entity::parent);
        while let Some(id) = current {
            if id == candidate {
                return true;
            }
            current = self.entities.get(&id).and_then(Entity::parent);
        }
        false
    }
}
