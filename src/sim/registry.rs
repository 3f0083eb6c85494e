//! Entity registry
//!
//! Owns every live entity, sorted by handle for deterministic iteration.
//! Removal is two-phase: `mark_removed` flags, `compact` drops flagged
//! entities in one pass at the end of the tick.

use super::entity::{Category, Entity, EntityId, EntityKind};
use glam::Vec2;

#[derive(Debug, Clone)]
pub struct Registry {
    /// Live entities, ascending by id (ids are allocated monotonically)
    entities: Vec<Entity>,
    /// Next handle value; never reset, so handles are never reused
    next_id: u32,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a fresh handle
    fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Insert a new entity; `build` receives the freshly allocated handle
    pub fn add(&mut self, build: impl FnOnce(EntityId) -> Entity) -> EntityId {
        let id = self.next_entity_id();
        let mut entity = build(id);
        entity.id = id;
        self.entities.push(entity);
        id
    }

    /// Convenience for the common case of a resting entity
    pub fn spawn(&mut self, kind: EntityKind, pos: Vec2) -> EntityId {
        self.add(|id| Entity::new(id, kind, pos))
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.binary_search_by_key(&id, |e| e.id).ok()
    }

    /// Look up an entity, including ones already flagged this tick
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.index_of(id).map(|i| &self.entities[i])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.index_of(id).map(move |i| &mut self.entities[i])
    }

    /// Look up an entity that has not been flagged for removal
    pub fn live(&self, id: EntityId) -> Option<&Entity> {
        self.get(id).filter(|e| !e.removed)
    }

    /// True if the handle is unknown or already flagged
    pub fn is_removed(&self, id: EntityId) -> bool {
        self.get(id).is_none_or(|e| e.removed)
    }

    /// Flag an entity for removal. Returns false (and does nothing) when the
    /// handle is stale or already flagged.
    pub fn mark_removed(&mut self, id: EntityId) -> bool {
        match self.get_mut(id) {
            Some(e) if !e.removed => {
                e.removed = true;
                true
            }
            _ => false,
        }
    }

    /// Drop every flagged entity. Returns the handles that were removed, in
    /// ascending order.
    pub fn compact(&mut self) -> Vec<EntityId> {
        let mut dropped = Vec::new();
        self.entities.retain(|e| {
            if e.removed {
                dropped.push(e.id);
                false
            } else {
                true
            }
        });
        dropped
    }

    /// Flag every entity not matching `keep`
    pub fn mark_all_except(&mut self, keep: impl Fn(&Entity) -> bool) -> usize {
        let mut flagged = 0;
        for e in self.entities.iter_mut().filter(|e| !e.removed) {
            if !keep(e) {
                e.removed = true;
                flagged += 1;
            }
        }
        flagged
    }

    /// Number of live (unflagged) entities in a category
    pub fn count(&self, category: Category) -> usize {
        self.iter().filter(|e| e.category() == category).count()
    }

    /// Live (unflagged) entities, ascending by id
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| !e.removed)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut().filter(|e| !e.removed)
    }

    /// Live handles in a category
    pub fn ids(&self, category: Category) -> Vec<EntityId> {
        self.iter()
            .filter(|e| e.category() == category)
            .map(|e| e.id)
            .collect()
    }

    /// Total stored entities, flagged ones included
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
