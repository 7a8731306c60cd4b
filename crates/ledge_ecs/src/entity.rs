//! Entity type and registry.
//!
//! An [`Entity`] is a lightweight `u64` identifier with no inherent data.
//! The [`EntityRegistry`] issues identifiers and tracks which ones are alive,
//! independently of which components they hold.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A unique entity identifier.
///
/// Entities are pure identifiers. Components are attached to entities to
/// give them meaning, and other components refer to an entity by copying
/// its id rather than by holding a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entity(pub u64);

impl Entity {
    /// The null / invalid entity sentinel.
    pub const INVALID: Entity = Entity(0);

    /// Create an entity from a raw `u64` identifier.
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` identifier.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }

    /// Returns `true` if this is a valid (non-zero) entity.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Issues monotonically increasing entity ids and tracks which are alive.
///
/// Ids are never recycled, so a stale id held by another component can only
/// ever resolve to "not found".
#[derive(Debug)]
pub struct EntityRegistry {
    next_id: u64,
    alive: BTreeSet<Entity>,
}

impl EntityRegistry {
    /// Creates a new registry. IDs start at 1 (0 is reserved for [`Entity::INVALID`]).
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 1,
            alive: BTreeSet::new(),
        }
    }

    /// Issues a fresh entity id and marks it alive.
    pub fn create(&mut self) -> Entity {
        let entity = Entity(self.next_id);
        self.next_id += 1;
        self.alive.insert(entity);
        entity
    }

    /// Marks an entity as destroyed. Returns `true` if it was alive.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        self.alive.remove(&entity)
    }

    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.alive.contains(&entity)
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.alive.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alive.is_empty()
    }

    /// Number of ids issued so far, including destroyed ones.
    #[must_use]
    pub fn issued(&self) -> u64 {
        self.next_id - 1
    }

    /// Live entities in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.alive.iter().copied()
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_invalid() {
        assert!(!Entity::INVALID.is_valid());
        assert_eq!(Entity::INVALID.id(), 0);
        assert!(Entity::from_raw(42).is_valid());
    }

    #[test]
    fn test_registry_produces_unique_ids() {
        let mut registry = EntityRegistry::new();
        let e1 = registry.create();
        let e2 = registry.create();
        let e3 = registry.create();
        assert_eq!(e1.id(), 1);
        assert_eq!(e2.id(), 2);
        assert_eq!(e3.id(), 3);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_destroyed_ids_are_not_reused() {
        let mut registry = EntityRegistry::new();
        let e1 = registry.create();
        assert!(registry.destroy(e1));
        assert!(!registry.destroy(e1));
        assert!(!registry.is_alive(e1));

        let e2 = registry.create();
        assert_ne!(e1, e2);
        assert_eq!(registry.issued(), 2);
        assert_eq!(registry.iter().collect::<Vec<_>>(), vec![e2]);
    }

    #[test]
    fn test_display() {
        assert_eq!(Entity::from_raw(7).to_string(), "Entity(7)");
    }

    #[test]
    fn test_entity_serializes_as_bare_id() {
        let json = serde_json::to_string(&Entity::from_raw(7)).unwrap();
        assert_eq!(json, "7");
        let back: Entity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Entity::from_raw(7));
        let door: Option<Entity> = serde_json::from_str("null").unwrap();
        assert_eq!(door, None);
    }
}
