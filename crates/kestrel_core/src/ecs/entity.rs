//! # Entity Management
//!
//! Entities are bare integer identifiers. Everything else about them lives
//! elsewhere, indexed by id:
//! - liveness and the enabled flag in the [`EntityManager`]
//! - components and the component bitset in the
//!   [`ComponentManager`](super::ComponentManager)
//!
//! Ids are unique among live entities and reused after deletion.

use std::fmt;

use super::manager::Manager;
use crate::collections::{Bag, BitSet, Identity};
use crate::memory::IdentifierPool;

/// Unique identifier for a live entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Entity(u32);

impl Entity {
    /// Creates an entity handle from a raw id.
    #[inline]
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    #[inline]
    #[must_use]
    pub const fn id(self) -> u32 {
        self.0
    }

    /// Returns the id as an index into entity-indexed containers.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl Identity for Entity {
    #[inline]
    fn is_same(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Owns entity identity: which ids are live, which are disabled, and the
/// pool freed ids are recycled from.
///
/// The host drives it through [`Manager`] hooks:
/// `create_entity` → `added` → (`enabled` | `disabled`)* → `deleted`.
#[derive(Debug)]
pub struct EntityManager {
    /// Live entities, indexed by id.
    entities: Bag<Entity>,
    /// Ids explicitly disabled.
    disabled: BitSet,
    /// Ids checked out of the pool and not yet returned.
    outstanding: BitSet,
    active: usize,
    added: u64,
    created: u64,
    deleted: u64,
    identifier_pool: IdentifierPool,
}

impl EntityManager {
    /// Creates an entity manager with default container sizes.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(crate::collections::DEFAULT_CAPACITY)
    }

    /// Creates an entity manager pre-sized for `capacity` entities.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entities: Bag::with_capacity(capacity),
            disabled: BitSet::with_capacity(capacity),
            outstanding: BitSet::with_capacity(capacity),
            active: 0,
            added: 0,
            created: 0,
            deleted: 0,
            identifier_pool: IdentifierPool::new(),
        }
    }

    /// Issues a new entity id, recycling the most recently deleted one first.
    ///
    /// The entity is not live until [`Manager::added`] is called for it.
    pub fn create_entity(&mut self) -> Entity {
        let entity = Entity::new(self.identifier_pool.check_out());
        self.outstanding.insert(entity.index());
        self.created += 1;
        entity
    }

    /// Checks if the entity with this id is live.
    #[inline]
    #[must_use]
    pub fn is_active(&self, id: u32) -> bool {
        self.entities.get_safe(id as usize).is_some()
    }

    /// Checks if the entity with this id is enabled. Entities are enabled
    /// unless explicitly disabled.
    #[inline]
    #[must_use]
    pub fn is_enabled(&self, id: u32) -> bool {
        !self.disabled.contains(id as usize)
    }

    /// Gets the live entity with this id.
    #[inline]
    #[must_use]
    pub fn get_entity(&self, id: u32) -> Option<Entity> {
        self.entities.get_safe(id as usize).copied()
    }

    /// Number of live entities.
    #[inline]
    #[must_use]
    pub const fn active_entity_count(&self) -> usize {
        self.active
    }

    /// Number of ids issued since start. Always at least [`Self::total_added`].
    #[inline]
    #[must_use]
    pub const fn total_created(&self) -> u64 {
        self.created
    }

    /// Number of entities made live since start.
    #[inline]
    #[must_use]
    pub const fn total_added(&self) -> u64 {
        self.added
    }

    /// Number of entities deleted since start.
    #[inline]
    #[must_use]
    pub const fn total_deleted(&self) -> u64 {
        self.deleted
    }
}

impl Default for EntityManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Manager for EntityManager {
    fn added(&mut self, entity: Entity) {
        self.active += 1;
        self.added += 1;
        self.entities.set(entity.index(), entity);
    }

    fn enabled(&mut self, entity: Entity) {
        self.disabled.remove(entity.index());
    }

    fn disabled(&mut self, entity: Entity) {
        self.disabled.insert(entity.index());
    }

    fn deleted(&mut self, entity: Entity) {
        let was_live = self.entities.take(entity.index()).is_some();
        // Only ids still checked out go back; a second check-in would hand
        // the same id to two entities.
        let was_issued = self.outstanding.remove(entity.index());
        if !was_live && !was_issued {
            tracing::warn!("Ignoring delete of inactive {}", entity);
            return;
        }

        if was_live {
            self.active -= 1;
        }
        self.disabled.remove(entity.index());
        if was_issued {
            self.identifier_pool.check_in(entity.id());
        }
        self.deleted += 1;
    }
}
