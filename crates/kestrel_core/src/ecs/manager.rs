//! # Lifecycle Hooks
//!
//! Anything that keeps per-entity state outside component storage (tags,
//! teams, players, the entity and component managers themselves) implements
//! [`Manager`] and is notified as entities change state.

use super::entity::Entity;

/// Receiver of entity lifecycle events.
///
/// Every hook defaults to a no-op. A peripheral manager that maps entities
/// to labels only needs [`Manager::deleted`] to purge its maps.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use kestrel_core::{Entity, Manager};
///
/// #[derive(Default)]
/// struct TagManager {
///     tags_by_entity: HashMap<Entity, String>,
///     entities_by_tag: HashMap<String, Entity>,
/// }
///
/// impl Manager for TagManager {
///     fn deleted(&mut self, entity: Entity) {
///         if let Some(tag) = self.tags_by_entity.remove(&entity) {
///             self.entities_by_tag.remove(&tag);
///         }
///     }
/// }
/// ```
pub trait Manager {
    /// The entity became live.
    fn added(&mut self, _entity: Entity) {}

    /// The entity was re-enabled.
    fn enabled(&mut self, _entity: Entity) {}

    /// The entity was disabled.
    fn disabled(&mut self, _entity: Entity) {}

    /// The entity is being removed.
    fn deleted(&mut self, _entity: Entity) {}
}
