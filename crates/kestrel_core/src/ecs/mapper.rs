//! # Component Mappers
//!
//! High performance component retrieval for a single component type.
//!
//! A mapper resolves its column once, at construction, with a single checked
//! downcast. Every lookup after that is a plain index into a `Bag<C>`.
//! Mappers only borrow storage immutably, so a system can hold one per
//! component type it reads.

use super::component::{Component, ComponentType};
use super::entity::Entity;
use super::storage::ComponentManager;
use crate::collections::Bag;
use crate::error::EcsResult;

/// Typed, read-only view of one component column.
///
/// The mapper shares a borrow of the [`ComponentManager`], so storage cannot
/// be mutated (or reallocated) while a mapper is alive.
///
/// # Example
///
/// ```rust
/// use kestrel_core::{Component, World};
///
/// struct Health(u32);
/// impl Component for Health {}
///
/// let mut world = World::new();
/// let entity = world.create_entity();
/// world.add_entity(entity);
/// world.add_component(entity, Health(10))?;
///
/// let health = world.mapper::<Health>()?;
/// assert!(health.has(entity));
/// assert_eq!(health.get(entity).0, 10);
/// assert_eq!(world.get_component::<Health>(entity).map(|h| h.0), Some(10));
/// # Ok::<(), kestrel_core::EcsError>(())
/// ```
pub struct ComponentMapper<'a, C: Component> {
    ty: ComponentType,
    components: &'a Bag<C>,
}

impl<'a, C: Component> ComponentMapper<'a, C> {
    /// Binds a mapper to the `ty` column of `manager`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentTypeMismatch`](crate::EcsError::ComponentTypeMismatch)
    /// if `ty` was not registered for `C`, or
    /// [`EcsError::UnregisteredComponent`](crate::EcsError::UnregisteredComponent)
    /// if the column was never created (see [`ComponentManager::ensure_column`]).
    pub fn new(ty: ComponentType, manager: &'a ComponentManager) -> EcsResult<Self> {
        let components = manager.components_by_type::<C>(ty)?;
        Ok(Self { ty, components })
    }

    /// Fast retrieval of the component of an entity known to own one.
    ///
    /// No bounds checks beyond the slice index. Use it where ownership is
    /// already established, e.g. by a component bitset test.
    ///
    /// # Panics
    ///
    /// Panics if the id lies past the column's capacity or the entity has no
    /// component of this type.
    #[inline]
    #[must_use]
    pub fn get(&self, entity: Entity) -> &'a C {
        match self.components.get(entity.index()) {
            Some(component) => component,
            None => panic!("{} has no component of {}", entity, self.ty),
        }
    }

    /// Safe retrieval: `None` if the entity has no component of this type.
    #[inline]
    #[must_use]
    pub fn get_safe(&self, entity: Entity) -> Option<&'a C> {
        if self.components.is_index_within_bounds(entity.index()) {
            return self.components.get(entity.index());
        }
        None
    }

    /// Checks if the entity has a component of this type.
    #[inline]
    #[must_use]
    pub fn has(&self, entity: Entity) -> bool {
        self.get_safe(entity).is_some()
    }

    /// Iterates over every entity owning a component of this type, in id order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &'a C)> {
        self.components
            .iter_slots()
            .filter_map(|(id, component)| Some((Entity::new(u32::try_from(id).ok()?), component)))
    }

    /// The component type this mapper reads.
    #[inline]
    #[must_use]
    pub const fn component_type(&self) -> ComponentType {
        self.ty
    }
}
