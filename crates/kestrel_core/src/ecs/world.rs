//! # ECS World
//!
//! The runtime context that owns the component type registry, the entity
//! manager, component storage and any peripheral managers.
//!
//! Lifecycle changes requested during a tick are queued and only take effect
//! in [`World::maintain`], which the host calls once per tick:
//!
//! ```text
//! added → enabled / disabled → deleted   (hooks, in that order)
//! ComponentManager::cleanup()            (exactly once, last)
//! ```
//!
//! Iterating entities of one type while marking others for deletion is
//! therefore safe within a tick.

use std::any::type_name;

use super::component::{Component, ComponentType, ComponentTypeRegistry};
use super::entity::{Entity, EntityManager};
use super::manager::Manager;
use super::mapper::ComponentMapper;
use super::storage::ComponentManager;
use crate::collections::{Bag, BitSet};
use crate::config::WorldConfig;
use crate::error::{EcsError, EcsResult};

/// The ECS World - container for all entity and component state.
///
/// # Example
///
/// ```rust
/// use kestrel_core::{Component, World};
///
/// struct Position { x: f32, y: f32 }
/// impl Component for Position {}
///
/// let mut world = World::new();
/// let entity = world.create_entity();
/// world.add_entity(entity);
/// world.add_component(entity, Position { x: 1.0, y: 2.0 })?;
/// world.maintain();
///
/// world.delete_entity(entity);
/// assert!(world.get_component::<Position>(entity).is_some());
/// world.maintain();
/// assert!(world.get_component::<Position>(entity).is_none());
/// # Ok::<(), kestrel_core::EcsError>(())
/// ```
pub struct World {
    registry: ComponentTypeRegistry,
    entity_manager: EntityManager,
    component_manager: ComponentManager,
    /// Peripheral managers, notified after the core managers.
    managers: Vec<Box<dyn Manager>>,

    added: Bag<Entity>,
    enabled: Bag<Entity>,
    disabled: Bag<Entity>,
    deleted: Bag<Entity>,
    /// Ids queued in `deleted` this tick.
    pending_deletes: BitSet,
}

impl World {
    /// Creates a world with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::build(&WorldConfig::default())
    }

    /// Creates a world from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidConfig`](crate::EcsError::InvalidConfig) if
    /// the configuration does not validate.
    pub fn with_config(config: &WorldConfig) -> EcsResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: &WorldConfig) -> Self {
        Self {
            registry: ComponentTypeRegistry::with_limit(config.max_component_types),
            entity_manager: EntityManager::with_capacity(config.entity_capacity),
            component_manager: ComponentManager::with_capacity(
                config.entity_capacity,
                config.component_type_capacity,
            ),
            managers: Vec::new(),
            added: Bag::new(),
            enabled: Bag::new(),
            disabled: Bag::new(),
            deleted: Bag::new(),
            pending_deletes: BitSet::new(),
        }
    }

    /// Registers a peripheral manager. Managers are notified in registration order.
    pub fn register_manager(&mut self, manager: Box<dyn Manager>) {
        self.managers.push(manager);
    }

    /// Issues a new entity id. The entity becomes live at the next
    /// [`Self::maintain`] after [`Self::add_entity`].
    pub fn create_entity(&mut self) -> Entity {
        self.entity_manager.create_entity()
    }

    /// Queues `entity` to become live.
    pub fn add_entity(&mut self, entity: Entity) {
        self.added.add(entity);
    }

    /// Queues `entity` to be re-enabled.
    pub fn enable(&mut self, entity: Entity) {
        self.enabled.add(entity);
    }

    /// Queues `entity` to be disabled.
    pub fn disable(&mut self, entity: Entity) {
        self.disabled.add(entity);
    }

    /// Queues `entity` for deletion. Its components stay readable until the
    /// next [`Self::maintain`]. Deleting twice in one tick is a no-op.
    ///
    /// `entity` must have come from [`Self::create_entity`]. Deleting an id
    /// that was created but never added still returns it to the pool.
    pub fn delete_entity(&mut self, entity: Entity) {
        if self.pending_deletes.insert(entity.index()) {
            self.deleted.add(entity);
        }
    }

    /// Applies every queued lifecycle change, then removes the components of
    /// deleted entities.
    ///
    /// Returns the number of entities whose components were cleaned up.
    pub fn maintain(&mut self) -> usize {
        let mut targets = Targets {
            entity_manager: &mut self.entity_manager,
            component_manager: &mut self.component_manager,
            managers: &mut self.managers,
        };
        targets.dispatch(&mut self.added, |manager, entity| manager.added(entity));
        targets.dispatch(&mut self.disabled, |manager, entity| manager.disabled(entity));
        targets.dispatch(&mut self.enabled, |manager, entity| manager.enabled(entity));
        targets.dispatch(&mut self.deleted, |manager, entity| manager.deleted(entity));
        self.pending_deletes.clear();

        self.component_manager.cleanup()
    }

    /// Returns the component type for `C`, registering it and creating its
    /// column on first reference.
    ///
    /// Register every component type a system maps before calling
    /// [`Self::mapper`].
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::TypeRegistryExhausted`](crate::EcsError::TypeRegistryExhausted)
    /// if `C` is new and the registry is full.
    pub fn component_type<C: Component>(&mut self) -> EcsResult<ComponentType> {
        let ty = self.registry.type_for::<C>()?;
        self.component_manager.ensure_column::<C>(ty)?;
        Ok(ty)
    }

    /// Attaches `component` to `entity`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::TypeRegistryExhausted`](crate::EcsError::TypeRegistryExhausted)
    /// if `C` is new and the registry is full.
    pub fn add_component<C: Component>(&mut self, entity: Entity, component: C) -> EcsResult<()> {
        let ty = self.registry.type_for::<C>()?;
        self.component_manager.add_component(entity, ty, component)
    }

    /// Detaches the `C` component from `entity`. Returns `false` if it had none.
    pub fn remove_component<C: Component>(&mut self, entity: Entity) -> bool {
        match self.registry.get::<C>() {
            Some(ty) => self.component_manager.remove_component(entity, ty),
            None => false,
        }
    }

    /// Gets the `C` component of `entity`.
    #[must_use]
    pub fn get_component<C: Component>(&self, entity: Entity) -> Option<&C> {
        let ty = self.registry.get::<C>()?;
        self.component_manager.get_component(entity, ty)
    }

    /// Mutable variant of [`Self::get_component`].
    pub fn get_component_mut<C: Component>(&mut self, entity: Entity) -> Option<&mut C> {
        let ty = self.registry.get::<C>()?;
        self.component_manager.get_component_mut(entity, ty)
    }

    /// Creates a mapper over every `C` component.
    ///
    /// Mappers share the world immutably, so several can be alive at once.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnregisteredComponent`] if `C` was never passed to
    /// [`Self::component_type`] or [`Self::add_component`].
    pub fn mapper<C: Component>(&self) -> EcsResult<ComponentMapper<'_, C>> {
        let ty = self
            .registry
            .get::<C>()
            .ok_or(EcsError::UnregisteredComponent {
                name: type_name::<C>(),
            })?;
        ComponentMapper::new(ty, &self.component_manager)
    }

    /// The component type registry of this world.
    #[must_use]
    pub const fn registry(&self) -> &ComponentTypeRegistry {
        &self.registry
    }

    /// The entity manager of this world.
    #[must_use]
    pub const fn entity_manager(&self) -> &EntityManager {
        &self.entity_manager
    }

    /// The component storage of this world.
    #[must_use]
    pub const fn component_manager(&self) -> &ComponentManager {
        &self.component_manager
    }

    /// Checks if an entity is live.
    #[inline]
    #[must_use]
    pub fn is_active(&self, entity: Entity) -> bool {
        self.entity_manager.is_active(entity.id())
    }

    /// Checks if an entity is enabled.
    #[inline]
    #[must_use]
    pub fn is_enabled(&self, entity: Entity) -> bool {
        self.entity_manager.is_enabled(entity.id())
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Hook receivers, in notification order.
struct Targets<'a> {
    entity_manager: &'a mut EntityManager,
    component_manager: &'a mut ComponentManager,
    managers: &'a mut [Box<dyn Manager>],
}

impl Targets<'_> {
    /// Notifies every receiver of every queued entity, then empties the queue
    /// in place.
    fn dispatch<F>(&mut self, queue: &mut Bag<Entity>, hook: F)
    where
        F: Fn(&mut dyn Manager, Entity),
    {
        for &entity in queue.iter() {
            hook(&mut *self.entity_manager, entity);
            hook(&mut *self.component_manager, entity);
            for manager in self.managers.iter_mut() {
                hook(&mut **manager, entity);
            }
        }
        queue.clear();
    }
}
