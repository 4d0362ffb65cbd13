//! # Component Storage
//!
//! Two-level storage: an outer bag indexed by component type index, holding
//! one type-erased column per component type, each column a bag indexed by
//! entity id.
//!
//! ```text
//! components_by_type[0] (Position): [P0, -, P2, P3, ...]
//! components_by_type[1] (Velocity): [V0, -, -, V3, ...]
//! component_bits[3]:                {0, 1}
//! ```
//!
//! Bit `i` of an entity's bitset is set exactly when column `i` holds a
//! component at the entity's id.
//!
//! Deletion is two-phase. [`ComponentManager::mark_deleted`] only queues the
//! entity; its components stay readable until [`ComponentManager::cleanup`]
//! runs at the tick boundary.

use std::any::{type_name, Any};

use super::component::{Component, ComponentType};
use super::entity::Entity;
use super::manager::Manager;
use crate::collections::{Bag, BitSet, DEFAULT_CAPACITY};
use crate::error::{EcsError, EcsResult};

/// Type-erased view of a `Bag<C>` column.
trait ComponentColumn: Send + Sync {
    /// Vacates the slot for `id`, if any.
    fn clear_slot(&mut self, id: usize);
    /// The component at `id`, if any.
    fn component_at(&self, id: usize) -> Option<&dyn Any>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<C: Component> ComponentColumn for Bag<C> {
    fn clear_slot(&mut self, id: usize) {
        self.take(id);
    }

    fn component_at(&self, id: usize) -> Option<&dyn Any> {
        self.get_safe(id).map(|component| component as &dyn Any)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Storage for every component of every entity.
///
/// # Example
///
/// ```rust
/// use kestrel_core::{Component, ComponentManager, ComponentTypeRegistry, Entity};
///
/// struct Position(f32, f32);
/// impl Component for Position {}
///
/// let mut registry = ComponentTypeRegistry::new();
/// let mut components = ComponentManager::new();
/// let ty = registry.type_for::<Position>()?;
/// let entity = Entity::new(0);
///
/// components.add_component(entity, ty, Position(1.0, 2.0))?;
/// assert!(components.get_component::<Position>(entity, ty).is_some());
///
/// components.mark_deleted(entity);
/// assert!(components.get_component::<Position>(entity, ty).is_some());
/// components.cleanup();
/// assert!(components.get_component::<Position>(entity, ty).is_none());
/// # Ok::<(), kestrel_core::EcsError>(())
/// ```
pub struct ComponentManager {
    /// One column per component type index.
    components_by_type: Bag<Box<dyn ComponentColumn>>,
    /// Component membership per entity id.
    component_bits: Bag<BitSet>,
    /// Entities awaiting cleanup.
    deleted: Bag<Entity>,
    /// Initial slot count of entity-indexed containers.
    entity_capacity: usize,
}

impl ComponentManager {
    /// Creates an empty component manager with default container sizes.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY, DEFAULT_CAPACITY)
    }

    /// Creates an empty component manager.
    ///
    /// # Arguments
    ///
    /// * `entity_capacity` - Initial slots of every entity-indexed container
    /// * `type_capacity` - Initial slots of the per-type column table
    #[must_use]
    pub fn with_capacity(entity_capacity: usize, type_capacity: usize) -> Self {
        Self {
            components_by_type: Bag::with_capacity(type_capacity),
            component_bits: Bag::with_capacity(entity_capacity),
            deleted: Bag::new(),
            entity_capacity,
        }
    }

    /// Attaches `component` to `entity`, replacing any previous one of the same type.
    ///
    /// The column for `ty` is created on first use.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentTypeMismatch`] if `ty` was not registered for `C`.
    pub fn add_component<C: Component>(
        &mut self,
        entity: Entity,
        ty: ComponentType,
        component: C,
    ) -> EcsResult<()> {
        self.column_mut::<C>(ty)?.set(entity.index(), component);
        self.component_bits
            .get_or_insert_with(entity.index(), BitSet::new)
            .insert(ty.index());
        Ok(())
    }

    /// Detaches the `ty` component from `entity`.
    ///
    /// Returns `false`, changing nothing, if the entity does not own one.
    pub fn remove_component(&mut self, entity: Entity, ty: ComponentType) -> bool {
        let Some(bits) = self.component_bits.get_safe_mut(entity.index()) else {
            return false;
        };
        if !bits.remove(ty.index()) {
            return false;
        }
        if let Some(column) = self.components_by_type.get_mut(ty.index()) {
            column.clear_slot(entity.index());
        }
        true
    }

    /// Gets the `ty` component of `entity`.
    ///
    /// Returns `None` if the entity has none, or if `ty` was not registered for `C`.
    #[must_use]
    pub fn get_component<C: Component>(&self, entity: Entity, ty: ComponentType) -> Option<&C> {
        self.components_by_type
            .get_safe(ty.index())?
            .as_any()
            .downcast_ref::<Bag<C>>()?
            .get_safe(entity.index())
    }

    /// Mutable variant of [`Self::get_component`].
    pub fn get_component_mut<C: Component>(
        &mut self,
        entity: Entity,
        ty: ComponentType,
    ) -> Option<&mut C> {
        self.components_by_type
            .get_safe_mut(ty.index())?
            .as_any_mut()
            .downcast_mut::<Bag<C>>()?
            .get_safe_mut(entity.index())
    }

    /// Creates the empty column for `ty` if it does not exist yet.
    ///
    /// Once the column exists, [`Self::components_by_type`] and mappers can
    /// read it through a shared borrow, even before the first component of
    /// this type is added.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentTypeMismatch`] if `ty` was not registered for `C`.
    pub fn ensure_column<C: Component>(&mut self, ty: ComponentType) -> EcsResult<()> {
        self.column_mut::<C>(ty).map(|_| ())
    }

    /// Gets the column holding every `ty` component, indexed by entity id.
    ///
    /// The column is read-only: writes go through [`Self::add_component`] and
    /// [`Self::remove_component`] so the component bits stay in step.
    ///
    /// ```compile_fail
    /// use kestrel_core::{Component, ComponentManager, ComponentTypeRegistry, Entity};
    ///
    /// struct Hp(u32);
    /// impl Component for Hp {}
    ///
    /// let mut registry = ComponentTypeRegistry::new();
    /// let mut components = ComponentManager::new();
    /// let ty = registry.type_for::<Hp>().unwrap();
    /// components.ensure_column::<Hp>(ty).unwrap();
    /// components.components_by_type::<Hp>(ty).unwrap().set(2, Hp(7));
    /// ```
    ///
    /// [`Bag::iter`] stops at the column's `size`, which follows the last
    /// write. Use [`Bag::iter_slots`] to visit every stored component.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentTypeMismatch`] if `ty` was not registered
    /// for `C`, or [`EcsError::UnregisteredComponent`] if the column was never
    /// created.
    pub fn components_by_type<C: Component>(&self, ty: ComponentType) -> EcsResult<&Bag<C>> {
        let mismatch = EcsError::ComponentTypeMismatch {
            expected: type_name::<C>(),
            registered: ty.name(),
        };
        if !ty.is::<C>() {
            return Err(mismatch);
        }

        self.components_by_type
            .get_safe(ty.index())
            .ok_or(EcsError::UnregisteredComponent {
                name: type_name::<C>(),
            })?
            .as_any()
            .downcast_ref::<Bag<C>>()
            .ok_or(mismatch)
    }

    fn column_mut<C: Component>(&mut self, ty: ComponentType) -> EcsResult<&mut Bag<C>> {
        let mismatch = EcsError::ComponentTypeMismatch {
            expected: type_name::<C>(),
            registered: ty.name(),
        };
        if !ty.is::<C>() {
            return Err(mismatch);
        }

        let capacity = self.entity_capacity;
        self.components_by_type
            .get_or_insert_with(ty.index(), || {
                Box::new(Bag::<C>::with_capacity(capacity)) as Box<dyn ComponentColumn>
            })
            .as_any_mut()
            .downcast_mut::<Bag<C>>()
            .ok_or(mismatch)
    }

    /// Appends every component `entity` owns to `fill`, in ascending type index order.
    ///
    /// `fill` is an accumulator and is not cleared first.
    pub fn components_for<'a>(&'a self, entity: Entity, fill: &mut Bag<&'a dyn Any>) {
        let Some(bits) = self.component_bits.get_safe(entity.index()) else {
            return;
        };
        for index in bits {
            if let Some(component) = self
                .components_by_type
                .get(index)
                .and_then(|column| column.component_at(entity.index()))
            {
                fill.add(component);
            }
        }
    }

    /// Component membership of `entity`, or `None` if it never owned a component.
    #[must_use]
    pub fn component_bits(&self, entity: Entity) -> Option<&BitSet> {
        self.component_bits.get_safe(entity.index())
    }

    /// Queues `entity` for removal at the next [`Self::cleanup`].
    ///
    /// Its components remain readable until then.
    pub fn mark_deleted(&mut self, entity: Entity) {
        self.deleted.add(entity);
    }

    /// Number of entities queued for removal.
    #[inline]
    #[must_use]
    pub const fn pending_deletions(&self) -> usize {
        self.deleted.size()
    }

    /// Removes every component of every queued entity and empties the queue.
    ///
    /// Returns the number of entities processed.
    pub fn cleanup(&mut self) -> usize {
        let count = self.deleted.size();
        if count == 0 {
            return 0;
        }

        for entity in self.deleted.iter() {
            let Some(bits) = self.component_bits.get_safe_mut(entity.index()) else {
                continue;
            };
            for index in bits.iter() {
                if let Some(column) = self.components_by_type.get_mut(index) {
                    column.clear_slot(entity.index());
                }
            }
            bits.clear();
        }
        self.deleted.clear();

        tracing::debug!("Cleaned up components of {} deleted entities", count);
        count
    }
}

impl Default for ComponentManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Manager for ComponentManager {
    fn deleted(&mut self, entity: Entity) {
        self.mark_deleted(entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::component::ComponentTypeRegistry;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[derive(Debug, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
    }
    impl Component for Position {}

    #[derive(Debug, PartialEq)]
    struct Velocity {
        dx: f32,
        dy: f32,
    }
    impl Component for Velocity {}

    #[derive(Debug, PartialEq)]
    struct Name(&'static str);
    impl Component for Name {}

    struct Fixture {
        components: ComponentManager,
        position: ComponentType,
        velocity: ComponentType,
        name: ComponentType,
    }

    fn fixture() -> Fixture {
        let mut registry = ComponentTypeRegistry::new();
        Fixture {
            components: ComponentManager::with_capacity(4, 1),
            position: registry.type_for::<Position>().unwrap(),
            velocity: registry.type_for::<Velocity>().unwrap(),
            name: registry.type_for::<Name>().unwrap(),
        }
    }

    #[test]
    fn test_add_get_sets_bit() {
        let mut f = fixture();
        let entity = Entity::new(10);

        f.components
            .add_component(entity, f.velocity, Velocity { dx: 1.0, dy: 2.0 })
            .unwrap();

        assert_eq!(
            f.components.get_component::<Velocity>(entity, f.velocity),
            Some(&Velocity { dx: 1.0, dy: 2.0 })
        );
        let bits = f.components.component_bits(entity).unwrap();
        assert!(bits.contains(f.velocity.index()));
        assert!(!bits.contains(f.position.index()));
        assert_eq!(f.components.get_component::<Position>(entity, f.position), None);
    }

    #[test]
    fn test_add_replaces() {
        let mut f = fixture();
        let entity = Entity::new(0);
        f.components.add_component(entity, f.name, Name("a")).unwrap();
        f.components.add_component(entity, f.name, Name("b")).unwrap();

        assert_eq!(f.components.get_component::<Name>(entity, f.name), Some(&Name("b")));
    }

    #[test]
    fn test_remove_component() {
        let mut f = fixture();
        let entity = Entity::new(3);
        f.components
            .add_component(entity, f.position, Position { x: 0.0, y: 0.0 })
            .unwrap();

        assert!(f.components.remove_component(entity, f.position));
        assert_eq!(f.components.get_component::<Position>(entity, f.position), None);
        assert!(!f.components.component_bits(entity).unwrap().contains(f.position.index()));

        // Not owned anymore: no-op.
        assert!(!f.components.remove_component(entity, f.position));
        assert!(!f.components.remove_component(Entity::new(999), f.velocity));
    }

    #[test]
    fn test_get_component_mut() {
        let mut f = fixture();
        let entity = Entity::new(1);
        f.components
            .add_component(entity, f.position, Position { x: 1.0, y: 1.0 })
            .unwrap();

        if let Some(position) = f.components.get_component_mut::<Position>(entity, f.position) {
            position.x = 5.0;
        }
        assert_eq!(
            f.components.get_component::<Position>(entity, f.position),
            Some(&Position { x: 5.0, y: 1.0 })
        );
    }

    #[test]
    fn test_components_by_type_needs_a_column() {
        let mut f = fixture();
        assert!(matches!(
            f.components.components_by_type::<Velocity>(f.velocity),
            Err(EcsError::UnregisteredComponent { .. })
        ));

        f.components.ensure_column::<Velocity>(f.velocity).unwrap();
        assert!(f.components.components_by_type::<Velocity>(f.velocity).unwrap().is_empty());

        f.components
            .add_component(Entity::new(2), f.velocity, Velocity { dx: 3.0, dy: 4.0 })
            .unwrap();
        let column = f.components.components_by_type::<Velocity>(f.velocity).unwrap();
        assert_eq!(column.get_safe(2), Some(&Velocity { dx: 3.0, dy: 4.0 }));
    }

    #[test]
    fn test_deleted_slots_are_vacant_after_cleanup() {
        let mut f = fixture();
        let high = Entity::new(5);
        let low = Entity::new(2);
        let survivor = Entity::new(3);
        for entity in [high, low, survivor] {
            f.components.add_component(entity, f.name, Name("n")).unwrap();
        }

        f.components.mark_deleted(high);
        f.components.mark_deleted(low);
        f.components.cleanup();

        let column = f.components.components_by_type::<Name>(f.name).unwrap();
        let ids: Vec<usize> = column.iter_slots().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![survivor.index()]);
    }

    #[test]
    fn test_type_mismatch() {
        let mut f = fixture();
        let entity = Entity::new(0);

        let result = f.components.add_component(entity, f.position, Name("wrong"));
        assert!(matches!(result, Err(EcsError::ComponentTypeMismatch { .. })));
        assert!(f.components.component_bits(entity).is_none());
        assert!(f.components.components_by_type::<Name>(f.velocity).is_err());
        assert_eq!(f.components.get_component::<Name>(entity, f.position), None);
    }

    #[test]
    fn test_components_for_in_type_order() {
        let mut f = fixture();
        let entity = Entity::new(7);
        f.components.add_component(entity, f.name, Name("seven")).unwrap();
        f.components
            .add_component(entity, f.position, Position { x: 7.0, y: 7.0 })
            .unwrap();

        let mut fill: Bag<&dyn Any> = Bag::new();
        fill.add(&42_u32);
        f.components.components_for(entity, &mut fill);

        assert_eq!(fill.size(), 3);
        assert_eq!(fill.get(0).and_then(|c| c.downcast_ref::<u32>()), Some(&42));
        assert_eq!(
            fill.get(1).and_then(|c| c.downcast_ref::<Position>()),
            Some(&Position { x: 7.0, y: 7.0 })
        );
        assert_eq!(fill.get(2).and_then(|c| c.downcast_ref::<Name>()), Some(&Name("seven")));

        let mut empty: Bag<&dyn Any> = Bag::new();
        f.components.components_for(Entity::new(100), &mut empty);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_deletion_is_deferred_until_cleanup() {
        let mut f = fixture();
        let doomed = Entity::new(1);
        let survivor = Entity::new(2);
        for entity in [doomed, survivor] {
            f.components
                .add_component(entity, f.position, Position { x: 1.0, y: 1.0 })
                .unwrap();
            f.components
                .add_component(entity, f.velocity, Velocity { dx: 1.0, dy: 1.0 })
                .unwrap();
        }

        f.components.mark_deleted(doomed);
        assert_eq!(f.components.pending_deletions(), 1);
        assert!(f.components.get_component::<Position>(doomed, f.position).is_some());
        assert!(f.components.get_component::<Velocity>(doomed, f.velocity).is_some());

        assert_eq!(f.components.cleanup(), 1);
        assert_eq!(f.components.pending_deletions(), 0);
        assert!(f.components.component_bits(doomed).unwrap().is_empty());
        assert!(f.components.get_component::<Position>(doomed, f.position).is_none());
        assert!(f.components.get_component::<Velocity>(doomed, f.velocity).is_none());

        assert!(f.components.get_component::<Position>(survivor, f.position).is_some());
        assert_eq!(f.components.component_bits(survivor).unwrap().count(), 2);
    }

    #[test]
    fn test_cleanup_without_pending_is_noop() {
        let mut f = fixture();
        assert_eq!(f.components.cleanup(), 0);

        // An entity without components is still consumed from the queue.
        f.components.mark_deleted(Entity::new(50));
        assert_eq!(f.components.cleanup(), 1);
    }

    #[test]
    fn test_manager_hook_marks_deleted() {
        let mut f = fixture();
        let entity = Entity::new(0);
        f.components.add_component(entity, f.name, Name("x")).unwrap();

        Manager::deleted(&mut f.components, entity);
        assert_eq!(f.components.pending_deletions(), 1);
        f.components.cleanup();
        assert!(f.components.get_component::<Name>(entity, f.name).is_none());
    }

    #[test]
    fn test_grows_past_initial_capacity() {
        let mut f = fixture();
        for id in 0..200 {
            f.components
                .add_component(Entity::new(id), f.name, Name("many"))
                .unwrap();
        }
        assert!(f.components.get_component::<Name>(Entity::new(199), f.name).is_some());
    }

    fn assert_bits_match_slots(f: &Fixture, entities: u32) {
        for id in 0..entities {
            let entity = Entity::new(id);
            let bits = f.components.component_bits(entity);
            let owns = |ty: ComponentType| bits.is_some_and(|bits| bits.contains(ty.index()));

            assert_eq!(
                owns(f.position),
                f.components.get_component::<Position>(entity, f.position).is_some(),
                "position of {entity}"
            );
            assert_eq!(
                owns(f.velocity),
                f.components.get_component::<Velocity>(entity, f.velocity).is_some(),
                "velocity of {entity}"
            );
            assert_eq!(
                owns(f.name),
                f.components.get_component::<Name>(entity, f.name).is_some(),
                "name of {entity}"
            );
        }
    }

    #[test]
    fn test_bits_match_slots_under_random_operations() {
        const ENTITIES: u32 = 64;
        let mut f = fixture();
        let mut rng = StdRng::seed_from_u64(0x5EED);
        let mut doomed = Vec::new();

        for _ in 0..5_000 {
            let entity = Entity::new(rng.gen_range(0..ENTITIES));
            match rng.gen_range(0..8) {
                0 | 1 => f
                    .components
                    .add_component(entity, f.position, Position { x: 0.0, y: 0.0 })
                    .unwrap(),
                2 => f
                    .components
                    .add_component(entity, f.velocity, Velocity { dx: 0.0, dy: 0.0 })
                    .unwrap(),
                3 => f.components.add_component(entity, f.name, Name("r")).unwrap(),
                4 | 5 => {
                    let ty = [f.position, f.velocity, f.name][rng.gen_range(0..3)];
                    f.components.remove_component(entity, ty);
                }
                6 => {
                    f.components.mark_deleted(entity);
                    doomed.push(entity);
                }
                _ => {
                    f.components.cleanup();
                    for entity in doomed.drain(..) {
                        assert!(f
                            .components
                            .component_bits(entity)
                            .map_or(true, BitSet::is_empty));
                    }
                }
            }
            assert_bits_match_slots(&f, ENTITIES);
        }
    }
}
