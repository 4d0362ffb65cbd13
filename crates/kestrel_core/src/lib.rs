//! # KESTREL Core
//!
//! Storage core of an Entity Component System:
//! - Index-addressed [`Bag`] containers with amortized O(1) access
//! - Per-world component type registry
//! - Component columns indexed by entity id, with deferred deletion
//! - Recycled entity ids, most recently freed first
//!
//! ## Tick Contract
//!
//! 1. Systems read components through mappers and write them through the world
//! 2. Lifecycle changes (add, enable, disable, delete) are queued
//! 3. [`World::maintain`] runs once per tick, dispatching the queued hooks and
//!    then removing the components of deleted entities
//!
//! ## Example
//!
//! ```rust
//! use kestrel_core::{Component, World};
//!
//! struct Position { x: f32, y: f32 }
//! impl Component for Position {}
//!
//! let mut world = World::new();
//! let entity = world.create_entity();
//! world.add_entity(entity);
//! world.add_component(entity, Position { x: 0.0, y: 0.0 })?;
//! world.maintain();
//!
//! let positions = world.mapper::<Position>()?;
//! assert_eq!(positions.get(entity).x, 0.0);
//! # Ok::<(), kestrel_core::EcsError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod collections;
pub mod config;
pub mod ecs;
pub mod error;
pub mod memory;

pub use collections::{Bag, BitSet, Identity};
pub use config::WorldConfig;
pub use ecs::{
    Component, ComponentManager, ComponentMapper, ComponentType, ComponentTypeRegistry, Entity,
    EntityManager, Manager, World,
};
pub use error::{EcsError, EcsResult};
pub use memory::IdentifierPool;
