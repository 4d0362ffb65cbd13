//! # Entity Component System
//!
//! Entity identity, per-type component columns and the world that ties them
//! together.
//!
//! ## Design Philosophy
//!
//! - An entity is a plain integer id; all of its state lives elsewhere
//! - Components of one type share a column indexed by entity id
//! - Component types are registered per world, on first reference
//! - Deletion is deferred to the tick boundary

mod component;
mod entity;
mod manager;
mod mapper;
mod storage;
mod world;

pub use component::{Component, ComponentType, ComponentTypeRegistry};
pub use entity::{Entity, EntityManager};
pub use manager::Manager;
pub use mapper::ComponentMapper;
pub use storage::ComponentManager;
pub use world::World;
