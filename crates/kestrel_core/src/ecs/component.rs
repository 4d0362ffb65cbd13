//! # Component Types
//!
//! Components are plain data records attached to entities. Each distinct
//! component type is assigned a small, stable index the first time it is
//! referenced; that index is the offset of its storage column and its bit in
//! an entity's component bitset.
//!
//! The registry is owned by a [`World`](super::World), never by the process,
//! so separate worlds assign indices independently.

use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::fmt;

use crate::error::{EcsError, EcsResult};

/// Marker trait for ECS components.
///
/// # Example
///
/// ```rust
/// use kestrel_core::Component;
///
/// struct Health {
///     current: f32,
///     max: f32,
/// }
///
/// impl Component for Health {}
/// ```
pub trait Component: Send + Sync + 'static {}

/// A registered component type: its storage index plus the Rust type it stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ComponentType {
    index: u32,
    type_id: TypeId,
    name: &'static str,
}

impl ComponentType {
    /// Storage index of this component type.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.index as usize
    }

    /// Full Rust type name of the component.
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.name
    }

    /// Returns `true` if this component type was registered for `C`.
    #[inline]
    #[must_use]
    pub fn is<C: Component>(self) -> bool {
        self.type_id == TypeId::of::<C>()
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short = self.name.rsplit("::").next().unwrap_or(self.name);
        write!(f, "ComponentType[{short}] ({})", self.index)
    }
}

/// Append-only mapping from component type to [`ComponentType`].
///
/// Indices are assigned monotonically from 0 and never reused. The registry
/// has no reset; a fresh registry (a fresh world) starts again from 0.
#[derive(Debug)]
pub struct ComponentTypeRegistry {
    types: HashMap<TypeId, ComponentType>,
    next_index: u32,
    limit: u32,
}

impl ComponentTypeRegistry {
    /// Default maximum number of distinct component types.
    pub const DEFAULT_LIMIT: u32 = 1024;

    /// Creates an empty registry with [`Self::DEFAULT_LIMIT`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_limit(Self::DEFAULT_LIMIT)
    }

    /// Creates an empty registry that accepts at most `limit` component types.
    #[must_use]
    pub fn with_limit(limit: u32) -> Self {
        Self {
            types: HashMap::new(),
            next_index: 0,
            limit,
        }
    }

    /// Returns the component type for `C`, registering it with the next index
    /// on first reference.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::TypeRegistryExhausted`] if `C` is new and the
    /// registry already holds `limit` types.
    pub fn type_for<C: Component>(&mut self) -> EcsResult<ComponentType> {
        let type_id = TypeId::of::<C>();
        if let Some(ty) = self.types.get(&type_id) {
            return Ok(*ty);
        }

        if self.next_index >= self.limit {
            return Err(EcsError::TypeRegistryExhausted { limit: self.limit });
        }

        let ty = ComponentType {
            index: self.next_index,
            type_id,
            name: type_name::<C>(),
        };
        self.next_index += 1;
        self.types.insert(type_id, ty);
        tracing::debug!("Registered {}", ty);
        Ok(ty)
    }

    /// Shorthand for `type_for::<C>()?.index()`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::type_for`].
    pub fn index_for<C: Component>(&mut self) -> EcsResult<usize> {
        self.type_for::<C>().map(ComponentType::index)
    }

    /// Looks up `C` without registering it.
    #[must_use]
    pub fn get<C: Component>(&self) -> Option<ComponentType> {
        self.types.get(&TypeId::of::<C>()).copied()
    }

    /// Number of registered component types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no component type has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Maximum number of component types this registry accepts.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }
}

impl Default for ComponentTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
