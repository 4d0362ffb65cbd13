//! # Core Error Types
//!
//! Recoverable errors raised by the storage core.
//!
//! Out-of-range access on the unchecked fast paths is a contract violation
//! and panics instead; a missing value is `None`, never an error.

use thiserror::Error;

/// Errors that can occur in the storage core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// Checked removal addressed a slot at or past the container's size.
    #[error("index {index} out of range for container of size {size}")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// The container size at the time of the call.
        size: usize,
    },

    /// The registry has handed out every component type index it may.
    #[error("component type registry exhausted: limit of {limit} types reached")]
    TypeRegistryExhausted {
        /// Configured maximum number of component types.
        limit: u32,
    },

    /// A component type was used with a different Rust type than it was registered for.
    #[error("component type mismatch: expected {expected}, registered as {registered}")]
    ComponentTypeMismatch {
        /// The Rust type requested by the caller.
        expected: &'static str,
        /// The Rust type the component type was registered for.
        registered: &'static str,
    },

    /// A component type was read before it was registered, so it has no column.
    #[error("component type {name} has not been registered")]
    UnregisteredComponent {
        /// The Rust type requested by the caller.
        name: &'static str,
    },

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for storage core operations.
pub type EcsResult<T> = Result<T, EcsError>;
