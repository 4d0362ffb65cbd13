//! # World Configuration
//!
//! Sizing and limits for a [`World`](crate::World), loaded once at startup
//! from TOML. Every field is optional; missing fields take their defaults.
//!
//! ```toml
//! entity_capacity = 4096
//! component_type_capacity = 32
//! max_component_types = 256
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::collections::DEFAULT_CAPACITY;
use crate::ecs::ComponentTypeRegistry;
use crate::error::{EcsError, EcsResult};

/// Configuration for a world's storage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    /// Initial slots of entity-indexed containers (live entities, component
    /// bits, per-type component columns).
    pub entity_capacity: usize,
    /// Initial slots of the per-type column table.
    pub component_type_capacity: usize,
    /// Maximum number of distinct component types. Must be non-zero.
    pub max_component_types: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            entity_capacity: DEFAULT_CAPACITY,
            component_type_capacity: DEFAULT_CAPACITY,
            max_component_types: ComponentTypeRegistry::DEFAULT_LIMIT,
        }
    }
}

impl WorldConfig {
    /// Parses and validates a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidConfig`] if the text is not valid TOML for
    /// this structure or fails [`Self::validate`].
    pub fn from_toml_str(text: &str) -> EcsResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| EcsError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidConfig`] if the file cannot be read or its
    /// contents are rejected by [`Self::from_toml_str`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> EcsResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| EcsError::InvalidConfig(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Checks the configuration for values the storage cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidConfig`] if `max_component_types` is zero.
    pub fn validate(&self) -> EcsResult<()> {
        if self.max_component_types == 0 {
            return Err(EcsError::InvalidConfig(
                "max_component_types must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
