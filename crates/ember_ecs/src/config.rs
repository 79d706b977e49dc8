//! # Registry Configuration
//!
//! Capacity hints loaded once at startup. They only size the initial
//! allocations; every table still grows on demand.
//!
//! ```toml
//! entity_capacity = 4096
//! pool_capacity = 512
//! ```

use serde::Deserialize;

use crate::error::{EcsError, EcsResult};

/// Capacity hints for a [`Registry`](crate::Registry).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Entity slots reserved up front.
    pub entity_capacity: usize,
    /// Components reserved per pool when the pool is first created.
    pub pool_capacity: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            entity_capacity: 1024,
            pool_capacity: 256,
        }
    }
}

impl RegistryConfig {
    /// Parses a configuration from TOML text. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidConfig`] if the text is not valid TOML or
    /// contains unknown keys.
    pub fn from_toml_str(text: &str) -> EcsResult<Self> {
        toml::from_str(text).map_err(|err| EcsError::InvalidConfig(err.to_string()))
    }

    /// Sets the entity capacity.
    #[must_use]
    pub const fn with_entity_capacity(mut self, capacity: usize) -> Self {
        self.entity_capacity = capacity;
        self
    }

    /// Sets the per-pool capacity.
    #[must_use]
    pub const fn with_pool_capacity(mut self, capacity: usize) -> Self {
        self.pool_capacity = capacity;
        self
    }
}
