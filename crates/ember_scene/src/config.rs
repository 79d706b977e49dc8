//! # Scene Configuration
//!
//! ```toml
//! name = "Sandbox"
//! id_seed = 42
//!
//! [registry]
//! entity_capacity = 4096
//! ```

use ember_ecs::RegistryConfig;
use serde::Deserialize;

use crate::error::{SceneError, SceneResult};

/// Settings a [`Scene`](crate::Scene) is built from.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneConfig {
    /// Display name of the scene.
    pub name: String,
    /// Seed for a scene-private ID generator. Without one, IDs come from the
    /// process-wide generator seeded from OS entropy.
    pub id_seed: Option<u64>,
    /// Capacity hints for the scene's registry.
    pub registry: RegistryConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            name: "Untitled".to_owned(),
            id_seed: None,
            registry: RegistryConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Parses a configuration from TOML text. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidConfig`] if the text is not valid TOML or
    /// contains unknown keys.
    pub fn from_toml_str(text: &str) -> SceneResult<Self> {
        toml::from_str(text).map_err(|err| SceneError::InvalidConfig(err.to_string()))
    }

    /// Sets the scene name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Gives the scene its own ID generator seeded with `seed`.
    #[must_use]
    pub const fn with_id_seed(mut self, seed: u64) -> Self {
        self.id_seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_keys() {
        let config = SceneConfig::from_toml_str("name = \"Level 1\"").unwrap();
        assert_eq!(config.name, "Level 1");
        assert_eq!(config.id_seed, None);
        assert_eq!(config.registry, RegistryConfig::default());
    }

    #[test]
    fn test_nested_registry_table() {
        let text = "id_seed = 9\n[registry]\npool_capacity = 8\n";
        let config = SceneConfig::from_toml_str(text).unwrap();
        assert_eq!(config.id_seed, Some(9));
        assert_eq!(config.registry.pool_capacity, 8);
        assert_eq!(config.registry.entity_capacity, 1024);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = SceneConfig::from_toml_str("gravity = 9.8").unwrap_err();
        assert!(matches!(err, SceneError::InvalidConfig(_)));
    }
}
