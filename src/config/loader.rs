use std::{collections::HashMap, env, path::PathBuf};

use crate::errors::ConfigError;

use super::container_config::{
    ContainerConfig, PartialContainerConfig, ENV_MAX_DEPTH, ENV_TRACE_RESOLUTION,
};

/// Configuration loader responsible for loading container config from a file and environment
pub struct ConfigLoader {
    path: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a loader that only consults the environment
    pub fn new() -> Self {
        Self { path: None }
    }

    /// Create a loader that reads a TOML file first
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Load complete container configuration
    pub fn load_config(&self) -> Result<ContainerConfig, ConfigError> {
        let partial_config = self.load_partial_config()?;
        let env_map = self.collect_env_vars();
        ContainerConfig::from_partial_and_env(partial_config, env_map)
    }

    /// Parse configuration from TOML text, ignoring the environment
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(content: &str) -> Result<ContainerConfig, ConfigError> {
        let partial: PartialContainerConfig = toml::from_str(content)
            .map_err(|e| ConfigError::TomlParse("<string>".to_string(), e))?;
        ContainerConfig::from_partial_and_env(Some(partial), HashMap::new())
    }

    #[cfg(feature = "config-file")]
    fn load_partial_config(&self) -> Result<Option<PartialContainerConfig>, ConfigError> {
        let Some(config_path) = &self.path else {
            return Ok(None);
        };
        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "Container config file not found, using defaults");
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|e| {
            ConfigError::FileRead(config_path.to_string_lossy().to_string(), e)
        })?;

        let partial_config: PartialContainerConfig = toml::from_str(&content).map_err(|e| {
            ConfigError::TomlParse(config_path.to_string_lossy().to_string(), e)
        })?;

        Ok(Some(partial_config))
    }

    #[cfg(not(feature = "config-file"))]
    fn load_partial_config(&self) -> Result<Option<PartialContainerConfig>, ConfigError> {
        Ok(None)
    }

    /// Collect relevant environment variables
    fn collect_env_vars(&self) -> HashMap<String, String> {
        let env_keys = [ENV_MAX_DEPTH, ENV_TRACE_RESOLUTION];

        let mut env_map = HashMap::new();
        for key in &env_keys {
            if let Ok(value) = env::var(key) {
                env_map.insert(key.to_string(), value);
            }
        }
        env_map
    }
}
