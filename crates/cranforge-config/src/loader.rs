//! Configuration loader with hierarchical merging.

use crate::env::EnvConfig;
use crate::error::{ConfigError, Result};
use crate::types::{Config, ConfigFile};
use crate::validate::validate;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration source in hierarchy order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigSource {
    /// Built-in defaults.
    Defaults = 0,
    /// `cranforge.json` in the universe root.
    Project = 1,
    /// Environment variables.
    Environment = 2,
    /// CLI arguments.
    Cli = 3,
}

impl ConfigSource {
    /// Get description for display.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Defaults => "built-in defaults",
            Self::Project => "project configuration",
            Self::Environment => "environment variables",
            Self::Cli => "command-line arguments",
        }
    }
}

/// Loads a [`Config`] for one universe root.
#[derive(Debug)]
pub struct ConfigLoader {
    universe_root: PathBuf,
    env_config: EnvConfig,
}

impl ConfigLoader {
    /// Create a loader reading overrides from the process environment.
    ///
    /// # Errors
    /// Returns error if an environment variable is malformed.
    pub fn new(universe_root: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self::with_env(universe_root, EnvConfig::from_env()?))
    }

    /// Create a loader with explicit environment overrides.
    #[must_use]
    pub fn with_env(universe_root: impl Into<PathBuf>, env_config: EnvConfig) -> Self {
        Self {
            universe_root: universe_root.into(),
            env_config,
        }
    }

    /// Load defaults, then the project file, then the environment.
    ///
    /// The result is not validated so that CLI overrides can still be applied;
    /// call [`ConfigLoader::finish`] afterwards.
    ///
    /// # Errors
    /// Returns error if `cranforge.json` exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Config> {
        let mut config = Config::with_root(&self.universe_root);
        debug!(source = ConfigSource::Defaults.description(), "loaded configuration layer");

        let path = config.config_file();
        if let Some(file) = Self::load_config_file(&path)? {
            file.apply_to(&mut config);
            debug!(
                source = ConfigSource::Project.description(),
                path = %path.display(),
                "loaded configuration layer"
            );
        }

        self.env_config.apply_to(&mut config);
        debug!(source = ConfigSource::Environment.description(), "loaded configuration layer");
        Ok(config)
    }

    /// Validate a configuration after all layers, including CLI flags, are applied.
    ///
    /// # Errors
    /// Returns error naming the first invalid key.
    pub fn finish(config: Config) -> Result<Config> {
        validate(&config)?;
        Ok(config)
    }

    /// Load and validate in one step.
    ///
    /// # Errors
    /// Returns error if loading or validation fails.
    pub fn resolve(&self) -> Result<Config> {
        Self::finish(self.load()?)
    }

    fn load_config_file(path: &Path) -> Result<Option<ConfigFile>> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ConfigError::io(path, e)),
        };
        sonic_rs::from_str(&content)
            .map(Some)
            .map_err(|e| ConfigError::json(path, &e))
    }
}
