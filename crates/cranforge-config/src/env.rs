//! Environment variable configuration support.

use crate::error::{ConfigError, Result};
use crate::types::Config;

/// Environment variables recognised by cranforge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CranforgeEnvVar {
    /// `CRANFORGE_PACKAGE_DB_URL` - package database root URL.
    PackageDbUrl,
    /// `CRANFORGE_WORKERS` - concurrent resolution operations.
    Workers,
    /// `CRANFORGE_MAX_RETRIES` - retries for server errors.
    MaxRetries,
    /// `CRANFORGE_CACHE_MODEL` - cache sub-directory.
    CacheModel,
}

impl CranforgeEnvVar {
    /// All variables, in application order.
    pub const ALL: [Self; 4] = [
        Self::PackageDbUrl,
        Self::Workers,
        Self::MaxRetries,
        Self::CacheModel,
    ];

    /// Get the environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PackageDbUrl => "CRANFORGE_PACKAGE_DB_URL",
            Self::Workers => "CRANFORGE_WORKERS",
            Self::MaxRetries => "CRANFORGE_MAX_RETRIES",
            Self::CacheModel => "CRANFORGE_CACHE_MODEL",
        }
    }
}

/// Environment overrides, captured once.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EnvConfig {
    /// Package database URL.
    pub package_db_url: Option<String>,
    /// Worker count.
    pub workers: Option<usize>,
    /// Retry count.
    pub max_retries: Option<usize>,
    /// Cache model.
    pub cache_model: Option<String>,
}

impl EnvConfig {
    /// Read configuration from the process environment.
    ///
    /// # Errors
    /// Returns error if a numeric variable does not parse.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary lookup function.
    ///
    /// # Errors
    /// Returns error if a numeric variable does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut env = Self::default();
        for var in CranforgeEnvVar::ALL {
            let Some(value) = lookup(var.as_str()).filter(|v| !v.trim().is_empty()) else {
                continue;
            };
            match var {
                CranforgeEnvVar::PackageDbUrl => env.package_db_url = Some(value),
                CranforgeEnvVar::Workers => env.workers = Some(parse_count(var, &value)?),
                CranforgeEnvVar::MaxRetries => env.max_retries = Some(parse_count(var, &value)?),
                CranforgeEnvVar::CacheModel => env.cache_model = Some(value),
            }
        }
        Ok(env)
    }

    /// Apply environment overrides to a configuration.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(ref url) = self.package_db_url {
            config.package_db_url.clone_from(url);
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(retries) = self.max_retries {
            config.max_retries = retries;
        }
        if let Some(ref model) = self.cache_model {
            config.cache_model.clone_from(model);
        }
    }
}

fn parse_count(var: CranforgeEnvVar, value: &str) -> Result<usize> {
    value.trim().parse().map_err(|_| ConfigError::EnvError {
        var: var.as_str().to_string(),
        message: format!("expected a non-negative integer, got '{value}'"),
    })
}
