//! Configuration types and the universe directory layout.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Name of the optional configuration file inside the universe root.
pub const CONFIG_FILE_NAME: &str = "cranforge.json";

/// Resolved tool configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root of the package universe checkout.
    pub universe_root: PathBuf,
    /// Root URL of the package database.
    pub package_db_url: String,
    /// Maximum concurrent cache/database operations.
    pub workers: usize,
    /// Retries for server errors from the package database.
    pub max_retries: usize,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Sub-directory of the cache root used for dependency documents.
    pub cache_model: String,
}

impl Config {
    /// Default package database.
    pub const DEFAULT_PACKAGE_DB_URL: &'static str = "https://packages.renjin.org";
    /// Default worker count.
    pub const DEFAULT_WORKERS: usize = 12;
    /// Default retry count for server errors.
    pub const DEFAULT_MAX_RETRIES: usize = 8;
    /// Default request timeout.
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
    /// Default cache model.
    pub const DEFAULT_CACHE_MODEL: &'static str = "cran";

    /// Defaults rooted at `universe_root`.
    #[must_use]
    pub fn with_root(universe_root: impl Into<PathBuf>) -> Self {
        Self {
            universe_root: universe_root.into(),
            ..Self::default()
        }
    }

    /// Directory of externally maintained replacement builds.
    #[must_use]
    pub fn replacements_dir(&self) -> PathBuf {
        self.universe_root.join("replacements")
    }

    /// Directory holding package lists and the dependency cache.
    #[must_use]
    pub fn packages_dir(&self) -> PathBuf {
        self.universe_root.join("packages")
    }

    /// Blocklist file.
    #[must_use]
    pub fn blocklist_file(&self) -> PathBuf {
        self.packages_dir().join("packages.blocklist")
    }

    /// Certified package file.
    #[must_use]
    pub fn certified_file(&self) -> PathBuf {
        self.packages_dir().join("packages.certified")
    }

    /// Generated package list.
    #[must_use]
    pub fn package_list_file(&self) -> PathBuf {
        self.packages_dir().join("packages.list")
    }

    /// Root of the dependency cache; documents live under `<root>/<cache_model>/`.
    #[must_use]
    pub fn cache_root(&self) -> PathBuf {
        self.packages_dir()
    }

    /// Path of the optional JSON configuration file.
    #[must_use]
    pub fn config_file(&self) -> PathBuf {
        self.universe_root.join(CONFIG_FILE_NAME)
    }

    /// Request timeout as a duration.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            universe_root: PathBuf::from("."),
            package_db_url: Self::DEFAULT_PACKAGE_DB_URL.to_string(),
            workers: Self::DEFAULT_WORKERS,
            max_retries: Self::DEFAULT_MAX_RETRIES,
            request_timeout_secs: Self::DEFAULT_REQUEST_TIMEOUT_SECS,
            cache_model: Self::DEFAULT_CACHE_MODEL.to_string(),
        }
    }
}

/// Contents of `cranforge.json`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    /// Package database URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_db_url: Option<String>,
    /// Worker count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,
    /// Retry count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<usize>,
    /// Request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    /// Cache model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_model: Option<String>,
}

impl ConfigFile {
    /// Overlay the keys present in this file onto `config`.
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
        if let Some(timeout) = self.request_timeout_secs {
            config.request_timeout_secs = timeout;
        }
        if let Some(ref model) = self.cache_model {
            config.cache_model.clone_from(model);
        }
    }
}
