//! Configuration for the cranforge tools.
//!
//! Configuration is layered, later layers winning:
//!
//! 1. Built-in defaults
//! 2. `<universe>/cranforge.json` (camelCase keys, all optional)
//! 3. `CRANFORGE_*` environment variables
//! 4. Command-line flags (applied by the binary before validation)

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod env;
pub mod error;
pub mod loader;
pub mod types;
pub mod validate;

pub use env::{CranforgeEnvVar, EnvConfig};
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, ConfigSource};
pub use types::{CONFIG_FILE_NAME, Config, ConfigFile};
pub use validate::validate;
