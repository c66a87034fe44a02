//! Configuration validation with descriptive errors.

use crate::error::{ConfigError, Result};
use crate::types::Config;
use url::Url;

/// Validate a fully merged configuration.
///
/// # Errors
/// Returns the first invalid field found.
pub fn validate(config: &Config) -> Result<()> {
    if config.workers == 0 {
        return Err(ConfigError::invalid_value(
            "workers",
            "must be at least 1",
            "set workers to a positive number such as 12",
        ));
    }
    if config.request_timeout_secs == 0 {
        return Err(ConfigError::invalid_value(
            "requestTimeoutSecs",
            "must be at least 1",
            "use a timeout in seconds such as 30",
        ));
    }
    if config.cache_model.trim().is_empty() || config.cache_model.contains(['/', '\\']) {
        return Err(ConfigError::invalid_value(
            "cacheModel",
            format!("'{}' is not a directory name", config.cache_model),
            "use a plain name such as 'cran'",
        ));
    }
    validate_url(&config.package_db_url)?;
    Ok(())
}

fn validate_url(raw: &str) -> Result<()> {
    let invalid = || ConfigError::InvalidUrl {
        field: "packageDbUrl".to_string(),
        url: raw.to_string(),
    };
    let url = Url::parse(raw).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(invalid());
    }
    Ok(())
}
