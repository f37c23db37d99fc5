//! Config validation.

use crate::config::ClientConfig;
use crate::error::ConfigError;

pub fn validate(config: &ClientConfig) -> Result<(), ConfigError> {
    let base = config.base_url.trim();
    if base.is_empty() {
        return Err(ConfigError::Validation("base_url must not be empty".into()));
    }
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        return Err(ConfigError::Validation(format!(
            "base_url must be an http(s) origin, got '{}'",
            base
        )));
    }
    if config.page_size == 0 {
        return Err(ConfigError::Validation("page_size must be at least 1".into()));
    }
    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation("timeout_secs must be at least 1".into()));
    }
    Ok(())
}
