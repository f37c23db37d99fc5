//! Load client config from the process environment.

use crate::config::types::{ClientConfig, DEFAULT_LOGIN_URL, DEFAULT_PAGE_SIZE, DEFAULT_TIMEOUT_SECS};
use crate::config::validate;
use crate::error::ConfigError;
use std::str::FromStr;

pub const ENV_BASE_URL: &str = "LABINV_BASE_URL";
pub const ENV_CSRF_TOKEN: &str = "LABINV_CSRF_TOKEN";
pub const ENV_SESSION_ID: &str = "LABINV_SESSION_ID";
pub const ENV_LOGIN_URL: &str = "LABINV_LOGIN_URL";
pub const ENV_PAGE_SIZE: &str = "LABINV_PAGE_SIZE";
pub const ENV_TIMEOUT_SECS: &str = "LABINV_TIMEOUT_SECS";

impl ClientConfig {
    /// Build config from `LABINV_*` variables. Call `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] but reads variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(ENV_BASE_URL)
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing(ENV_BASE_URL))?;
        let config = ClientConfig {
            base_url,
            csrf_token: lookup(ENV_CSRF_TOKEN).filter(|s| !s.is_empty()),
            session_id: lookup(ENV_SESSION_ID).filter(|s| !s.is_empty()),
            login_url: lookup(ENV_LOGIN_URL).unwrap_or_else(|| DEFAULT_LOGIN_URL.into()),
            page_size: parse_or(&lookup, ENV_PAGE_SIZE, DEFAULT_PAGE_SIZE)?,
            timeout_secs: parse_or(&lookup, ENV_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS)?,
        };
        validate(&config)?;
        Ok(config)
    }
}

fn parse_or<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value: raw }),
    }
}
