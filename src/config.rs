//! Process configuration loaded from environment variables.
//!
//! SYSTEM CONTEXT
//! ==============
//! `main` loads `.env` (if present) through `dotenvy`, then builds a `Config`
//! once at startup. Numeric tuning knobs fall back to their defaults when
//! missing or malformed; the listen port and database URL are required to be
//! well-formed.

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::time::Duration;

use crate::db::retry::RetryPolicy;

pub(crate) const DEFAULT_PORT: u16 = 3000;
pub(crate) const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("DATABASE_URL required")]
    MissingDatabaseUrl,
    #[error("invalid PORT: {0}")]
    InvalidPort(String),
}

/// Runtime settings for the server.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub db_retry: RetryPolicy,
}

impl Config {
    /// Build the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is unset or `PORT` is not a valid port.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingDatabaseUrl)?;

        let port = match std::env::var("PORT") {
            Ok(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidPort(raw))?,
            Err(_) => DEFAULT_PORT,
        };

        let retry_defaults = RetryPolicy::default();
        let tries = env_parse("DB_RETRY_TRIES", retry_defaults.tries());
        let delay = std::env::var("DB_RETRY_DELAY_MS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map_or(retry_defaults.delay(), Duration::from_millis);

        Ok(Self {
            database_url,
            port,
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS),
            db_retry: RetryPolicy::new(tries, delay),
        })
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}
