//! Service configuration.
//!
//! DESIGN
//! ======
//! Everything is read from the environment once at startup (after `.env` has
//! been loaded by `main`). Numeric values that fail to parse fall back to
//! their defaults; booleans are strict because a silently ignored
//! `SEED_SYSTEM_LAYOUTS=flase` is worse than refusing to start.
//!
//! `from_lookup` takes the variable source as a closure so tests can feed a
//! map instead of mutating the process environment.

use std::str::FromStr;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a boolean, got {value:?}")]
    InvalidBool { key: &'static str, value: String },
}

impl crate::error::ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidBool { .. } => "E_CONFIG",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Postgres connection string. `None` runs on the in-memory repository.
    pub database_url: Option<String>,
    pub bind_host: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub seed_system_layouts: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            bind_host: DEFAULT_BIND_HOST.to_owned(),
            port: DEFAULT_PORT,
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            seed_system_layouts: true,
        }
    }
}

impl Config {
    /// Read configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a boolean variable holds anything other
    /// than a recognised true/false spelling.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`.
    ///
    /// # Errors
    ///
    /// See [`Config::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        let bind_host = lookup("BIND_HOST")
            .filter(|host| !host.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_HOST.to_owned());

        Ok(Self {
            database_url,
            bind_host,
            port: env_parse(&lookup, "PORT", DEFAULT_PORT),
            db_max_connections: env_parse(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS),
            seed_system_layouts: env_bool(&lookup, "SEED_SYSTEM_LAYOUTS", true)?,
        })
    }

    /// `host:port` for the listener.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_host, self.port)
    }
}

pub(crate) fn env_parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn env_bool(lookup: &impl Fn(&str) -> Option<String>, key: &'static str, default: bool) -> Result<bool, ConfigError> {
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "" => Ok(default),
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool { key, value: raw }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
