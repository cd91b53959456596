//! Runtime settings from `dev.env` / `.env` and the process environment.

use crate::error::ConfigError;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_SCHEMA_FILE: &str = "database/schema.sql";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug)]
pub struct Settings {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub schema_file: String,
    /// Deadline applied to every service call made by a handler.
    pub request_timeout: Duration,
    pub max_connections: u32,
    pub connect_retries: u32,
    pub max_body_bytes: usize,
}

impl Settings {
    /// Load `dev.env` and `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::from_filename("dev.env").ok();
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DB_CONN_STR")
            .or_else(|| lookup("DATABASE_URL"))
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("DB_CONN_STR"))?;
        let timeout_secs: u64 = parse_or(&lookup, "REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "REQUEST_TIMEOUT_SECS",
                value: "0".into(),
            });
        }
        Ok(Settings {
            database_url,
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(&lookup, "APP_PORT", DEFAULT_PORT)?,
            schema_file: lookup("SCHEMA_FILE").unwrap_or_else(|| DEFAULT_SCHEMA_FILE.into()),
            request_timeout: Duration::from_secs(timeout_secs),
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            connect_retries: parse_or(&lookup, "DB_CONNECT_RETRIES", 5)?,
            max_body_bytes: parse_or(&lookup, "MAX_BODY_BYTES", 64 * 1024)?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}
