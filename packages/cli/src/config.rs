// ABOUTME: Server configuration loaded from the environment
// ABOUTME: Defaults for every setting, numeric values validated up front

use std::env;
use std::num::ParseIntError;

use thiserror::Error;

use crate::middleware::RateLimitConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port number: {0}")]
    InvalidPort(#[from] ParseIntError),
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
    #[error("Invalid value for {name}: {value}")]
    InvalidNumber { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub cors_origin: String,
    pub rate_limit: RateLimitConfig,
    pub enable_hsts: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup, so tests never touch process env
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port_str = lookup("PORT").unwrap_or_else(|| "3000".to_string());
        let port = port_str.trim().parse::<u16>()?;

        // Validate port is in valid range
        if port == 0 {
            return Err(ConfigError::PortOutOfRange(port));
        }

        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| "sqlite://todolist.db?mode=rwc".to_string());

        let database_max_connections = parse_positive(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?;

        let cors_origin =
            lookup("CORS_ORIGIN").unwrap_or_else(|| "http://localhost:5173".to_string());

        let rate_limit = RateLimitConfig {
            enabled: parse_flag(&lookup, "RATE_LIMIT_ENABLED", true),
            requests_per_minute: parse_positive(&lookup, "RATE_LIMIT_RPM", 60)?,
            burst_size: parse_positive(&lookup, "RATE_LIMIT_BURST", 10)?,
        };

        let enable_hsts = parse_flag(&lookup, "ENABLE_HSTS", false);

        Ok(Config {
            host,
            port,
            database_url,
            database_max_connections,
            cors_origin,
            rate_limit,
            enable_hsts,
        })
    }
}

fn parse_flag<F>(lookup: &F, name: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .and_then(|v| v.trim().to_lowercase().parse::<bool>().ok())
        .unwrap_or(default)
}

fn parse_positive<F>(lookup: &F, name: &'static str, default: u32) -> Result<u32, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<u32>() {
            Ok(value) if value > 0 => Ok(value),
            _ => Err(ConfigError::InvalidNumber { name, value: raw }),
        },
    }
}
