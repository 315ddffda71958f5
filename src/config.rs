//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{KvError, Result};

/// Which store of record the service talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// PostgreSQL via sqlx
    Postgres,
    /// Process-local map, contents lost on restart
    Memory,
}

impl FromStr for StoreBackend {
    type Err = KvError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(KvError::Configuration(format!(
                "Unknown STORE_BACKEND '{}', expected 'postgres' or 'memory'",
                other
            ))),
        }
    }
}

/// PostgreSQL connection parameters.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    /// Upper bound on pooled connections
    pub max_open_conns: u32,
    /// Connections kept warm in the pool
    pub max_idle_conns: u32,
    /// Maximum lifetime of a pooled connection in minutes
    pub conn_max_lifetime_min: u64,
}

impl DatabaseConfig {
    pub fn conn_max_lifetime(&self) -> Duration {
        Duration::from_secs(self.conn_max_lifetime_min.saturating_mul(60))
    }

    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |name: &str| {
            lookup(name).filter(|v| !v.is_empty()).ok_or_else(|| {
                KvError::Configuration(format!("Missing required environment variable {}", name))
            })
        };

        // sqlx builds a pool with no permits from a zero bound.
        let max_open_conns = parse_or(lookup, "DB_MAX_OPEN_CONNS", 50);
        if max_open_conns == 0 {
            return Err(KvError::Configuration(
                "DB_MAX_OPEN_CONNS must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            host: lookup("DB_HOST")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "localhost".to_string()),
            port: parse_or(lookup, "DB_PORT", 5432),
            user: required("DB_USER")?,
            password: required("DB_PASSWORD")?,
            name: required("DB_NAME")?,
            max_open_conns,
            max_idle_conns: parse_or(lookup, "DB_MAX_IDLE_CONNS", 25),
            conn_max_lifetime_min: parse_or(lookup, "DB_CONN_MAX_LIFETIME_MIN", 5),
        })
    }
}

/// Server configuration parameters.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold; read once at startup
    pub cache_capacity: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Store of record
    pub store_backend: StoreBackend,
    /// Present only for the postgres backend
    pub database: Option<DatabaseConfig>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_CACHE_SIZE` - Cache capacity, must be a positive integer (default: 5)
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `STORE_BACKEND` - `postgres` or `memory` (default: postgres)
    /// - `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD`, `DB_NAME` - PostgreSQL connection
    /// - `DB_MAX_OPEN_CONNS`, `DB_MAX_IDLE_CONNS`, `DB_CONN_MAX_LIFETIME_MIN` - pool tuning
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let cache_capacity = match lookup("MAX_CACHE_SIZE") {
            Some(raw) => parse_capacity(&raw)?,
            None => Self::default().cache_capacity,
        };

        let store_backend = match lookup("STORE_BACKEND") {
            Some(raw) if !raw.is_empty() => raw.parse()?,
            _ => StoreBackend::Postgres,
        };

        let database = match store_backend {
            StoreBackend::Postgres => Some(DatabaseConfig::from_lookup(&lookup)?),
            StoreBackend::Memory => None,
        };

        Ok(Self {
            cache_capacity,
            server_port: parse_or(&lookup, "SERVER_PORT", 8080),
            store_backend,
            database,
        })
    }
}

/// Defaults suitable for local runs and tests: in-memory store, no database.
/// `from_env` instead defaults to the postgres backend.
impl Default for Config {
    fn default() -> Self {
        Self {
            cache_capacity: 5,
            server_port: 8080,
            store_backend: StoreBackend::Memory,
            database: None,
        }
    }
}

/// Parses a cache capacity, rejecting zero, negative and non-numeric input.
fn parse_capacity(raw: &str) -> Result<usize> {
    let value: i64 = raw.trim().parse().map_err(|_| {
        KvError::Configuration(format!("MAX_CACHE_SIZE must be an integer, got '{}'", raw))
    })?;

    if value <= 0 {
        return Err(KvError::Configuration(format!(
            "MAX_CACHE_SIZE must be positive, got {}",
            value
        )));
    }

    usize::try_from(value)
        .map_err(|_| KvError::Configuration(format!("MAX_CACHE_SIZE too large: {}", value)))
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> T {
    lookup(name)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
