//! Server configuration loaded from environment variables (`.env` is honored via dotenvy in main).

use crate::error::ConfigError;
use crate::store::is_valid_identifier;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    /// Unqualified table holding users.
    pub users_table: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            url: "postgres://localhost/users".into(),
            max_connections: 5,
            acquire_timeout_secs: 5,
            users_table: "users".into(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Request bodies larger than this are rejected with 413.
    pub max_body_bytes: usize,
    pub database: DatabaseConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            max_body_bytes: 64 * 1024,
            database: DatabaseConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load from the process environment.
    ///
    /// - `APP_HOST` (default 127.0.0.1), `APP_PORT` (default 3000)
    /// - `DATABASE_URL`, `DATABASE_MAX_CONNECTIONS`, `DATABASE_ACQUIRE_TIMEOUT_SECS`
    /// - `USERS_TABLE` (default users), `MAX_BODY_BYTES` (default 65536)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary key lookup. Unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ServerConfig::default();
        let db = defaults.database;
        let database = DatabaseConfig {
            url: lookup("DATABASE_URL").unwrap_or(db.url),
            max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", db.max_connections)?,
            acquire_timeout_secs: parse_or(&lookup, "DATABASE_ACQUIRE_TIMEOUT_SECS", db.acquire_timeout_secs)?,
            users_table: lookup("USERS_TABLE").unwrap_or(db.users_table),
        };
        if database.url.trim().is_empty() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }
        if !is_valid_identifier(&database.users_table) {
            return Err(ConfigError::Invalid {
                key: "USERS_TABLE",
                value: database.users_table,
            });
        }
        if database.max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "DATABASE_MAX_CONNECTIONS",
                value: "0".into(),
            });
        }
        Ok(ServerConfig {
            host: parse_or(&lookup, "APP_HOST", defaults.host)?,
            port: parse_or(&lookup, "APP_PORT", defaults.port)?,
            max_body_bytes: parse_or(&lookup, "MAX_BODY_BYTES", defaults.max_body_bytes)?,
            database,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}
