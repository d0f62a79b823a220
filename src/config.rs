//! Environment-driven configuration.
//!
//! All settings come from the process environment (a `.env` file is honored
//! at startup). `DATABASE_URL` is the only required value; everything else
//! has a deployment-grade default.

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_QUERY_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

/// Runtime configuration for the gateway process.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen: SocketAddr,
    pub database_url: String,
    pub pqs_max_connections: u32,
    pub pqs_query_timeout: Duration,
    /// HS256 verification secret; tokens are decoded unverified when unset.
    pub auth_shared_secret: Option<String>,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = parse_or("HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED), &lookup)?;
        let port = parse_or("PORT", DEFAULT_PORT, &lookup)?;

        let database_url = lookup("DATABASE_URL")
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let pqs_max_connections = parse_or("PQS_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS, &lookup)?;
        let timeout_ms = parse_or("PQS_QUERY_TIMEOUT_MS", DEFAULT_QUERY_TIMEOUT_MS, &lookup)?;

        let auth_shared_secret = lookup("AUTH_SHARED_SECRET").filter(|value| !value.is_empty());

        Ok(Self {
            listen: SocketAddr::new(host, port),
            database_url,
            pqs_max_connections,
            pqs_query_timeout: Duration::from_millis(timeout_ms),
            auth_shared_secret,
        })
    }
}

fn parse_or<T: FromStr>(
    key: &'static str,
    default: T,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
