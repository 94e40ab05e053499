// src/config.rs

use std::net::SocketAddr;
use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_DB_PATH: &str = "evaluations.sqlite3";
pub const DEFAULT_SCHEMA_PATH: &str = "sql/schema.sql";
pub const RENTCAST_BASE_URL: &str = "https://api.rentcast.io/v1";
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub max_workers: usize,
    pub db_path: String,
    pub schema_path: String,
    pub log_level: String,
    /// Request timeout for every outbound HTTP call (HTTP_TIMEOUT_SECS).
    pub http_timeout_secs: u64,
    /// Comparables requested per evaluation (COMPS_LIMIT).
    pub comps_limit: usize,
    /// Market data comes from RentCast only when this is set.
    pub rentcast_api_key: Option<String>,
    pub rentcast_base_url: String,
    /// Narratives come from OpenAI only when this is set.
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            max_workers: 8,
            db_path: DEFAULT_DB_PATH.to_string(),
            schema_path: DEFAULT_SCHEMA_PATH.to_string(),
            log_level: "info".to_string(),
            http_timeout_secs: 10,
            comps_limit: 10,
            rentcast_api_key: None,
            rentcast_base_url: RENTCAST_BASE_URL.to_string(),
            openai_api_key: None,
            openai_base_url: OPENAI_BASE_URL.to_string(),
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from any variable source; `from_env` passes the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());
        let secret = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Ok(Self {
            bind_addr: get("BIND_ADDR", DEFAULT_BIND_ADDR)
                .parse()
                .map_err(|e| invalid("BIND_ADDR", e))?,
            max_workers: get("MAX_WORKERS", "8")
                .parse()
                .map_err(|e| invalid("MAX_WORKERS", e))?,
            db_path: get("DB_PATH", DEFAULT_DB_PATH),
            schema_path: get("SCHEMA_PATH", DEFAULT_SCHEMA_PATH),
            log_level: get("LOG_LEVEL", "info"),
            http_timeout_secs: get("HTTP_TIMEOUT_SECS", "10")
                .parse()
                .map_err(|e| invalid("HTTP_TIMEOUT_SECS", e))?,
            comps_limit: get("COMPS_LIMIT", "10")
                .parse()
                .map_err(|e| invalid("COMPS_LIMIT", e))?,
            rentcast_api_key: secret("RENTCAST_API_KEY"),
            rentcast_base_url: get("RENTCAST_BASE_URL", RENTCAST_BASE_URL),
            openai_api_key: secret("OPENAI_API_KEY"),
            openai_base_url: get("OPENAI_BASE_URL", OPENAI_BASE_URL),
            openai_model: get("OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
        })
    }
}

fn invalid(name: &'static str, err: impl std::fmt::Display) -> ConfigError {
    ConfigError::Invalid {
        name,
        reason: err.to_string(),
    }
}
