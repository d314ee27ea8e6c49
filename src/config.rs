//! Application configuration module
//!
//! Handles loading and validating configuration from environment variables.

use serde::Deserialize;
use std::net::Ipv4Addr;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: Ipv4Addr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::new(0, 0, 0, 0),
            port: 3000,
        }
    }
}

/// Remote politeiawww configuration
#[derive(Debug, Clone)]
pub struct PoliteiaConfig {
    /// Server root, without the `/api/v1` suffix
    pub base_url: String,
    /// Fixed per-request timeout for every remote call
    pub timeout: Duration,
}

impl Default for PoliteiaConfig {
    fn default() -> Self {
        Self {
            base_url: "https://proposals.decred.org".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Page sizes for the HTTP surface
#[derive(Debug, Clone)]
pub struct PagingConfig {
    /// `n` used when a request does not name one
    pub default_page_size: usize,
    /// Largest `n` a single request may ask for
    pub max_page_size: usize,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:3001".to_string()],
        }
    }
}

/// Complete application settings
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub server: ServerConfig,
    pub politeia: PoliteiaConfig,
    pub paging: PagingConfig,
    pub cors: CorsConfig,
}

impl Settings {
    /// Load settings from environment variables
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists (ignore errors if file not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server = ServerConfig {
            host: parse_or(&lookup, "HOST", ServerConfig::default().host)?,
            port: parse_or(&lookup, "PORT", ServerConfig::default().port)?,
        };

        let base_url = match lookup("POLITEIA_URL") {
            Some(raw) => Self::parse_base_url(&raw)?,
            None => PoliteiaConfig::default().base_url,
        };
        let timeout_secs: u64 = parse_or(&lookup, "POLITEIA_TIMEOUT_SECS", 30)?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "POLITEIA_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }
        let politeia = PoliteiaConfig {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        };

        let defaults = PagingConfig::default();
        let paging = PagingConfig {
            default_page_size: parse_or(&lookup, "PROPOSAL_PAGE_SIZE", defaults.default_page_size)?,
            max_page_size: parse_or(&lookup, "PROPOSAL_MAX_PAGE_SIZE", defaults.max_page_size)?,
        };
        if paging.default_page_size > paging.max_page_size {
            return Err(ConfigError::InvalidValue(format!(
                "PROPOSAL_PAGE_SIZE ({}) exceeds PROPOSAL_MAX_PAGE_SIZE ({})",
                paging.default_page_size, paging.max_page_size
            )));
        }

        let cors = CorsConfig {
            allowed_origins: lookup("ALLOWED_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(|| CorsConfig::default().allowed_origins),
        };

        Ok(Self {
            server,
            politeia,
            paging,
            cors,
        })
    }

    /// Validate a politeiawww root URL (https://host[:port])
    fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
        let parsed = url::Url::parse(raw)
            .map_err(|e| ConfigError::InvalidValue(format!("Invalid POLITEIA_URL '{}': {}", raw, e)))?;

        match parsed.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ConfigError::InvalidValue(format!(
                    "POLITEIA_URL must use http or https, got '{}'",
                    other
                )))
            }
        }
        if parsed.host_str().is_none() {
            return Err(ConfigError::InvalidValue(
                "Missing host in POLITEIA_URL".to_string(),
            ));
        }

        Ok(parsed.as_str().trim_end_matches('/').to_string())
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(format!("{}='{}' could not be parsed", key, raw))),
        None => Ok(default),
    }
}
