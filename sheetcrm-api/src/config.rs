//! API Configuration Module
//!
//! Listener and response settings for the lookup endpoint. Loaded from
//! environment variables; only `PORT` has no default.

use std::net::SocketAddr;
use std::time::Duration;

use sheetcrm_core::ConfigError;

pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 5;

// ============================================================================
// API CONFIGURATION
// ============================================================================

/// HTTP listener and response configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Host or IP the listener binds to.
    pub bind_host: String,

    /// Listen port.
    pub port: u16,

    /// Answer `Hello <name>` instead of the bare name.
    pub greeting: bool,

    /// Whether `GET /metrics` is mounted.
    pub metrics_enabled: bool,

    /// How long in-flight requests may run after a shutdown signal.
    pub shutdown_timeout: Duration,
}

impl ApiConfig {
    /// Config listening on `port` with every other setting at its default.
    pub fn new(port: u16) -> Self {
        Self {
            bind_host: DEFAULT_BIND_HOST.to_string(),
            port,
            greeting: false,
            metrics_enabled: true,
            shutdown_timeout: Duration::from_secs(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
        }
    }

    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `PORT`: Listen port (required)
    /// - `SHEETCRM_BIND`: Listen host (default: 0.0.0.0)
    /// - `SHEETCRM_GREETING`: "true" or "1" to answer `Hello <name>` (default: false)
    /// - `SHEETCRM_METRICS_ENABLED`: "false" or "0" hides /metrics (default: true)
    /// - `SHEETCRM_SHUTDOWN_TIMEOUT_SECS`: Drain budget on shutdown (default: 5)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let raw_port = get("PORT").ok_or_else(|| ConfigError::MissingRequired {
            field: "PORT".to_string(),
        })?;
        let port = raw_port
            .trim()
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidValue {
                field: "PORT".to_string(),
                value: raw_port.clone(),
                reason: e.to_string(),
            })?;

        let mut config = Self::new(port);

        if let Some(host) = get("SHEETCRM_BIND") {
            config.bind_host = host.trim().to_string();
        }

        config.greeting = get("SHEETCRM_GREETING")
            .map(|s| parse_flag(&s))
            .unwrap_or(false);

        config.metrics_enabled = get("SHEETCRM_METRICS_ENABLED")
            .map(|s| parse_flag(&s))
            .unwrap_or(true);

        if let Some(raw) = get("SHEETCRM_SHUTDOWN_TIMEOUT_SECS") {
            let secs = raw.trim().parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                field: "SHEETCRM_SHUTDOWN_TIMEOUT_SECS".to_string(),
                value: raw.clone(),
                reason: e.to_string(),
            })?;
            config.shutdown_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Socket address the listener binds to.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.bind_host, self.port);
        addr.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue {
                field: "SHEETCRM_BIND".to_string(),
                value: addr.clone(),
                reason: e.to_string(),
            })
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}
