//! Google Sheets client configuration
//!
//! Loaded from environment variables:
//! - `SHEETCRM_GOOGLE_CREDENTIALS` or `GOOGLE_APPLICATION_CREDENTIALS`: path to
//!   a service-account JSON key
//! - `SHEETCRM_GOOGLE_API_KEY`: API key, used only when no key file is set
//! - `SHEETCRM_SHEETS_BASE_URL`: API root (default: Google Sheets v4)
//! - `SHEETCRM_SHEETS_TIMEOUT_SECS`: per-request timeout (default: 30)

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use sheetcrm_core::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com/v4";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How the client authenticates against the Sheets API.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Service-account key file; requests carry an OAuth bearer token.
    ServiceAccount { path: PathBuf },
    /// API key; only works for publicly readable spreadsheets.
    ApiKey(SecretString),
}

#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub credentials: Credentials,
    pub base_url: String,
    pub request_timeout: Duration,
}

impl SheetsConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let credentials = if let Some(path) = get("SHEETCRM_GOOGLE_CREDENTIALS")
            .or_else(|| get("GOOGLE_APPLICATION_CREDENTIALS"))
        {
            Credentials::ServiceAccount {
                path: PathBuf::from(path),
            }
        } else if let Some(key) = get("SHEETCRM_GOOGLE_API_KEY") {
            Credentials::ApiKey(SecretString::new(key.into()))
        } else {
            return Err(ConfigError::MissingRequired {
                field: "SHEETCRM_GOOGLE_CREDENTIALS or SHEETCRM_GOOGLE_API_KEY".to_string(),
            });
        };

        let base_url = get("SHEETCRM_SHEETS_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let request_timeout = match get("SHEETCRM_SHEETS_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                    field: "SHEETCRM_SHEETS_TIMEOUT_SECS".to_string(),
                    value: raw.clone(),
                    reason: e.to_string(),
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            credentials,
            base_url,
            request_timeout,
        })
    }
}
