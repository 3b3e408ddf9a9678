//! Runtime configuration, read from the environment (and `.env` if present).

use std::env;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "https://easyshare-backend-cidx.onrender.com";
const UPLOAD_TIMEOUT_SECS: u64 = 300;
const EMAIL_TIMEOUT_SECS: u64 = 30;
const CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a whole number of seconds, got {value:?}")]
    InvalidSeconds { name: &'static str, value: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareConfig {
    /// Backend origin, without a trailing slash.
    pub api_base: String,
    pub upload_timeout: Duration,
    pub email_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            upload_timeout: Duration::from_secs(UPLOAD_TIMEOUT_SECS),
            email_timeout: Duration::from_secs(EMAIL_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
        }
    }
}

impl ShareConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is fine
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_base = lookup("EASYSHARE_API_BASE")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        Ok(Self {
            api_base,
            upload_timeout: seconds(
                &lookup,
                "EASYSHARE_UPLOAD_TIMEOUT_SECS",
                UPLOAD_TIMEOUT_SECS,
            )?,
            email_timeout: seconds(&lookup, "EASYSHARE_EMAIL_TIMEOUT_SECS", EMAIL_TIMEOUT_SECS)?,
            connect_timeout: seconds(
                &lookup,
                "EASYSHARE_CONNECT_TIMEOUT_SECS",
                CONNECT_TIMEOUT_SECS,
            )?,
        })
    }
}

fn seconds(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: u64,
) -> Result<Duration, ConfigError> {
    match lookup(name) {
        None => Ok(Duration::from_secs(default)),
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| ConfigError::InvalidSeconds { name, value }),
    }
}
