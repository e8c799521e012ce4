use serde::Deserialize;

use crate::utils::constants::{DEFAULT_BASE_URL, DEFAULT_CACHE_TIME_MS, DEFAULT_HTTP_TIMEOUT_MS};

/// ================================
/// Client configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    /// data source key, appended to `base_url`
    pub key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// default cache time for lookups, forwarded to the proxy in seconds
    #[serde(default = "default_cache_time_ms")]
    pub cache_time_ms: u64,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    pub retry: Option<RetryConfig>,
    pub logging: Option<LoggingConfig>,
}

impl ClientConfig {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_owned(),
            base_url: default_base_url(),
            cache_time_ms: default_cache_time_ms(),
            timeout_ms: default_timeout_ms(),
            retry: None,
            logging: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RetryConfig {
    pub attempts: Option<u32>,
    /// will be mutiply by 2 on every attempt until max_delay_ms
    pub base_delay_ms: Option<u64>,
    /// invariant: >= base_delay_ms
    pub max_delay_ms: Option<u64>,
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new("info".to_owned(), LogFormat::Compact)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

impl LogFormat {
    pub fn from_env() -> Self {
        match std::env::var("LOG_FORMAT")
            .unwrap_or_else(|_| "json".to_string())
            .to_lowercase()
            .as_str()
        {
            "compact" | "text" => LogFormat::Compact,
            _ => LogFormat::Json,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_cache_time_ms() -> u64 {
    DEFAULT_CACHE_TIME_MS
}

fn default_timeout_ms() -> u64 {
    DEFAULT_HTTP_TIMEOUT_MS
}
