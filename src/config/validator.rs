//! Client configuration validation with aggregated errors.
//! Every problem is reported at once so a config can be fixed in one pass.

use tracing::{error, info};

use crate::config::settings::{ClientConfig, LoggingConfig, RetryConfig};

pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Returns Ok(()) or Err(Vec<String>) containing all issues.
pub fn validate_client_config(cfg: &ClientConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.key.trim().is_empty() {
        errors.push("config: 'key' cannot be empty".to_string());
    }

    if !(cfg.base_url.starts_with("http://") || cfg.base_url.starts_with("https://")) {
        errors.push(format!(
            "config: base_url '{}' must start with http:// or https://",
            cfg.base_url
        ));
    }
    if cfg.base_url.ends_with('/') {
        errors.push(format!(
            "config: base_url '{}' must not end with '/'",
            cfg.base_url
        ));
    }

    // the proxy ttl header is whole seconds
    if cfg.cache_time_ms < 1000 {
        errors.push(format!(
            "config: cache_time_ms ({}) must be at least 1000",
            cfg.cache_time_ms
        ));
    }

    if cfg.timeout_ms == 0 {
        errors.push("config: timeout_ms must be > 0".to_string());
    }

    if let Some(retry) = &cfg.retry {
        validate_retry("config.retry", retry, &mut errors);
    }

    if let Some(logging) = &cfg.logging {
        validate_logging(logging, &mut errors);
    }

    if errors.is_empty() {
        info!("config valid");
        Ok(())
    } else {
        error!("configuration validation errors ({}):", errors.len());
        for e in &errors {
            error!(" - {}", e);
        }
        Err(errors)
    }
}

fn validate_retry(path: &str, retry: &RetryConfig, errors: &mut Vec<String>) {
    if let Some(attempts) = retry.attempts {
        if attempts == 0 {
            errors.push(format!("{}.attempts must be > 0", path));
        }
    }
    if let (Some(base), Some(max)) = (retry.base_delay_ms, retry.max_delay_ms) {
        if max < base {
            errors.push(format!(
                "{}.max_delay_ms ({}) must be >= base_delay_ms ({})",
                path, max, base
            ));
        }
    }
}

fn validate_logging(logging: &LoggingConfig, errors: &mut Vec<String>) {
    if !LOG_LEVELS.contains(&logging.level.as_str()) {
        errors.push(format!(
            "config.logging.level '{}' invalid; allowed: {:?}",
            logging.level, LOG_LEVELS
        ));
    }
}
