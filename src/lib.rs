//! # Sorcerer Client Library
//!
//! Requests targeted content from a remote data source by key, targeting
//! params or a validated set of tokens, attaching a deterministic cache key
//! to every outbound request.
//!
//! Modules:
//! - `tokens`: token types, options and validation
//! - `request`: request options and the token payload builder
//! - `hash`: cache-key hashing
//! - `sources`: data source facade and HTTP transport
//! - `config`: client configuration loading and validation

pub mod config;
pub mod error;
pub mod hash;
pub mod observability;
pub mod request;
pub mod resilience;
pub mod sources;
pub mod tokens;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::error::{ClientError, ClientResult, RequestValidationError};
pub use crate::hash::{hash_for_request, hash_string};
pub use crate::request::{RequestBuilder, RequestOptions, TargetingParams};
pub use crate::sources::{DataSource, LocationQuery};
pub use crate::tokens::{Token, TokenBase, TokenKind, TokenType};

use anyhow::Result;
use std::path::Path;

use crate::config::settings::ClientConfig;
use crate::utils::logging::{init_logging, resolve, LogLevel};

/// Load the client config, initialise logging from it and build a data source.
pub fn run(config_path: &Path, log_level: Option<LogLevel>) -> Result<DataSource> {
    let config: ClientConfig = config::loader::file_to_config(config_path)?;
    init_logging(&resolve(config.logging.as_ref(), log_level));
    Ok(DataSource::from_config(&config)?)
}
