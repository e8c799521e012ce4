//! Cache-key hashing.
//!
//! The key is a non-cryptographic fingerprint shared with the remote cache, so
//! both the normalisation and the hash must reproduce its output exactly.
//!
//! Two modes, picked from the request body:
//! - token payload: only `name` plus `cacheOverride` (or `value`) of tokens not
//!   flagged `skipCache` contribute;
//! - plain params: targeting params minus the ignore list, plus request metadata.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ClientResult;
use crate::request::{RequestOptions, TargetingParams};
use crate::utils::constants::{HEADER_CACHE_KEY, HEADER_IGNORE_PARAMS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashMode {
    Params,
    Tokens,
}

#[derive(Debug, Deserialize)]
struct CachePayload {
    #[serde(rename = "tokenApiVersion")]
    #[allow(dead_code)]
    token_api_version: String,
    tokens: Vec<CacheToken>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CacheToken {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    cache_override: Option<String>,
    #[serde(default)]
    skip_cache: bool,
}

/// 32-bit rolling hash over UTF-16 code units, rendered as a signed decimal.
///
/// `hash = (hash << 5) - hash + unit`, truncated to 32 bits after each step.
pub fn hash_string(input: &str) -> String {
    let hash = input.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit))
    });
    hash.to_string()
}

/// Which mode [`hash_for_request`] will use for these options.
pub fn hash_mode(options: &RequestOptions) -> HashMode {
    match parse_payload(options) {
        Some(_) => HashMode::Tokens,
        None => HashMode::Params,
    }
}

/// Compute the cache key for a request. Neither input is modified.
pub fn hash_for_request(
    resource_key: &str,
    params: &TargetingParams,
    options: &RequestOptions,
) -> ClientResult<String> {
    let source = match parse_payload(options) {
        Some(payload) => token_source(resource_key, payload)?,
        None => params_source(resource_key, params, options)?,
    };
    Ok(hash_string(&source))
}

// Malformed or non-token bodies are not an error: they fall back to params mode.
fn parse_payload(options: &RequestOptions) -> Option<CachePayload> {
    let body = options.body.as_deref()?;
    match serde_json::from_str::<CachePayload>(body) {
        Ok(payload) => Some(payload),
        Err(e) => {
            debug!(error = %e, "body is not a token payload, hashing params");
            None
        }
    }
}

fn token_source(resource_key: &str, payload: CachePayload) -> ClientResult<String> {
    let reduced: Vec<Value> = payload
        .tokens
        .into_iter()
        .filter(|token| !token.skip_cache)
        .map(|token| {
            let mut entry = Map::new();
            let cache_value = token
                .cache_override
                .filter(|o| !o.is_empty())
                .or(token.value);
            // a nameless token still counts, as an empty entry
            if let (Some(name), Some(cache_value)) = (token.name, cache_value) {
                entry.insert(name, Value::String(cache_value));
            }
            Value::Object(entry)
        })
        .collect();

    debug!(tokens = reduced.len(), "hashing token payload");
    Ok(format!("{}{}", resource_key, serde_json::to_string(&reduced)?))
}

fn params_source(
    resource_key: &str,
    params: &TargetingParams,
    options: &RequestOptions,
) -> ClientResult<String> {
    let ignored = options.ignored_params();

    let mut params = params.clone();
    params.retain(|key, _| !ignored.contains(key));

    let mut metadata = options.clone();
    metadata.headers.remove(HEADER_IGNORE_PARAMS);
    metadata.headers.remove(HEADER_CACHE_KEY);

    debug!(params = params.len(), ignored = ignored.len(), "hashing targeting params");
    Ok(format!(
        "{}{}{}",
        resource_key,
        serde_json::to_string(&params)?,
        serde_json::to_string(&metadata)?
    ))
}
