//! Shared constants and invariants

/// Max length for replace values and cache overrides; `replaceLarge` values must exceed it.
pub const CHAR_LIMIT: usize = 100;

pub const ALLOWED_ALGORITHMS: [&str; 4] = ["sha256", "sha1", "md5", "sha512"];
pub const ALLOWED_ENCODINGS: [&str; 4] = ["hex", "base64", "base64url", "base64percent"];
pub const SHA1_ENCODINGS: [&str; 2] = ["hex", "base64"];

pub const TOKEN_API_VERSION: &str = "V1";

pub const DEFAULT_BASE_URL: &str = "https://sorcerer.movableink-templates.com/data_sources";
pub const DEFAULT_CACHE_TIME_MS: u64 = 10 * 1000;
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 5000;

// Headers
pub const HEADER_CACHE_KEY: &str = "x-mi-cbe";
pub const HEADER_PROXY_TTL: &str = "x-reverse-proxy-ttl";
pub const HEADER_IGNORE_PARAMS: &str = "x-cache-ignore-query-params";

// Targeting params understood by the data source
pub const PARAM_MULTIPLE: &str = "mi_multiple";
pub const PARAM_INCLUDE_HEADERS: &str = "mi_include_headers";
pub const PARAM_LATITUDE: &str = "mi_lat";
pub const PARAM_LONGITUDE: &str = "mi_lon";
pub const PARAM_RADIUS: &str = "mi_radius";
pub const PARAM_LIMIT: &str = "mi_limit";
pub const PARAM_PAGE: &str = "mi_page";
