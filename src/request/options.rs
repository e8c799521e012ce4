use std::borrow::Cow;

use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, Method};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ClientError, ClientResult};
use crate::utils::constants::{HEADER_IGNORE_PARAMS, HEADER_PROXY_TTL};

/// Targeting parameters: plain key -> value filters sent as the query string.
pub type TargetingParams = Map<String, Value>;

/// Outbound request metadata handed to the transport.
///
/// The serialized form is the metadata hashed into the cache key: keys in the
/// order method, body, cacheTime, headers, with the default method and any unset
/// field left out.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOptions {
    #[serde(with = "http_serde::method", skip_serializing_if = "is_default_method")]
    pub method: Method,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_time: Option<u64>,
    #[serde(serialize_with = "serialize_headers", skip_serializing_if = "HeaderMap::is_empty")]
    pub headers: HeaderMap,
}

fn is_default_method(method: &Method) -> bool {
    *method == Method::GET
}

#[derive(Serialize)]
#[serde(untagged)]
enum HeaderField<'a> {
    Integer(u64),
    Float(f64),
    Text(Cow<'a, str>),
}

impl<'a> HeaderField<'a> {
    fn new(name: &HeaderName, value: &'a HeaderValue) -> Self {
        let text = String::from_utf8_lossy(value.as_bytes());
        // the proxy ttl is a number of seconds, possibly fractional
        if name.as_str() == HEADER_PROXY_TTL {
            if let Ok(seconds) = text.parse::<u64>() {
                return HeaderField::Integer(seconds);
            }
            if let Ok(seconds) = text.parse::<f64>() {
                return HeaderField::Float(seconds);
            }
        }
        HeaderField::Text(text)
    }
}

fn serialize_headers<S: Serializer>(headers: &HeaderMap, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(headers.keys_len()))?;
    for name in headers.keys() {
        let mut fields: Vec<HeaderField> = headers
            .get_all(name)
            .iter()
            .map(|value| HeaderField::new(name, value))
            .collect();
        if fields.len() == 1 {
            map.serialize_entry(name.as_str(), &fields.remove(0))?;
        } else {
            map.serialize_entry(name.as_str(), &fields)?;
        }
    }
    map.end()
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: HeaderMap::new(),
            body: None,
            cache_time: None,
        }
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post(body: impl Into<String>) -> Self {
        Self {
            method: Method::POST,
            body: Some(body.into()),
            ..Self::default()
        }
    }

    pub fn post_json(body: &Value) -> ClientResult<Self> {
        let mut options = Self::post(serde_json::to_string(body)?);
        options
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(options)
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_cache_time(mut self, cache_time_ms: u64) -> Self {
        self.cache_time = Some(cache_time_ms);
        self
    }

    /// Exclude the given targeting params from the cache key.
    pub fn ignoring_params(self, params: &[&str]) -> ClientResult<Self> {
        let value = HeaderValue::from_str(&params.join(","))
            .map_err(|e| ClientError::InvalidRequest(format!("ignore list: {}", e)))?;
        Ok(self.with_header(HeaderName::from_static(HEADER_IGNORE_PARAMS), value))
    }

    /// Parameter names listed in the ignore header. Blank entries are dropped,
    /// so an empty header ignores nothing.
    pub fn ignored_params(&self) -> Vec<String> {
        self.headers
            .get_all(HEADER_IGNORE_PARAMS)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|list| list.split(','))
            .map(str::trim)
            .filter(|param| !param.is_empty())
            .map(str::to_owned)
            .collect()
    }
}
