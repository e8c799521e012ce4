use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::Method;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::config::settings::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::hash::hash_for_request;
use crate::observability::metrics::get_metrics;
use crate::request::{RequestBuilder, RequestOptions, TargetingParams};
use crate::sources::location::LocationQuery;
use crate::sources::transport::{HttpTransport, OutboundRequest, Transport};
use crate::utils::constants::{
    HEADER_CACHE_KEY, HEADER_PROXY_TTL, PARAM_INCLUDE_HEADERS, PARAM_MULTIPLE,
};

/// Raw body returned by the data source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub data: String,
}

impl RawResponse {
    pub fn json<R: DeserializeOwned>(&self) -> ClientResult<R> {
        Ok(serde_json::from_str(&self.data)?)
    }
}

/// Client for one data source. Key, base URL and default cache time are
/// read-only after construction.
#[derive(Debug, Clone)]
pub struct DataSource<T = HttpTransport> {
    key: String,
    base_url: String,
    cache_time_ms: u64,
    transport: T,
}

impl DataSource<HttpTransport> {
    pub fn new(key: &str) -> ClientResult<Self> {
        Self::from_config(&ClientConfig::new(key))
    }

    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> DataSource<T> {
    pub fn with_transport(config: &ClientConfig, transport: T) -> Self {
        Self {
            key: config.key.to_owned(),
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            cache_time_ms: config.cache_time_ms,
            transport,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// `<base_url>/<key>`; also the resource key of the cache hash.
    pub fn resource_key(&self) -> String {
        format!("{}/{}", self.base_url, self.key)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Plain lookup by targeting params.
    pub async fn get_raw_data(
        &self,
        params: &TargetingParams,
        options: RequestOptions,
    ) -> ClientResult<RawResponse> {
        self.dispatch("raw", params, options).await
    }

    /// Every row matching `params`, optionally with the header row first.
    pub async fn get_all_rows<R: DeserializeOwned>(
        &self,
        params: &TargetingParams,
        include_headers: bool,
        options: RequestOptions,
    ) -> ClientResult<R> {
        let mut params = params.clone();
        params.insert(PARAM_MULTIPLE.to_owned(), Value::Bool(true));
        if include_headers {
            params.insert(PARAM_INCLUDE_HEADERS.to_owned(), Value::Bool(true));
        }
        self.dispatch("all_rows", &params, options).await?.json()
    }

    /// Rows for the target sets already present in a POST body.
    pub async fn get_multiple_rows<R: DeserializeOwned>(
        &self,
        options: RequestOptions,
    ) -> ClientResult<R> {
        if options.method != Method::POST {
            return Err(ClientError::InvalidRequest(
                "Request method must be POST for getMultipleRows".to_owned(),
            ));
        }
        self.dispatch("multiple_rows", &multiple_params(), options)
            .await?
            .json()
    }

    pub async fn get_single_target<R: DeserializeOwned>(
        &self,
        targeting: &TargetingParams,
        options: RequestOptions,
    ) -> ClientResult<R> {
        self.dispatch("single_target", targeting, options)
            .await?
            .json()
    }

    /// POST several target sets at once.
    pub async fn get_multiple_targets<R: DeserializeOwned>(
        &self,
        target_sets: &[TargetingParams],
        options: RequestOptions,
    ) -> ClientResult<R> {
        let body = serde_json::to_string(target_sets)?;
        let options = as_json_post(options, body);
        self.dispatch("multiple_targets", &multiple_params(), options)
            .await?
            .json()
    }

    pub async fn get_location_targets<R: DeserializeOwned>(
        &self,
        location: &LocationQuery,
        targeting: &TargetingParams,
        options: RequestOptions,
    ) -> ClientResult<R> {
        let mut params = targeting.clone();
        location.apply(&mut params);
        params.insert(PARAM_MULTIPLE.to_owned(), Value::Bool(true));
        self.dispatch("location_targets", &params, options)
            .await?
            .json()
    }

    /// Send a token payload. Invalid tokens fail the call before any request is made.
    pub async fn get_with_tokens(
        &self,
        builder: &RequestBuilder,
        options: RequestOptions,
    ) -> ClientResult<RawResponse> {
        let body = match builder.to_json() {
            Ok(body) => body,
            Err(e) => {
                if let Some(metrics) = get_metrics().await {
                    metrics.token_requests_rejected.inc();
                }
                return Err(e);
            }
        };
        let options = as_json_post(options, body);
        self.dispatch("tokens", &TargetingParams::new(), options)
            .await
    }

    async fn dispatch(
        &self,
        kind: &'static str,
        params: &TargetingParams,
        mut options: RequestOptions,
    ) -> ClientResult<RawResponse> {
        let resource_key = self.resource_key();
        let url = build_url(&resource_key, params)?;

        let cache_time = options
            .cache_time
            .filter(|t| *t > 0)
            .unwrap_or(self.cache_time_ms);
        options.cache_time = Some(cache_time);
        let ttl = HeaderValue::from_str(&proxy_ttl(cache_time))
            .map_err(|e| ClientError::InvalidRequest(format!("proxy ttl header: {}", e)))?;
        options
            .headers
            .insert(HeaderName::from_static(HEADER_PROXY_TTL), ttl);

        let cache_key = hash_for_request(&resource_key, params, &options)?;
        let cache_key_value = HeaderValue::from_str(&cache_key)
            .map_err(|e| ClientError::InvalidRequest(format!("cache key header: {}", e)))?;
        options
            .headers
            .insert(HeaderName::from_static(HEADER_CACHE_KEY), cache_key_value);

        debug!(kind, url = %url, cache_key = %cache_key, "sending data source request");

        let metrics = get_metrics().await;
        if let Some(metrics) = metrics {
            metrics
                .requests
                .with_label_values(&[kind, options.method.as_str()])
                .inc();
        }

        let start = Instant::now();
        let result = self.transport.send(OutboundRequest { url, options }).await;

        if let Some(metrics) = metrics {
            metrics
                .request_duration
                .with_label_values(&[kind])
                .observe(start.elapsed().as_secs_f64());
            if let Err(e) = &result {
                metrics
                    .request_failures
                    .with_label_values(&[kind, failure_reason(e)])
                    .inc();
            }
        }

        let response = result?;
        info!(kind, status = response.status, "data source request completed");
        Ok(RawResponse {
            data: response.data,
        })
    }
}

fn multiple_params() -> TargetingParams {
    let mut params = TargetingParams::new();
    params.insert(PARAM_MULTIPLE.to_owned(), Value::Bool(true));
    params.insert(PARAM_INCLUDE_HEADERS.to_owned(), Value::Bool(true));
    params
}

/// Cache time in seconds as a decimal number: 10000 ms is `10`, 1500 ms is `1.5`.
fn proxy_ttl(cache_time_ms: u64) -> String {
    if cache_time_ms % 1000 == 0 {
        (cache_time_ms / 1000).to_string()
    } else {
        (cache_time_ms as f64 / 1000.0).to_string()
    }
}

fn as_json_post(mut options: RequestOptions, body: String) -> RequestOptions {
    options.method = Method::POST;
    options.body = Some(body);
    options
        .headers
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    options
}

/// Append params as a query string, in insertion order.
pub fn build_url(resource_key: &str, params: &TargetingParams) -> ClientResult<String> {
    let mut url = Url::parse(resource_key)
        .map_err(|e| ClientError::InvalidRequest(format!("url '{}': {}", resource_key, e)))?;

    if !params.is_empty() {
        let mut query = url.query_pairs_mut();
        for (key, value) in params {
            query.append_pair(key, &param_value(value));
        }
    }

    Ok(url.to_string())
}

fn param_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.to_owned(),
        Value::Array(items) => items
            .iter()
            .map(param_value)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

fn failure_reason(error: &ClientError) -> &'static str {
    match error {
        ClientError::Validation(_) => "validation",
        ClientError::Http(_) => "http",
        ClientError::Status { .. } => "status",
        ClientError::Serialization(_) => "serialization",
        ClientError::InvalidRequest(_) => "invalid_request",
    }
}
