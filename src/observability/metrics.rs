use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{info, warn};

static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Lazily initializes and returns the process-wide metrics.
///
/// Returns `None` if the registry could not be built; callers skip recording.
pub async fn get_metrics() -> Option<&'static Arc<Metrics>> {
    METRICS_INSTANCE
        .get_or_try_init(|| async {
            info!("Initializing Metrics ...");
            Metrics::new()
        })
        .await
        .inspect_err(|e| warn!(error = %e, "metrics disabled"))
        .ok()
}

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Data source requests
    pub requests: IntCounterVec,
    pub request_failures: IntCounterVec,
    pub request_duration: HistogramVec,

    // Token requests refused before any I/O
    pub token_requests_rejected: IntCounter,
}

impl Metrics {
    fn new() -> prometheus::Result<Arc<Self>> {
        let registry = Registry::new_custom(Some("sorcerer".into()), None)?;

        let metrics = Arc::new(Self {
            requests: IntCounterVec::new(Opts::new("requests_total", "Data source requests by kind"), &["kind", "method"])?,
            request_failures: IntCounterVec::new(Opts::new("request_failures_total", "Data source request failures by reason"), &["kind", "reason"])?,
            request_duration: HistogramVec::new(HistogramOpts::new("request_duration_seconds", "Data source request duration seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]), &["kind"])?,
            token_requests_rejected: IntCounter::new("token_requests_rejected_total", "Token requests rejected by validation")?,
            registry,
        });

        let reg = &metrics.registry;
        reg.register(Box::new(metrics.requests.clone()))?;
        reg.register(Box::new(metrics.request_failures.clone()))?;
        reg.register(Box::new(metrics.request_duration.clone()))?;
        reg.register(Box::new(metrics.token_requests_rejected.clone()))?;

        Ok(metrics)
    }

    /// Text exposition of every registered metric, for the host's scrape endpoint.
    pub fn encode(&self) -> prometheus::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
