//! Transport boundary
//!
//! The data source hands fully prepared requests to a [`Transport`]; the default
//! implementation sends them with `reqwest` and retries transient failures.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::config::settings::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::request::RequestOptions;
use crate::resilience::retry::RetrySettings;

/// A request ready to be sent: final URL plus method, headers and body.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    pub url: String,
    pub options: RequestOptions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub data: String,
}

pub trait Transport {
    fn send(
        &self,
        request: OutboundRequest,
    ) -> impl std::future::Future<Output = ClientResult<TransportResponse>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    retry: RetrySettings,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            retry: RetrySettings::from(config.retry.as_ref()),
        })
    }

    async fn send_once(&self, request: &OutboundRequest) -> ClientResult<TransportResponse> {
        let options = &request.options;
        let mut builder = self
            .client
            .request(options.method.clone(), &request.url)
            .headers(options.headers.clone());

        if let Some(body) = &options.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;
        let status = response.status();
        let data = response.text().await?;
        debug!(url = %request.url, status = status.as_u16(), "data source responded");

        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: data,
            });
        }

        Ok(TransportResponse {
            status: status.as_u16(),
            data,
        })
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: OutboundRequest) -> ClientResult<TransportResponse> {
        self.retry
            .run_with_retry(|| self.send_once(&request), is_retryable)
            .await
    }
}

/// Connection problems, timeouts and 5xx responses are worth another attempt.
fn is_retryable(error: &ClientError) -> bool {
    match error {
        ClientError::Http(e) => e.is_timeout() || e.is_connect(),
        ClientError::Status { status, .. } => *status >= 500,
        _ => false,
    }
}
