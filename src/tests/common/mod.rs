// tests/common/mod.rs
pub use serde_json::json;

use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::config::settings::ClientConfig;
use crate::error::ClientResult;
use crate::request::TargetingParams;
use crate::sources::transport::{OutboundRequest, Transport, TransportResponse};
use crate::tokens::{SigningOptions, Token, TokenBase};

pub const TEST_BASE_URL: &str = "https://sorcerer.example/data_sources";

/// Build targeting params from a `json!` object literal.
pub fn params(value: Value) -> TargetingParams {
    match value {
        Value::Object(map) => map,
        other => panic!("params must be a JSON object, got {}", other),
    }
}

pub fn test_config(key: &str) -> ClientConfig {
    let mut config = ClientConfig::new(key);
    config.base_url = TEST_BASE_URL.to_owned();
    config
}

pub fn hmac_options() -> SigningOptions {
    SigningOptions::new("sha1", "watson", "mystring", "hex")
}

pub fn favorite_band() -> Token {
    Token::replace(
        TokenBase::named("FavoriteBand").cache_override("Movable Band"),
        "Beatles",
    )
}

/// Transport double: records every request and answers with a canned body.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    pub sent: Arc<Mutex<Vec<OutboundRequest>>>,
    pub response: String,
}

impl RecordingTransport {
    pub fn responding(response: &str) -> Self {
        Self {
            sent: Arc::default(),
            response: response.to_owned(),
        }
    }

    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.sent.lock().expect("recording lock").clone()
    }
}

impl Transport for RecordingTransport {
    async fn send(&self, request: OutboundRequest) -> ClientResult<TransportResponse> {
        self.sent.lock().expect("recording lock").push(request);
        Ok(TransportResponse {
            status: 200,
            data: self.response.clone(),
        })
    }
}
