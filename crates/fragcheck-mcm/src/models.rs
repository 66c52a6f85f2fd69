//! Internal configuration and wire types for the McM REST API.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::PROD_BASE_URL;

/// Internal client configuration, derived from [`crate::McmClientConfig`].
#[derive(Debug, Clone)]
pub struct McmConfig {
    /// Base URL of the McM instance, always ending in `/`.
    pub base_url: Url,
    pub max_retries: u8,
    /// Base delay in milliseconds for exponential backoff.
    pub retry_base_delay_ms: u64,
}

impl Default for McmConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(PROD_BASE_URL).expect("default McM URL is valid"),
            max_retries: 3,
            retry_base_delay_ms: 500,
        }
    }
}

/// Every JSON endpoint wraps its payload in `{"results": ...}`.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub results: serde_json::Value,
}

impl Envelope {
    /// The payload, unless the service returned nothing useful.
    pub fn into_results(self) -> Option<serde_json::Value> {
        let empty = match &self.results {
            serde_json::Value::Null => true,
            serde_json::Value::Object(map) => map.is_empty(),
            serde_json::Value::Array(items) => items.is_empty(),
            serde_json::Value::String(text) => text.is_empty(),
            _ => false,
        };
        (!empty).then_some(self.results)
    }
}

/// Body of the `listwithfile` PUT.
#[derive(Debug, Serialize)]
pub struct ListWithFileBody<'a> {
    pub contents: &'a str,
}

/// Entry of the `listwithfile` response; only the prepid is used.
#[derive(Debug, Deserialize)]
pub struct ListedRequest {
    pub prepid: String,
}
