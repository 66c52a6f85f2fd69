//! HTTP backend abstraction for the McM API.
//!
//! The production implementation uses reqwest with automatic retry logic for
//! transient errors. Tests swap in a fake backend with canned responses.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{McmError, McmResult};
use crate::models::McmConfig;

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// Trait for HTTP backends talking to McM.
///
/// This is an implementation detail - external code should use the `McmClientPort` trait.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// GET a URL and deserialize the JSON body.
    async fn get_json<T: DeserializeOwned + Send>(&self, url: &Url) -> McmResult<T>;

    /// PUT a JSON body and deserialize the JSON answer.
    async fn put_json<B: Serialize + Sync, T: DeserializeOwned + Send>(
        &self,
        url: &Url,
        body: &B,
    ) -> McmResult<T>;

    /// GET a URL and return the body as text.
    async fn get_text(&self, url: &Url) -> McmResult<String>;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production HTTP backend using reqwest with retry logic.
///
/// Implements exponential backoff for transient server errors (5xx)
/// and network errors.
pub struct ReqwestBackend {
    client: reqwest::Client,
    max_retries: u8,
    retry_base_delay_ms: u64,
}

impl ReqwestBackend {
    pub fn new(config: &McmConfig, timeout: Duration, user_agent: &str) -> McmResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            max_retries: config.max_retries,
            retry_base_delay_ms: config.retry_base_delay_ms,
        })
    }

    /// Send a request with automatic retry for transient errors.
    async fn send_with_retry<F>(&self, url: &Url, build: F) -> McmResult<reqwest::Response>
    where
        F: Fn() -> reqwest::RequestBuilder + Send + Sync,
    {
        let mut last_error: Option<McmError> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = Duration::from_millis(
                    self.retry_base_delay_ms * 2u64.pow(u32::from(attempt) - 1),
                );
                tracing::debug!(%url, attempt, ?delay, "Retrying McM request");
                tokio::time::sleep(delay).await;
            }

            match build().send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }

                    // 5xx errors are retryable (server-side issues)
                    if status.is_server_error() && attempt < self.max_retries {
                        last_error = Some(McmError::ApiRequestFailed {
                            status: status.as_u16(),
                            url: url.to_string(),
                        });
                        continue;
                    }

                    // 4xx errors or final attempt - fail immediately
                    return Err(McmError::ApiRequestFailed {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }
                Err(e) => {
                    // Network errors are retryable
                    if attempt < self.max_retries {
                        tracing::warn!(%url, "McM request failed: {e}");
                        last_error = Some(e.into());
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }

        Err(last_error.unwrap_or_else(|| McmError::InvalidResponse {
            message: "Unknown error during fetch".to_string(),
        }))
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn get_json<T: DeserializeOwned + Send>(&self, url: &Url) -> McmResult<T> {
        let response = self
            .send_with_retry(url, || self.client.get(url.as_str()))
            .await?;
        Ok(response.json().await?)
    }

    async fn put_json<B: Serialize + Sync, T: DeserializeOwned + Send>(
        &self,
        url: &Url,
        body: &B,
    ) -> McmResult<T> {
        let response = self
            .send_with_retry(url, || self.client.put(url.as_str()).json(body))
            .await?;
        Ok(response.json().await?)
    }

    async fn get_text(&self, url: &Url) -> McmResult<String> {
        let response = self
            .send_with_retry(url, || self.client.get(url.as_str()))
            .await?;
        Ok(response.text().await?)
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reqwest_backend_creation() {
        let backend =
            ReqwestBackend::new(&McmConfig::default(), Duration::from_secs(5), "test").unwrap();
        assert_eq!(backend.max_retries, 3);
        assert_eq!(backend.retry_base_delay_ms, 500);
    }

    #[tokio::test]
    async fn test_fake_backend_returns_canned_json() {
        let backend =
            FakeBackend::new().with_response("get/X", CannedResponse::Json(json!({"results": 1})));
        let url = Url::parse("https://example.com/get/X").unwrap();
        let value: serde_json::Value = backend.get_json(&url).await.unwrap();
        assert_eq!(value["results"], 1);
    }

    #[tokio::test]
    async fn test_fake_backend_returns_404_for_unknown_url() {
        let backend = FakeBackend::new();
        let url = Url::parse("https://example.com/unknown").unwrap();
        let result: McmResult<serde_json::Value> = backend.get_json(&url).await;
        assert!(matches!(
            result,
            Err(McmError::ApiRequestFailed { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn test_fake_backend_status() {
        let backend = FakeBackend::new().with_response("boom", CannedResponse::Status(500));
        let url = Url::parse("https://example.com/boom").unwrap();
        assert!(matches!(
            backend.get_text(&url).await,
            Err(McmError::ApiRequestFailed { status: 500, .. })
        ));
    }
}
