//! McM client for fetching requests, tickets and their attachments.

// Constructor is used via port.rs which compiler doesn't detect
#![allow(dead_code)]

mod requests;
mod tickets;

use crate::config::McmClientConfig;
use crate::error::McmResult;
use crate::http::{HttpBackend, ReqwestBackend};
use crate::models::McmConfig;
use url::Url;

// ============================================================================
// Type Aliases
// ============================================================================

/// Default McM client using the reqwest HTTP backend.
pub type DefaultMcmClient = McmClient<ReqwestBackend>;

// ============================================================================
// Client
// ============================================================================

/// Client for the McM REST API.
///
/// Generic over an HTTP backend so tests can run without the network.
/// External code should use `DefaultMcmClient::new()` and talk to it through
/// `McmClientPort`.
pub struct McmClient<B: HttpBackend> {
    pub(crate) backend: B,
    pub(crate) config: McmConfig,
}

impl DefaultMcmClient {
    /// Create a new client with the given configuration.
    ///
    /// Fails when the base URL does not parse or the HTTP client cannot be built.
    pub fn new(config: &McmClientConfig) -> McmResult<Self> {
        let internal_config = Self::to_internal_config(config)?;
        let backend = ReqwestBackend::new(&internal_config, config.timeout, &config.user_agent)?;
        Ok(Self {
            backend,
            config: internal_config,
        })
    }

    fn to_internal_config(config: &McmClientConfig) -> McmResult<McmConfig> {
        let mut base = config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        Ok(McmConfig {
            base_url: Url::parse(&base)?,
            max_retries: config.max_retries,
            #[allow(clippy::cast_possible_truncation)] // Duration milliseconds won't exceed u64 in practice
            retry_base_delay_ms: config.retry_base_delay.as_millis() as u64,
        })
    }
}

impl<B: HttpBackend> McmClient<B> {
    /// Create a new client with a custom backend.
    #[cfg(test)]
    pub(crate) const fn with_backend(config: McmConfig, backend: B) -> Self {
        Self { backend, config }
    }

    /// Base URL of the instance this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.config.base_url
    }
}
