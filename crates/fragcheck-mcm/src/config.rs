//! Public configuration for the McM client.
//!
//! The internal config is derived from this.

use std::time::Duration;

/// Production McM instance.
pub const PROD_BASE_URL: &str = "https://cms-pdmv.cern.ch/mcm/";

/// Development McM instance.
pub const DEV_BASE_URL: &str = "https://cms-pdmv-dev.cern.ch/mcm/";

/// Configuration for the McM client.
///
/// # Example
///
/// ```
/// use fragcheck_mcm::McmClientConfig;
/// use std::time::Duration;
///
/// let config = McmClientConfig::new()
///     .with_dev(true)
///     .with_timeout(Duration::from_secs(60));
/// ```
#[derive(Debug, Clone)]
pub struct McmClientConfig {
    /// Base URL of the McM instance (with trailing slash)
    pub(crate) base_url: String,
    /// User agent string for HTTP requests
    pub(crate) user_agent: String,
    /// Request timeout
    pub(crate) timeout: Duration,
    /// Maximum number of retry attempts for transient errors
    pub(crate) max_retries: u8,
    /// Base delay for exponential backoff
    pub(crate) retry_base_delay: Duration,
}

impl Default for McmClientConfig {
    fn default() -> Self {
        Self {
            base_url: PROD_BASE_URL.to_string(),
            user_agent: concat!("fragcheck/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 3,
            retry_base_delay: Duration::from_millis(500),
        }
    }
}

impl McmClientConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL of the McM instance.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Switch between the production and the development instance.
    #[must_use]
    pub fn with_dev(self, dev: bool) -> Self {
        self.with_base_url(if dev { DEV_BASE_URL } else { PROD_BASE_URL })
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout.
    ///
    /// Defaults to 60 seconds.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum number of retry attempts for transient errors.
    ///
    /// Defaults to 3 retries.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the base delay for exponential backoff retries.
    #[must_use]
    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }
}
