//! Request-tracking service port.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{McmRequest, Ticket};

/// Errors from request-tracking service operations.
///
/// Implementation-specific errors (HTTP, JSON) are mapped to these.
#[derive(Debug, Error)]
pub enum McmPortError {
    /// The requested document does not exist (or the service returned no results).
    #[error("{kind} '{id}' not found")]
    NotFound {
        /// Document kind ("request", "ticket", ...)
        kind: &'static str,
        /// Identifier that was looked up
        id: String,
    },

    /// Network or connectivity error.
    #[error("Network error: {message}")]
    Network { message: String },

    /// The service answered with something unexpected.
    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    /// Client configuration is unusable.
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Result type alias for request-tracking port operations.
pub type McmPortResult<T> = Result<T, McmPortError>;

/// Port trait for the request-tracking service.
///
/// The implementation lives in `fragcheck-mcm`. Access is anonymous and read-only
/// apart from the range listing, which the service exposes as a PUT.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait McmClientPort: Send + Sync {
    /// Fetch a request document by prepid.
    async fn get_request(&self, prepid: &str) -> McmPortResult<McmRequest>;

    /// Fetch a ticket document.
    async fn get_ticket(&self, ticket: &str) -> McmPortResult<Ticket>;

    /// Expand a range query (one prepid or `a -> b` range per line) into prepids.
    async fn list_requests_with_file(&self, query: &str) -> McmPortResult<Vec<String>>;

    /// Generator fragment of a request. Empty when the request has none.
    async fn get_fragment(&self, prepid: &str) -> McmPortResult<String>;

    /// Test script generated for a request (contains the cmsDriver command).
    async fn get_test_script(&self, prepid: &str) -> McmPortResult<String>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    // Verify the trait is object-safe
    fn _assert_object_safe(_: Arc<dyn McmClientPort>) {}

    #[test]
    fn test_error_display() {
        let err = McmPortError::NotFound {
            kind: "request",
            id: "HIG-RunIIFall18wmLHEGS-00001".to_string(),
        };
        assert_eq!(err.to_string(), "request 'HIG-RunIIFall18wmLHEGS-00001' not found");
    }
}
