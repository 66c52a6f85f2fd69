//! Port trait implementation for `McmClient`.
//!
//! Implements the core-owned `McmClientPort` trait and maps internal errors
//! onto `McmPortError`.

use async_trait::async_trait;
use fragcheck_core::ports::{McmClientPort, McmPortError, McmPortResult};
use fragcheck_core::{McmRequest, Ticket};

use crate::client::McmClient;
use crate::error::McmError;
use crate::http::HttpBackend;

// ============================================================================
// Error Mapping
// ============================================================================

/// Convert internal `McmError` to core `McmPortError`.
///
/// `kind` and `id` describe the document being fetched so that a 404 can be
/// reported as a missing document.
fn map_error(err: McmError, kind: &'static str, id: &str) -> McmPortError {
    match err {
        McmError::ApiRequestFailed { status: 404, .. } => McmPortError::NotFound {
            kind,
            id: id.trim().to_string(),
        },
        McmError::ApiRequestFailed { status, url } => McmPortError::Network {
            message: format!("API request failed with status {status}: {url}"),
        },
        McmError::EmptyResults { kind, id } => McmPortError::NotFound { kind, id },
        McmError::InvalidResponse { message } => McmPortError::InvalidResponse { message },
        McmError::Network(e) => McmPortError::Network {
            message: e.to_string(),
        },
        McmError::InvalidUrl(e) => McmPortError::Configuration {
            message: e.to_string(),
        },
        McmError::JsonParse(e) => McmPortError::InvalidResponse {
            message: e.to_string(),
        },
    }
}

// ============================================================================
// Port Implementation
// ============================================================================

#[async_trait]
impl<B: HttpBackend + Send + Sync> McmClientPort for McmClient<B> {
    async fn get_request(&self, prepid: &str) -> McmPortResult<McmRequest> {
        self.fetch_request(prepid)
            .await
            .map_err(|e| map_error(e, "request", prepid))
    }

    async fn get_ticket(&self, ticket: &str) -> McmPortResult<Ticket> {
        self.fetch_ticket(ticket)
            .await
            .map_err(|e| map_error(e, "ticket", ticket))
    }

    async fn list_requests_with_file(&self, query: &str) -> McmPortResult<Vec<String>> {
        self.list_with_file(query)
            .await
            .map_err(|e| map_error(e, "request list", query))
    }

    async fn get_fragment(&self, prepid: &str) -> McmPortResult<String> {
        self.fetch_fragment(prepid)
            .await
            .map_err(|e| map_error(e, "fragment", prepid))
    }

    async fn get_test_script(&self, prepid: &str) -> McmPortResult<String> {
        self.fetch_test_script(prepid)
            .await
            .map_err(|e| map_error(e, "test script", prepid))
    }
}
