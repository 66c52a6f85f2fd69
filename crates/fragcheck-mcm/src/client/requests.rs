//! Request documents and their text attachments.

use fragcheck_core::McmRequest;

use crate::error::{McmError, McmResult};
use crate::http::HttpBackend;
use crate::models::{Envelope, ListWithFileBody, ListedRequest};
use crate::url::{
    build_fragment_url, build_list_with_file_url, build_request_url, build_test_script_url,
};

use super::McmClient;

impl<B: HttpBackend> McmClient<B> {
    /// Fetch a request document.
    pub(crate) async fn fetch_request(&self, prepid: &str) -> McmResult<McmRequest> {
        let url = build_request_url(&self.config, prepid)?;
        let envelope: Envelope = self.backend.get_json(&url).await?;
        let results = envelope.into_results().ok_or_else(|| McmError::EmptyResults {
            kind: "request",
            id: prepid.trim().to_string(),
        })?;
        Ok(serde_json::from_value(results)?)
    }

    /// Expand a range query into the prepids it covers, in service order.
    pub(crate) async fn list_with_file(&self, query: &str) -> McmResult<Vec<String>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let url = build_list_with_file_url(&self.config)?;
        let body = ListWithFileBody { contents: query };
        let envelope: Envelope = self.backend.put_json(&url, &body).await?;
        let Some(results) = envelope.into_results() else {
            return Ok(Vec::new());
        };

        let listed: Vec<ListedRequest> = serde_json::from_value(results)?;
        tracing::debug!(count = listed.len(), "Expanded range query");
        Ok(listed.into_iter().map(|r| r.prepid).collect())
    }

    pub(crate) async fn fetch_fragment(&self, prepid: &str) -> McmResult<String> {
        let url = build_fragment_url(&self.config, prepid)?;
        self.backend.get_text(&url).await
    }

    pub(crate) async fn fetch_test_script(&self, prepid: &str) -> McmResult<String> {
        let url = build_test_script_url(&self.config, prepid)?;
        self.backend.get_text(&url).await
    }
}
