//! Ticket documents.

use fragcheck_core::Ticket;

use crate::error::{McmError, McmResult};
use crate::http::HttpBackend;
use crate::models::Envelope;
use crate::url::build_ticket_url;

use super::McmClient;

impl<B: HttpBackend> McmClient<B> {
    /// Fetch a ticket document.
    pub(crate) async fn fetch_ticket(&self, ticket: &str) -> McmResult<Ticket> {
        let url = build_ticket_url(&self.config, ticket)?;
        let envelope: Envelope = self.backend.get_json(&url).await?;
        let results = envelope.into_results().ok_or_else(|| McmError::EmptyResults {
            kind: "ticket",
            id: ticket.trim().to_string(),
        })?;
        Ok(serde_json::from_value(results)?)
    }
}
