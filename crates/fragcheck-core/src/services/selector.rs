//! Request selection - turns CLI input into the list of prepids to check.

use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::is_root_request;
use crate::ports::{CoreError, McmClientPort};

/// Resolves explicit prepids and tickets into prepids.
pub struct RequestSelector {
    mcm: Arc<dyn McmClientPort>,
}

impl RequestSelector {
    pub fn new(mcm: Arc<dyn McmClientPort>) -> Self {
        Self { mcm }
    }

    /// Root requests of a ticket (the first request of every chain).
    pub async fn root_requests(&self, ticket: &str) -> Result<Vec<String>, CoreError> {
        let ticket = self.mcm.get_ticket(ticket).await?;
        let query = ticket.range_query();
        tracing::debug!(ticket = %ticket.prepid, %query, "Expanding ticket");

        if query.is_empty() {
            return Ok(Vec::new());
        }

        let requests = self.mcm.list_requests_with_file(&query).await?;
        Ok(requests
            .into_iter()
            .filter(|prepid| is_root_request(prepid))
            .collect())
    }

    /// Explicit prepids followed by the ticket's root requests, without duplicates.
    ///
    /// Several chains of a ticket can share a root request; it is checked once.
    pub async fn select(
        &self,
        prepids: &[String],
        ticket: Option<&str>,
    ) -> Result<Vec<String>, CoreError> {
        let mut selected: Vec<String> = prepids.to_vec();
        if let Some(ticket) = ticket {
            selected.extend(self.root_requests(ticket).await?);
        }

        let mut seen = HashSet::new();
        selected.retain(|prepid| seen.insert(prepid.clone()));

        if selected.is_empty() {
            return Err(CoreError::Validation(
                "No requests to check: give --prepid or a ticket with root requests".to_string(),
            ));
        }
        Ok(selected)
    }
}
