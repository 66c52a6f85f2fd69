//! Tickets group root requests of request chains.

use serde::{Deserialize, Serialize};

/// Request types that start a chain and therefore own the generator fragment.
const ROOT_REQUEST_MARKERS: &[&str] = &["GS", "wmLHE", "pLHE", "FS"];

/// One entry of a ticket's request list.
///
/// The service stores either a single prepid or an inclusive `[first, last]` range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TicketEntry {
    Single(String),
    Range(String, String),
}

/// A ticket document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    #[serde(default)]
    pub prepid: String,
    #[serde(default)]
    pub requests: Vec<TicketEntry>,
}

impl Ticket {
    /// Query text understood by the `listwithfile` endpoint.
    pub fn range_query(&self) -> String {
        build_range_query(&self.requests)
    }
}

/// Build a newline-separated query: one prepid per line, ranges as `a -> b`.
pub fn build_range_query(entries: &[TicketEntry]) -> String {
    entries
        .iter()
        .map(|entry| match entry {
            TicketEntry::Single(prepid) => format!("{prepid}\n"),
            TicketEntry::Range(first, last) => format!("{first} -> {last}\n"),
        })
        .collect()
}

/// Whether the prepid names a chain root (GEN-SIM, LHE or FastSim request).
pub fn is_root_request(prepid: &str) -> bool {
    ROOT_REQUEST_MARKERS.iter().any(|m| prepid.contains(m))
}
