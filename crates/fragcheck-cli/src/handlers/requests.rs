//! `requests` command handler: root requests of a ticket.

use crate::bootstrap::CliContext;
use crate::error::CliError;

pub async fn execute(ctx: &CliContext, ticket: &str) -> Result<u8, CliError> {
    let roots = ctx.selector.root_requests(ticket).await?;
    if roots.is_empty() {
        tracing::warn!(%ticket, "Ticket has no root requests");
    }
    for prepid in roots {
        println!("{prepid}");
    }
    Ok(0)
}
