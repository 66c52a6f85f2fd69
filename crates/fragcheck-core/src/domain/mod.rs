//! Domain types shared by the checks, the services and the adapters.

mod fragment;
mod gridpack;
mod release;
mod request;
mod ticket;

pub use fragment::Fragment;
pub use gridpack::{GridpackContents, GridpackLocation, GridpackWorkspace};
pub use release::{CmsswRelease, TMPDIR_FIX_ANY};
pub use request::{DEFINED_STATUS, GeneratorParameters, McmRequest};
pub use ticket::{Ticket, TicketEntry, build_range_query, is_root_request};
