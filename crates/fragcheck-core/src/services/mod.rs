//! Core services - orchestration between ports and the rule battery.
//!
//! Services here only know the port traits; the CLI wires in the concrete
//! adapters.

mod selector;
mod validator;

pub use selector::RequestSelector;
pub use validator::RequestValidator;
