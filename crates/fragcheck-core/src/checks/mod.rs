//! The rule battery.
//!
//! Each function inspects one artifact (request document, fragment, unpacked
//! gridpack) and appends to a [`Findings`](crate::report::Findings) list. The
//! functions never fetch anything; [`RequestValidator`](crate::services::RequestValidator)
//! wires them to the ports.

pub mod fragment;
pub mod generator;
pub mod madgraph;
pub mod powheg;
pub mod request;
pub mod tune;

pub use fragment::FragmentParams;
pub use generator::{GridpackFacts, MatrixElement, SettingsUsage};
