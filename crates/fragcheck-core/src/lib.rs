//! Core of `fragcheck`: domain types, the rule battery, ports and services.
//!
//! This crate does no I/O beyond reading unpacked gridpack files; requests,
//! fragments and archives come in through the traits in [`ports`].

#![deny(unused_crate_dependencies)]

pub mod checks;
pub mod domain;
pub mod paths;
pub mod ports;
pub mod report;
pub mod services;
pub mod settings;

pub use domain::{
    CmsswRelease, Fragment, GeneratorParameters, GridpackContents, GridpackLocation,
    GridpackWorkspace, McmRequest, Ticket, TicketEntry, build_range_query, is_root_request,
};
pub use paths::{WORK_DIR_ENV, default_work_dir, resolve_work_dir};
pub use ports::{
    CoreError, GridpackError, GridpackPort, McmClientPort, McmPortError, McmPortResult,
    PatchError, PatchRunnerPort, PatchTarget,
};
pub use report::{Finding, Findings, Outcome, RequestReport, Severity, SkipReason};
pub use services::{RequestSelector, RequestValidator};
pub use settings::{Settings, SettingsError, validate_settings};
