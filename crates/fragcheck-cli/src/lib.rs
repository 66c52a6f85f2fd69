//! `fragcheck` command-line interface.
//!
//! Parses arguments, wires the McM client, gridpack store and patch runner
//! into the core services, and prints reports.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by the binary only
use anyhow as _;
use dotenvy as _;
use tokio as _;
use tracing_subscriber as _;

#[cfg(test)]
use async_trait as _;
#[cfg(test)]
use tempfile as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod presentation;

pub use bootstrap::{CliConfig, CliContext, bootstrap};
pub use commands::{CheckArgs, Commands, OutputFormat};
pub use error::CliError;
pub use parser::Cli;
