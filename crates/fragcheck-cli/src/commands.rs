//! Subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};
use fragcheck_core::settings::DEFAULT_PATCH_SCRIPT;
use fragcheck_gridpack::DEFAULT_PYTHON;

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check requests given by prepid or ticket
    Check(CheckArgs),

    /// List the root requests of a ticket
    Requests {
        /// Ticket (MccM) prepid
        #[arg(long)]
        ticket: String,
    },
}

#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    /// Request prepids to check
    #[arg(long, num_args = 1.., required_unless_present = "ticket")]
    pub prepid: Vec<String>,

    /// Check the root requests of a ticket
    #[arg(long)]
    pub ticket: Option<String>,

    /// Check requests irrespective of their status
    #[arg(long)]
    pub bypass_status: bool,

    /// Proceed to the next request even if there are errors
    #[arg(long)]
    pub bypass_validation: bool,

    /// Apply the MG5_aMC LO many-threads patch where it is missing
    #[arg(long)]
    pub apply_many_threads_patch: bool,

    /// Patch script run by --apply-many-threads-patch
    #[arg(long, env = "FRAGCHECK_PATCH_SCRIPT", default_value = DEFAULT_PATCH_SCRIPT)]
    pub patch_script: PathBuf,

    /// Interpreter for the patch script
    #[arg(long, env = "FRAGCHECK_PYTHON", default_value = DEFAULT_PYTHON)]
    pub python: String,

    /// Keep unpacked gridpacks after checking
    #[arg(long)]
    pub keep_workspace: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
