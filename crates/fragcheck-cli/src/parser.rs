//! Root CLI structure with global options.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Commands;

/// Checks McM requests: fragment, gridpack and resource settings.
#[derive(Debug, Parser)]
#[command(name = "fragcheck")]
#[command(about = "Check McM request fragments and gridpacks before validation")]
#[command(version)]
pub struct Cli {
    /// Run on the DEV instance of McM
    #[arg(long, global = true, env = "FRAGCHECK_DEV")]
    pub dev: bool,

    /// Print debugging information
    #[arg(long, global = true)]
    pub debug: bool,

    /// Override the McM base URL
    #[arg(long = "mcm-url", global = true, env = "FRAGCHECK_MCM_URL")]
    pub mcm_url: Option<String>,

    /// Directory gridpacks are unpacked into (default: <tmp>/<user>/gridpacks)
    #[arg(long = "work-dir", global = true)]
    pub work_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}
