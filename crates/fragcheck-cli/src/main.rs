//! `fragcheck` entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use fragcheck_cli::{Cli, CliConfig, Commands, bootstrap, handlers};

fn init_logging(debug: bool) {
    // --debug wins over RUST_LOG; report output goes to stdout, logs to stderr
    let env_filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .ok();
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load environment variables before clap reads FRAGCHECK_*
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.debug);

    let config = CliConfig::from_cli(&cli);
    let result = match &cli.command {
        Commands::Check(args) => match bootstrap(config.with_check_args(args)) {
            Ok(ctx) => handlers::check::execute(&ctx, args).await,
            Err(e) => Err(e),
        },
        Commands::Requests { ticket } => match bootstrap(config) {
            Ok(ctx) => handlers::requests::execute(&ctx, ticket).await,
            Err(e) => Err(e),
        },
    };

    match result {
        Ok(code) => Ok(ExitCode::from(code)),
        Err(e) => {
            eprintln!("Error: {e}");
            Ok(ExitCode::from(e.exit_code()))
        }
    }
}
