//! Provost CLI - bulk directory account provisioning.
//!
//! Reads a CSV of new hires, cross-references the organizational ledger
//! database, creates one directory account per row with a globally unique
//! sign-in prefix, then writes the generated credentials and the newly
//! consumed prefixes out at the end of the run.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod prompt;
mod run;
mod secrets;

use error::CliResult;

/// Provost - bulk account provisioning for Microsoft Entra ID
#[derive(Parser)]
#[command(name = "provost")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Provision accounts from a bulk input file
    Run(run::RunArgs),
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn dispatch(cli: Cli) -> CliResult<()> {
    match cli.command {
        Commands::Run(args) => run::execute(args).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = dispatch(cli).await {
        eprintln!("error: {err}");
        std::process::exit(err.exit_code());
    }
}
