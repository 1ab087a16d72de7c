//! The `run` command: one full provisioning batch.

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use provost_graph::{GraphClient, GraphConfig, GraphCredentials};
use provost_ledger::LedgerStore;
use provost_provision::{prefix, record, run_batch, MapperContext};

use crate::config::Settings;
use crate::error::CliResult;
use crate::prompt::ConsolePrompt;

/// Arguments for the run command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Bulk input file (CSV with a header row)
    #[arg(long, value_name = "FILE")]
    pub users: PathBuf,

    /// Credential output file; overwritten on each run
    #[arg(long, value_name = "FILE")]
    pub output: PathBuf,

    /// Accept all duplicate-account prompts without asking
    #[arg(long)]
    pub yes: bool,
}

/// Executes one provisioning batch end to end.
pub async fn execute(args: RunArgs) -> CliResult<()> {
    let settings = Settings::from_env()?;

    let client_secret = settings.secret_provider.client_secret().await?;
    let config = GraphConfig::builder()
        .tenant_id(&settings.tenant_id)
        .build()?;
    let credentials = GraphCredentials {
        client_id: settings.client_id.clone(),
        client_secret,
    };
    let graph = GraphClient::new(config, credentials)?;

    let ledger = LedgerStore::connect(settings.db_mode, &settings.db_url).await?;
    let refs = ledger.load_reference_tables().await?;

    let ledger_prefixes = ledger.load_reserved_prefixes().await?;
    let live_prefixes = graph.list_account_prefixes().await?;
    info!(
        ledger = ledger_prefixes.len(),
        live = live_prefixes.len(),
        "prefixes loaded"
    );

    // The delta baseline is what the ledger held before this run, so
    // directory-observed prefixes the ledger has never seen get recorded
    // alongside the freshly generated ones.
    let ledger_at_start = prefix::normalized(&ledger_prefixes);
    let mut reserved = prefix::reconcile(&ledger_prefixes, &live_prefixes);

    let records = record::read_records(&args.users)?;
    info!(rows = records.len(), "input file loaded");

    let ctx = MapperContext {
        refs: &refs,
        upn_domain: &settings.upn_domain,
        usage_location: &settings.usage_location,
    };
    let prompt = ConsolePrompt {
        assume_yes: args.yes,
    };

    let outcome = run_batch(&records, &ctx, &mut reserved, &graph, &prompt).await?;

    outcome.credentials.write_csv(&args.output)?;

    let delta = prefix::compute_delta(&ledger_at_start, &reserved);
    if !delta.is_empty() {
        ledger.append_prefixes(&delta).await?;
    }

    info!(
        created = outcome.created,
        skipped = outcome.skipped,
        new_prefixes = delta.len(),
        "run complete"
    );
    println!(
        "Created {} account(s), skipped {}; credentials written to {}",
        outcome.created,
        outcome.skipped,
        args.output.display()
    );

    Ok(())
}
