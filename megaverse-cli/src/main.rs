//! Megaverse: reconcile a remote megaverse map with its goal.
//!
//! # Usage
//!
//! ```text
//! megaverse apply [--dry-run]
//! megaverse plan [--json]
//! megaverse show [--goal]
//! ```
//!
//! The candidate id is read from `CANDIDATE_ID` unless `--candidate-id` is
//! given. Exit codes: 0 success, 1 configuration or usage, 2 fetch, 3 diff, 4 submit.

mod commands;

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{apply::ApplyArgs, plan::PlanArgs, show::ShowArgs, GlobalArgs};
use megaverse_sync::{FetchError, SyncError};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "megaverse",
    version,
    about = "Reconcile a remote megaverse map with its goal map",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch both maps, compute the delta and submit it.
    Apply(ApplyArgs),

    /// Show the operations `apply` would submit.
    Plan(PlanArgs),

    /// Render the current (or goal) map.
    Show(ShowArgs),
}

// ---------------------------------------------------------------------------
// Exit codes
// ---------------------------------------------------------------------------

const EXIT_CONFIG: u8 = 1;
const EXIT_FETCH: u8 = 2;
const EXIT_DIFF: u8 = 3;
const EXIT_SUBMIT: u8 = 4;

fn exit_code(err: &anyhow::Error) -> u8 {
    if let Some(sync) = err.downcast_ref::<SyncError>() {
        return match sync {
            SyncError::Fetch(_) => EXIT_FETCH,
            SyncError::Diff(_) => EXIT_DIFF,
            SyncError::Submit(_) => EXIT_SUBMIT,
        };
    }
    if err.downcast_ref::<FetchError>().is_some() {
        return EXIT_FETCH;
    }
    // ConfigError and anything unclassified.
    EXIT_CONFIG
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.global.config()?;
    match cli.command {
        Commands::Apply(args) => args.run(&config),
        Commands::Plan(args) => args.run(&config),
        Commands::Show(args) => args.run(&config),
    }
}

fn main() -> ExitCode {
    // clap exits with 2 on usage errors, which would read as a fetch failure.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(EXIT_CONFIG)
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    init_tracing();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}
