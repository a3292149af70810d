// crates/flexstake-cli/src/main.rs
//
// CLI entrypoint for the FlexStake ledger tools.
//
// Provides subcommands for inspecting and writing a genesis file, replaying
// transaction scripts against a fresh ledger, and quoting flexible stake
// rewards.

mod commands;
mod error;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use commands::genesis::GenesisCmd;
use commands::quote::QuoteCmd;
use commands::replay::ReplayCmd;
use commands::Context;
use error::CliError;
use output::OutputFormat;

/// FlexStake CLI: FLX ledger replay and staking reward tools.
#[derive(Parser, Debug)]
#[command(
    name = "flexstake",
    version = "0.1.0",
    about = "FlexStake CLI: FLX token ledger with flexible staking and delegated rewards"
)]
struct Cli {
    /// Genesis TOML file. Defaults to ~/.flexstake/genesis.toml when present.
    #[arg(long, global = true)]
    genesis: Option<PathBuf>,

    /// Emit JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    /// Log level filter. `RUST_LOG` takes precedence, then this flag, then
    /// the genesis file's `log_level`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Replay a JSON transaction script against the genesis ledger.
    Replay(ReplayCmd),

    /// Quote the reward a flexible stake accrues over a block span.
    Quote(QuoteCmd),

    /// Show the effective genesis configuration, or write it to disk.
    Genesis(GenesisCmd),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let (genesis, source) = commands::load_genesis(cli.genesis.as_deref())?;

    // Initialize tracing subscriber for structured logging. Logs go to
    // stderr so `--json` output stays machine readable.
    let fallback = cli.log_level.clone().unwrap_or_else(|| genesis.log_level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .init();

    match &source {
        Some(path) => info!("Loaded genesis from {}", path.display()),
        None => info!("No genesis file found, using defaults"),
    }

    let ctx = Context {
        genesis,
        format: OutputFormat::from_flag(cli.json),
    };

    match &cli.command {
        Commands::Replay(cmd) => commands::replay::run(&ctx, cmd)?,
        Commands::Quote(cmd) => commands::quote::run(&ctx, cmd)?,
        Commands::Genesis(cmd) => commands::genesis::run(&ctx, cmd)?,
    }

    Ok(())
}
