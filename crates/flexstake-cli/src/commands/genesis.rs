// crates/flexstake-cli/src/commands/genesis.rs
//
// `flexstake genesis`: validate the effective genesis configuration by
// building the ledger from it, print a summary, and optionally write it out
// as TOML.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;
use tabled::Tabled;
use tracing::info;

use flexstake_core::AccountId;
use flexstake_ledger::{EventLog, Flx, GenesisConfig};

use crate::commands::{default_genesis_path, Context};
use crate::error::CliError;
use crate::output::{format_flx, format_json, format_table, OutputFormat};

/// Arguments for `flexstake genesis`.
#[derive(Debug, Args)]
pub struct GenesisCmd {
    /// Write the effective genesis TOML to this path.
    #[arg(long, conflicts_with = "init")]
    pub write: Option<PathBuf>,

    /// Write the effective genesis TOML to ~/.flexstake/genesis.toml.
    #[arg(long)]
    pub init: bool,

    /// Overwrite an existing file.
    #[arg(long)]
    pub force: bool,
}

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Debug, Serialize)]
struct GenesisSummary {
    name: String,
    symbol: String,
    decimals: u32,
    treasury: AccountId,
    total_supply: Flx,
    max_supply: Flx,
    creation_block: u64,
    staking: Option<(u128, u64)>,
    asset_protection: Option<AccountId>,
    operators: Vec<AccountId>,
}

/// Build the ledger described by `genesis` and summarize it.
fn summarize(genesis: &GenesisConfig) -> Result<GenesisSummary, CliError> {
    let ledger = genesis.build(EventLog::new())?;
    Ok(GenesisSummary {
        name: ledger.name().to_string(),
        symbol: ledger.symbol().to_string(),
        decimals: ledger.decimals(),
        treasury: ledger.treasury(),
        total_supply: Flx::from_atoms(ledger.total_supply()),
        max_supply: Flx::from_atoms(ledger.max_supply()),
        creation_block: ledger.last_block(),
        staking: ledger.get_flexible_stake_difficulty(),
        asset_protection: ledger.roles().asset_protection(),
        operators: ledger.roles().operators().copied().collect(),
    })
}

fn write_genesis(genesis: &GenesisConfig, path: &Path, force: bool) -> Result<(), CliError> {
    if path.exists() && !force {
        return Err(CliError::Usage(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, genesis.to_toml()?)?;
    info!("Genesis written to {}", path.display());
    Ok(())
}

/// Run the genesis subcommand.
pub fn run(ctx: &Context, cmd: &GenesisCmd) -> Result<(), CliError> {
    let summary = summarize(&ctx.genesis)?;

    let target = if cmd.init {
        Some(default_genesis_path().ok_or_else(|| {
            CliError::Usage("Could not determine home directory".to_string())
        })?)
    } else {
        cmd.write.clone()
    };
    if let Some(path) = &target {
        write_genesis(&ctx.genesis, path, cmd.force)?;
    }

    match ctx.format {
        OutputFormat::Json => println!("{}", format_json(&summary)),
        OutputFormat::Table => {
            let rows = vec![
                FieldRow {
                    field: "Name",
                    value: format!("{} ({})", summary.name, summary.symbol),
                },
                FieldRow {
                    field: "Decimals",
                    value: summary.decimals.to_string(),
                },
                FieldRow {
                    field: "Treasury",
                    value: summary.treasury.to_hex(),
                },
                FieldRow {
                    field: "Total supply",
                    value: format_flx(summary.total_supply.atoms),
                },
                FieldRow {
                    field: "Max supply",
                    value: format_flx(summary.max_supply.atoms),
                },
                FieldRow {
                    field: "Creation block",
                    value: summary.creation_block.to_string(),
                },
                FieldRow {
                    field: "Staking",
                    value: match summary.staking {
                        Some((difficulty, halving)) => {
                            format!("difficulty {}, halving every {} blocks", difficulty, halving)
                        }
                        None => "not initialized".to_string(),
                    },
                },
                FieldRow {
                    field: "Asset protection",
                    value: summary
                        .asset_protection
                        .map(|a| a.short())
                        .unwrap_or_else(|| "treasury only".to_string()),
                },
                FieldRow {
                    field: "Operators",
                    value: summary.operators.len().to_string(),
                },
            ];
            println!("{}", format_table(&rows));
            if let Some(path) = &target {
                println!();
                println!("Written to {}", path.display());
            }
        }
    }

    Ok(())
}
