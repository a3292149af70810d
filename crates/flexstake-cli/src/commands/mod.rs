// crates/flexstake-cli/src/commands/mod.rs
//
// Command module declarations for the FlexStake CLI, plus the context every
// command runs with.

pub mod genesis;
pub mod quote;
pub mod replay;

use std::path::{Path, PathBuf};

use flexstake_ledger::GenesisConfig;

use crate::error::CliError;
use crate::output::OutputFormat;

/// Shared inputs for every subcommand.
pub struct Context {
    pub genesis: GenesisConfig,
    pub format: OutputFormat,
}

/// `~/.flexstake/genesis.toml`, if a home directory is known.
pub fn default_genesis_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".flexstake").join("genesis.toml"))
}

/// Load the genesis file given on the command line, else the default file
/// when it exists, else the built-in defaults. Returns the path used.
pub fn load_genesis(explicit: Option<&Path>) -> Result<(GenesisConfig, Option<PathBuf>), CliError> {
    if let Some(path) = explicit {
        return Ok((GenesisConfig::load(path)?, Some(path.to_path_buf())));
    }
    match default_genesis_path() {
        Some(path) if path.exists() => Ok((GenesisConfig::load(&path)?, Some(path))),
        _ => Ok((GenesisConfig::default(), None)),
    }
}
