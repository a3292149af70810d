// crates/flexstake-ledger/src/genesis.rs
//
// Genesis configuration for a FlexStake ledger.
// Loaded from a TOML file or populated with defaults.
//
// Amounts are decimal FLX strings ("21_000_000_000", "0.5"): TOML integers
// stop at i64, well below an 18-decimal supply.
//
// Example:
//   name = "FlexStake"
//   symbol = "FLX"
//   treasury = "treasury"
//   initial_supply = "1_000_000_000"
//   max_supply = "21_000_000_000"
//   creation_block = 0
//   operators = ["treasury-operator"]
//
//   [staking]
//   difficulty = 240
//   halving_blocks = 365

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use flexstake_core::{AccountId, BlockHeight, EventSink, LedgerError};

use crate::ledger::{Ledger, LedgerOptions};
use crate::token::{Flx, DEFAULT_MAX_SUPPLY_ATOMS};

/// Errors loading or applying a genesis file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read genesis file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid genesis TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to encode genesis TOML: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("Genesis rejected by the ledger: {0}")]
    Ledger(#[from] LedgerError),
}

/// Staking parameters applied at genesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingConfig {
    /// Base difficulty (blocks of stake per unit of reward in epoch 0).
    #[serde(default = "default_difficulty")]
    pub difficulty: u64,

    /// Blocks per halving epoch.
    #[serde(default = "default_halving_blocks")]
    pub halving_blocks: BlockHeight,
}

/// Genesis configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisConfig {
    /// Token name.
    #[serde(default = "default_name")]
    pub name: String,

    /// Token symbol.
    #[serde(default = "default_symbol")]
    pub symbol: String,

    /// Treasury account (label or 0x-hex).
    #[serde(default = "default_treasury")]
    pub treasury: AccountId,

    /// Supply minted to the treasury at genesis.
    #[serde(default = "Flx::zero")]
    pub initial_supply: Flx,

    /// Hard cap on total supply.
    #[serde(default = "default_max_supply")]
    pub max_supply: Flx,

    /// Halving epoch zero and first accepted block.
    #[serde(default)]
    pub creation_block: BlockHeight,

    /// Asset-protection role holder. Only the treasury when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_protection: Option<AccountId>,

    /// Treasury operators allowed to mint.
    #[serde(default)]
    pub operators: Vec<AccountId>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Staking is initialized at genesis when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staking: Option<StakingConfig>,
}

fn default_name() -> String {
    "FlexStake".to_string()
}

fn default_symbol() -> String {
    "FLX".to_string()
}

fn default_treasury() -> AccountId {
    AccountId::from_label("treasury")
}

fn default_max_supply() -> Flx {
    Flx::from_atoms(DEFAULT_MAX_SUPPLY_ATOMS)
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_difficulty() -> u64 {
    240
}

fn default_halving_blocks() -> BlockHeight {
    365
}

impl Default for StakingConfig {
    fn default() -> Self {
        Self {
            difficulty: default_difficulty(),
            halving_blocks: default_halving_blocks(),
        }
    }
}

impl Default for GenesisConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            symbol: default_symbol(),
            treasury: default_treasury(),
            initial_supply: Flx::zero(),
            max_supply: default_max_supply(),
            creation_block: 0,
            asset_protection: None,
            operators: Vec::new(),
            log_level: default_log_level(),
            staking: None,
        }
    }
}

impl GenesisConfig {
    /// Load configuration from a TOML file at the given path.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Create the genesis ledger: mint the initial supply, assign roles and
    /// initialize staking, all at `creation_block`.
    pub fn build<S: EventSink>(&self, sink: S) -> Result<Ledger<S>, ConfigError> {
        let treasury = self.treasury;
        let block = self.creation_block;
        let options = LedgerOptions {
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            treasury,
            initial_supply: self.initial_supply.atoms,
            max_supply: self.max_supply.atoms,
            creation_block: block,
        };
        let mut ledger = Ledger::new(options, sink)?;

        if let Some(protector) = &self.asset_protection {
            ledger.set_asset_protection_role(&treasury, protector, block)?;
        }
        for operator in &self.operators {
            ledger.authorize_operator(&treasury, operator, block)?;
        }
        if let Some(staking) = &self.staking {
            ledger.initialize_flexible_staking(
                &treasury,
                staking.difficulty as u128,
                staking.halving_blocks,
                block,
            )?;
        }

        info!(
            "Genesis applied at block {}: {} operators, staking {}",
            block,
            self.operators.len(),
            if self.staking.is_some() { "on" } else { "off" }
        );
        Ok(ledger)
    }
}
