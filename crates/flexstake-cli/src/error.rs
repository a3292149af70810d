// crates/flexstake-cli/src/error.rs

use thiserror::Error;

use flexstake_core::LedgerError;
use flexstake_ledger::ConfigError;

/// Everything a CLI command can fail with.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Script step {step} failed: {source}")]
    Step {
        step: usize,
        #[source]
        source: LedgerError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Usage(String),
}
