use thiserror::Error;

use crate::amount::{Atoms, BlockHeight};
use crate::identity::AccountId;
use crate::traits::Capability;

/// Ledger-wide error types.
///
/// Every variant is a local precondition failure: the operation that
/// returned it committed nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Debit larger than the liquid balance.
    #[error("Insufficient balance for {account}: requested {requested} atoms, available {available} atoms")]
    InsufficientBalance {
        account: AccountId,
        requested: Atoms,
        available: Atoms,
    },

    /// Debit or credit touching a frozen account.
    #[error("Account {0} is frozen")]
    AccountFrozen(AccountId),

    /// Credit addressed to the null account.
    #[error("Cannot credit the zero address")]
    ZeroAddressTarget,

    /// A balance or supply counter would leave the `u128` range.
    #[error("Arithmetic overflow: {0}")]
    ArithmeticOverflow(String),

    /// `stake` on an account that already holds a stake record.
    #[error("Account {0} is already staked")]
    AlreadyStaked(AccountId),

    /// `unstake` or a reward query on an account without a stake record.
    #[error("Account {0} has no active stake")]
    NotStaked(AccountId),

    /// Delegate percentage outside `0..=100`.
    #[error("Invalid delegate percentage {0}: must be within 0..=100")]
    InvalidPercentage(i64),

    /// Second call to `initialize_flexible_staking`.
    #[error("Flexible staking is already initialized")]
    AlreadyInitialized,

    /// Staking operation before `initialize_flexible_staking`.
    #[error("Flexible staking has not been initialized")]
    StakingNotInitialized,

    /// Zero difficulty or zero halving interval.
    #[error("Invalid difficulty parameters: {0}")]
    InvalidDifficulty(String),

    /// Mint that would push total supply above max supply.
    #[error("Mint of {requested} atoms exceeds max supply: {available} atoms available")]
    MaxSupplyExceeded { requested: Atoms, available: Atoms },

    /// Governance-gated call from a caller lacking the capability.
    #[error("{caller} is not authorized for {capability}")]
    Unauthorized {
        caller: AccountId,
        capability: Capability,
    },

    /// User operation while the ledger is paused.
    #[error("Ledger is paused")]
    Paused,

    /// Freeze or wipe aimed at the treasury.
    #[error("Account {0} is protected and cannot be frozen or wiped")]
    ProtectedAccount(AccountId),

    /// Wipe of an account that is not frozen.
    #[error("Account {0} is not frozen")]
    NotFrozen(AccountId),

    /// Block height lower than the last one the ledger executed at.
    #[error("Block height regressed: {current} < last executed {last}")]
    BlockHeightRegressed {
        current: BlockHeight,
        last: BlockHeight,
    },

    /// Saved ledger state that breaks a ledger invariant.
    #[error("Invalid ledger state: {0}")]
    InvalidState(String),

    /// Serialization/deserialization or parse error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for LedgerError {
    fn from(e: serde_json::Error) -> Self {
        LedgerError::Serialization(e.to_string())
    }
}
