// crates/flexstake-ledger/src/lib.rs
//
// flexstake-ledger: FLX balances, capped supply, flexible staking with
// reward delegation, halving-based rewards, governance roles, and the
// transactional `Ledger` facade that ties them together.
//
// All monetary values are tracked in atoms (the smallest unit of FLX).
// 1 FLX = 1,000,000,000,000,000,000 atoms (10^18).

pub mod balances;
pub mod difficulty;
pub mod genesis;
pub mod ledger;
pub mod oracle;
pub mod rewards;
pub mod roles;
pub mod sink;
pub mod staking;
pub mod supply;
pub mod token;
pub mod transaction;

// Re-export key types for ergonomic access from downstream crates.
pub use balances::{Account, BalanceHook, BalanceStore, NoHook};
pub use difficulty::{DifficultyController, DifficultyParameters};
pub use genesis::{ConfigError, GenesisConfig, StakingConfig};
pub use ledger::{Ledger, LedgerOptions, LedgerState};
pub use oracle::ManualBlockOracle;
pub use rewards::{accrued_reward, calculate_reward, halving_epoch, split_reward, RewardQuote};
pub use roles::Roles;
pub use sink::{EventLog, TracingSink};
pub use staking::{StakeRecord, StakeRegistry};
pub use supply::SupplyLedger;
pub use token::{Flx, DEFAULT_MAX_SUPPLY_ATOMS};
pub use transaction::{Outcome, Transaction};
