// crates/flexstake-core/src/lib.rs
//
// flexstake-core: Core types and trait interfaces for the FlexStake ledger.
//
// This is the leaf crate that all other crates in the workspace depend on.
// It defines account identity, amount units, the ledger error type, the
// observable event set, and the seams (authority, event sink, block oracle)
// the ledger is driven through.

pub mod amount;
pub mod crypto;
pub mod error;
pub mod events;
pub mod identity;
pub mod percentage;
pub mod traits;

// Re-export key types for ergonomic access from downstream crates.
// Usage: `use flexstake_core::AccountId;`
pub use amount::{Atoms, BlockHeight, ATOMS_PER_FLX, DECIMALS};
pub use error::LedgerError;
pub use events::LedgerEvent;
pub use identity::AccountId;
pub use percentage::Percentage;
pub use traits::{Authority, BlockOracle, Capability, EventSink};
