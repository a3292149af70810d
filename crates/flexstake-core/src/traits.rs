// crates/flexstake-core/src/traits.rs

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::amount::BlockHeight;
use crate::events::LedgerEvent;
use crate::identity::AccountId;

/// Governance capabilities checked before privileged calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// Mint new supply (treasury and its operators).
    Mint,
    /// Freeze and unfreeze accounts.
    Freeze,
    /// Wipe a frozen account's balance.
    Wipe,
    /// Initialize and change staking difficulty / halving parameters.
    Difficulty,
    /// Pause and unpause user operations.
    Pause,
    /// Assign roles and operators.
    ManageRoles,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Mint => write!(f, "Mint"),
            Capability::Freeze => write!(f, "Freeze"),
            Capability::Wipe => write!(f, "Wipe"),
            Capability::Difficulty => write!(f, "Difficulty"),
            Capability::Pause => write!(f, "Pause"),
            Capability::ManageRoles => write!(f, "ManageRoles"),
        }
    }
}

/// Access-control check answering "is `caller` authorized for `capability`".
///
/// Implemented by the ledger's role registry.
pub trait Authority {
    fn is_authorized(&self, caller: &AccountId, capability: Capability) -> bool;
}

/// Receiver of committed ledger events (indexers, logs, tests).
///
/// Events are delivered only after the operation that produced them has
/// committed, in emission order.
pub trait EventSink {
    fn emit(&mut self, event: LedgerEvent);
}

/// Source of the current block height.
pub trait BlockOracle {
    fn current_block(&self) -> BlockHeight;
}
