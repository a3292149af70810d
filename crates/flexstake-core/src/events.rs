// crates/flexstake-core/src/events.rs
//
// Observable ledger events. Field sets let an off-chain indexer rebuild
// balances and stake records without querying the ledger.

use serde::{Deserialize, Serialize};

use crate::amount::{Atoms, BlockHeight};
use crate::identity::AccountId;
use crate::percentage::Percentage;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerEvent {
    /// Balance movement. Mints use the zero address as `from`, burns as `to`.
    Transfer {
        from: AccountId,
        to: AccountId,
        amount: Atoms,
    },
    Minted {
        operator: AccountId,
        to: AccountId,
        amount: Atoms,
    },
    Burned {
        from: AccountId,
        amount: Atoms,
    },
    /// A staked account was credited; `amount` is the new staked amount.
    StakeGrown {
        account: AccountId,
        amount: Atoms,
        delegate_to: Option<AccountId>,
        percentage: Percentage,
    },
    /// A staked account was debited; `amount` is the new staked amount.
    StakeReduced {
        account: AccountId,
        amount: Atoms,
        delegate_to: Option<AccountId>,
        percentage: Percentage,
    },
    Staked {
        account: AccountId,
        amount: Atoms,
        delegate_to: Option<AccountId>,
        percentage: Percentage,
        block: BlockHeight,
    },
    Unstaked {
        account: AccountId,
        amount: Atoms,
        reward: Atoms,
        delegate_to: Option<AccountId>,
        reward_delegated: Atoms,
        block: BlockHeight,
    },
    /// The unstake reward was truncated to the remaining supply headroom.
    RewardCapped {
        account: AccountId,
        requested: Atoms,
        minted: Atoms,
    },
    FlexibleStakingInitialized {
        difficulty: Atoms,
        halving_blocks: BlockHeight,
    },
    DifficultyChanged {
        difficulty: Atoms,
        halving_blocks: BlockHeight,
    },
    CreationBlockSet {
        block: BlockHeight,
    },
    AddressFrozen {
        account: AccountId,
    },
    AddressUnfrozen {
        account: AccountId,
    },
    FrozenAddressWiped {
        account: AccountId,
        amount: Atoms,
        stake_forfeited: bool,
    },
    AssetProtectionRoleSet {
        old: Option<AccountId>,
        new: AccountId,
    },
    OperatorAuthorized {
        operator: AccountId,
    },
    OperatorRevoked {
        operator: AccountId,
    },
    Paused,
    Unpaused,
}

impl LedgerEvent {
    /// Short event name, as used in log lines and tables.
    pub fn name(&self) -> &'static str {
        match self {
            LedgerEvent::Transfer { .. } => "Transfer",
            LedgerEvent::Minted { .. } => "Minted",
            LedgerEvent::Burned { .. } => "Burned",
            LedgerEvent::StakeGrown { .. } => "StakeGrown",
            LedgerEvent::StakeReduced { .. } => "StakeReduced",
            LedgerEvent::Staked { .. } => "Staked",
            LedgerEvent::Unstaked { .. } => "Unstaked",
            LedgerEvent::RewardCapped { .. } => "RewardCapped",
            LedgerEvent::FlexibleStakingInitialized { .. } => "FlexibleStakingInitialized",
            LedgerEvent::DifficultyChanged { .. } => "DifficultyChanged",
            LedgerEvent::CreationBlockSet { .. } => "CreationBlockSet",
            LedgerEvent::AddressFrozen { .. } => "AddressFrozen",
            LedgerEvent::AddressUnfrozen { .. } => "AddressUnfrozen",
            LedgerEvent::FrozenAddressWiped { .. } => "FrozenAddressWiped",
            LedgerEvent::AssetProtectionRoleSet { .. } => "AssetProtectionRoleSet",
            LedgerEvent::OperatorAuthorized { .. } => "OperatorAuthorized",
            LedgerEvent::OperatorRevoked { .. } => "OperatorRevoked",
            LedgerEvent::Paused => "Paused",
            LedgerEvent::Unpaused => "Unpaused",
        }
    }
}
