// crates/flexstake-ledger/src/transaction.rs
//
// Serializable transactions and the `Ledger::apply` state-machine entry
// point. One transaction is one all-or-nothing ledger operation, executed on
// behalf of `caller` at a given block height.
//
// JSON shape (externally tagged, snake_case):
//   {"transfer": {"to": "bob", "amount": "1.5"}}
//   {"stake": {"delegate_to": "carol", "percentage": 30}}
//   "unstake"

use serde::{Deserialize, Serialize};

use flexstake_core::{AccountId, Atoms, BlockHeight, BlockOracle, EventSink, LedgerError, Percentage};

use crate::ledger::Ledger;
use crate::rewards::RewardQuote;
use crate::token::Flx;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transaction {
    Transfer {
        to: AccountId,
        amount: Flx,
    },
    Burn {
        amount: Flx,
    },
    TreasuryMint {
        amount: Flx,
    },
    MintTo {
        to: AccountId,
        amount: Flx,
    },
    Stake {
        #[serde(default)]
        delegate_to: Option<AccountId>,
        /// Signed so that negative inputs reach validation and fail with
        /// `InvalidPercentage` instead of a parse error.
        #[serde(default)]
        percentage: i64,
    },
    Unstake,
    InitializeFlexibleStaking {
        difficulty: Atoms,
        halving_blocks: BlockHeight,
    },
    SetFlexibleStakeDifficulty {
        difficulty: Atoms,
        #[serde(default)]
        halving_blocks: Option<BlockHeight>,
    },
    SetCreationBlock {
        block: BlockHeight,
    },
    Freeze {
        account: AccountId,
    },
    Unfreeze {
        account: AccountId,
    },
    WipeFrozenAddress {
        account: AccountId,
    },
    SetAssetProtectionRole {
        account: AccountId,
    },
    AuthorizeOperator {
        operator: AccountId,
    },
    RevokeOperator {
        operator: AccountId,
    },
    Pause,
    Unpause,
}

impl Transaction {
    /// Short name for logs and receipts.
    pub fn kind(&self) -> &'static str {
        match self {
            Transaction::Transfer { .. } => "transfer",
            Transaction::Burn { .. } => "burn",
            Transaction::TreasuryMint { .. } => "treasury_mint",
            Transaction::MintTo { .. } => "mint_to",
            Transaction::Stake { .. } => "stake",
            Transaction::Unstake => "unstake",
            Transaction::InitializeFlexibleStaking { .. } => "initialize_flexible_staking",
            Transaction::SetFlexibleStakeDifficulty { .. } => "set_flexible_stake_difficulty",
            Transaction::SetCreationBlock { .. } => "set_creation_block",
            Transaction::Freeze { .. } => "freeze",
            Transaction::Unfreeze { .. } => "unfreeze",
            Transaction::WipeFrozenAddress { .. } => "wipe_frozen_address",
            Transaction::SetAssetProtectionRole { .. } => "set_asset_protection_role",
            Transaction::AuthorizeOperator { .. } => "authorize_operator",
            Transaction::RevokeOperator { .. } => "revoke_operator",
            Transaction::Pause => "pause",
            Transaction::Unpause => "unpause",
        }
    }
}

/// What a successful transaction produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Done,
    Reward(RewardQuote),
    Wiped(Atoms),
}

impl<S: EventSink> Ledger<S> {
    /// Execute `tx` on behalf of `caller` at `block`.
    pub fn apply(
        &mut self,
        caller: &AccountId,
        tx: &Transaction,
        block: BlockHeight,
    ) -> Result<Outcome, LedgerError> {
        match tx {
            Transaction::Transfer { to, amount } => {
                self.transfer(caller, to, amount.atoms, block)?
            }
            Transaction::Burn { amount } => self.burn(caller, amount.atoms, block)?,
            Transaction::TreasuryMint { amount } => self.treasury_mint(caller, amount.atoms, block)?,
            Transaction::MintTo { to, amount } => self.mint_to(caller, to, amount.atoms, block)?,
            Transaction::Stake {
                delegate_to,
                percentage,
            } => {
                let percentage = Percentage::try_from(*percentage)?;
                self.stake(caller, *delegate_to, percentage.value(), block)?
            }
            Transaction::Unstake => return self.unstake(caller, block).map(Outcome::Reward),
            Transaction::InitializeFlexibleStaking {
                difficulty,
                halving_blocks,
            } => self.initialize_flexible_staking(caller, *difficulty, *halving_blocks, block)?,
            Transaction::SetFlexibleStakeDifficulty {
                difficulty,
                halving_blocks,
            } => self.set_flexible_stake_difficulty(caller, *difficulty, *halving_blocks, block)?,
            Transaction::SetCreationBlock { block: creation } => {
                self.set_creation_block(caller, *creation, block)?
            }
            Transaction::Freeze { account } => self.freeze(caller, account, block)?,
            Transaction::Unfreeze { account } => self.unfreeze(caller, account, block)?,
            Transaction::WipeFrozenAddress { account } => {
                return self
                    .wipe_frozen_address(caller, account, block)
                    .map(Outcome::Wiped)
            }
            Transaction::SetAssetProtectionRole { account } => {
                self.set_asset_protection_role(caller, account, block)?
            }
            Transaction::AuthorizeOperator { operator } => {
                self.authorize_operator(caller, operator, block)?
            }
            Transaction::RevokeOperator { operator } => self.revoke_operator(caller, operator, block)?,
            Transaction::Pause => self.pause(caller, block)?,
            Transaction::Unpause => self.unpause(caller, block)?,
        }
        Ok(Outcome::Done)
    }

    /// Execute `tx` at the oracle's current block.
    pub fn apply_at(
        &mut self,
        oracle: &dyn BlockOracle,
        caller: &AccountId,
        tx: &Transaction,
    ) -> Result<Outcome, LedgerError> {
        self.apply(caller, tx, oracle.current_block())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::LedgerOptions;
    use crate::oracle::ManualBlockOracle;
    use crate::sink::EventLog;
    use flexstake_core::ATOMS_PER_FLX;

    fn treasury() -> AccountId {
        AccountId::from_label("treasury")
    }

    fn ledger() -> Ledger {
        let mut options = LedgerOptions::new(treasury());
        options.initial_supply = 1_000 * ATOMS_PER_FLX;
        Ledger::new(options, EventLog::new()).unwrap()
    }

    #[test]
    fn test_parse_json_transactions() {
        let tx: Transaction =
            serde_json::from_str(r#"{"transfer": {"to": "bob", "amount": "1.5"}}"#).unwrap();
        assert_eq!(
            tx,
            Transaction::Transfer {
                to: AccountId::from_label("bob"),
                amount: Flx::from_atoms(ATOMS_PER_FLX + ATOMS_PER_FLX / 2),
            }
        );

        let tx: Transaction = serde_json::from_str(r#""unstake""#).unwrap();
        assert_eq!(tx, Transaction::Unstake);

        let tx: Transaction =
            serde_json::from_str(r#"{"set_flexible_stake_difficulty": {"difficulty": 480}}"#)
                .unwrap();
        assert_eq!(
            tx,
            Transaction::SetFlexibleStakeDifficulty {
                difficulty: 480,
                halving_blocks: None
            }
        );
    }

    #[test]
    fn test_negative_percentage_rejected() {
        let mut ledger = ledger();
        ledger
            .apply(
                &treasury(),
                &Transaction::InitializeFlexibleStaking {
                    difficulty: 240,
                    halving_blocks: 365,
                },
                0,
            )
            .unwrap();
        let tx = Transaction::Stake {
            delegate_to: None,
            percentage: -1,
        };
        assert_eq!(
            ledger.apply(&treasury(), &tx, 1),
            Err(LedgerError::InvalidPercentage(-1))
        );
        assert!(ledger.stake_balance(&treasury()).is_none());
    }

    #[test]
    fn test_apply_unstake_returns_reward() {
        let mut ledger = ledger();
        let mut oracle = ManualBlockOracle::new(0);
        let init = Transaction::InitializeFlexibleStaking {
            difficulty: 240,
            halving_blocks: 365,
        };
        let stake = Transaction::Stake {
            delegate_to: None,
            percentage: 0,
        };
        ledger.apply_at(&oracle, &treasury(), &init).unwrap();
        ledger.apply_at(&oracle, &treasury(), &stake).unwrap();
        oracle.advance(1);

        let outcome = ledger
            .apply_at(&oracle, &treasury(), &Transaction::Unstake)
            .unwrap();
        assert_eq!(
            outcome,
            Outcome::Reward(RewardQuote {
                reward: 1_000 * ATOMS_PER_FLX / 240,
                delegate: None,
                reward_delegated: 0,
            })
        );
    }
}
