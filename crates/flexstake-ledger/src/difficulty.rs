// crates/flexstake-ledger/src/difficulty.rs
//
// Difficulty controller: base staking difficulty, halving interval, and the
// block used as halving epoch zero. Governance-only.
//
// Parameters are read live by every reward calculation, so a change applies
// to the whole elapsed span of stakes that are already open.

use serde::{Deserialize, Serialize};
use tracing::info;

use flexstake_core::{
    AccountId, Atoms, Authority, BlockHeight, Capability, LedgerError, LedgerEvent,
};

use crate::roles::require;

/// Parameters every reward calculation reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyParameters {
    /// Blocks of stake needed to earn one unit per staked unit in epoch 0.
    pub base_difficulty: Atoms,
    /// Blocks per halving epoch.
    pub halving_interval_blocks: BlockHeight,
    /// Epoch zero for halving calculations.
    pub created_at_block: BlockHeight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct HalvingSchedule {
    base_difficulty: Atoms,
    halving_interval_blocks: BlockHeight,
}

/// Holds the staking difficulty singleton.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyController {
    schedule: Option<HalvingSchedule>,
    created_at_block: BlockHeight,
}

fn validate(difficulty: Atoms, halving_blocks: BlockHeight) -> Result<(), LedgerError> {
    if difficulty == 0 {
        return Err(LedgerError::InvalidDifficulty(
            "difficulty must be greater than zero".to_string(),
        ));
    }
    if halving_blocks == 0 {
        return Err(LedgerError::InvalidDifficulty(
            "halving interval must be at least one block".to_string(),
        ));
    }
    Ok(())
}

impl DifficultyController {
    /// Create an uninitialized controller anchored at `created_at_block`.
    pub fn new(created_at_block: BlockHeight) -> Self {
        Self {
            schedule: None,
            created_at_block,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.schedule.is_some()
    }

    /// Current parameters, or `None` before initialization.
    pub fn params(&self) -> Option<DifficultyParameters> {
        self.schedule.map(|s| DifficultyParameters {
            base_difficulty: s.base_difficulty,
            halving_interval_blocks: s.halving_interval_blocks,
            created_at_block: self.created_at_block,
        })
    }

    /// `(difficulty, halving_blocks)`, or `None` before initialization.
    pub fn get_flexible_stake_difficulty(&self) -> Option<(Atoms, BlockHeight)> {
        self.schedule
            .map(|s| (s.base_difficulty, s.halving_interval_blocks))
    }

    pub fn created_at_block(&self) -> BlockHeight {
        self.created_at_block
    }

    /// Validate `initialize_flexible_staking` without writing.
    pub fn check_initialize(
        &self,
        authority: &dyn Authority,
        caller: &AccountId,
        difficulty: Atoms,
        halving_blocks: BlockHeight,
    ) -> Result<(), LedgerError> {
        require(authority, caller, Capability::Difficulty)?;
        if self.schedule.is_some() {
            return Err(LedgerError::AlreadyInitialized);
        }
        validate(difficulty, halving_blocks)
    }

    /// One-time setup of the staking difficulty.
    ///
    /// # Errors
    /// `Unauthorized`, `AlreadyInitialized`, `InvalidDifficulty`.
    pub fn initialize_flexible_staking(
        &mut self,
        authority: &dyn Authority,
        caller: &AccountId,
        difficulty: Atoms,
        halving_blocks: BlockHeight,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<(), LedgerError> {
        self.check_initialize(authority, caller, difficulty, halving_blocks)?;
        self.schedule = Some(HalvingSchedule {
            base_difficulty: difficulty,
            halving_interval_blocks: halving_blocks,
        });
        info!(
            "Flexible staking initialized: difficulty {}, halving every {} blocks",
            difficulty, halving_blocks
        );
        events.push(LedgerEvent::FlexibleStakingInitialized {
            difficulty,
            halving_blocks,
        });
        Ok(())
    }

    /// Change the difficulty, and the halving interval when given.
    /// `halving_blocks = None` keeps the previous interval.
    ///
    /// Before initialization a call that names both values initializes
    /// staking, after which `initialize_flexible_staking` reports
    /// `AlreadyInitialized`.
    ///
    /// # Errors
    /// `Unauthorized`, `InvalidDifficulty`, and `StakingNotInitialized` when
    /// `halving_blocks` is omitted before initialization.
    pub fn set_flexible_stake_difficulty(
        &mut self,
        authority: &dyn Authority,
        caller: &AccountId,
        difficulty: Atoms,
        halving_blocks: Option<BlockHeight>,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<(), LedgerError> {
        require(authority, caller, Capability::Difficulty)?;
        let current = match (self.schedule, halving_blocks) {
            (Some(current), _) => current,
            (None, Some(halving_blocks)) => {
                return self.initialize_flexible_staking(
                    authority,
                    caller,
                    difficulty,
                    halving_blocks,
                    events,
                );
            }
            (None, None) => return Err(LedgerError::StakingNotInitialized),
        };
        let halving_blocks = halving_blocks.unwrap_or(current.halving_interval_blocks);
        validate(difficulty, halving_blocks)?;

        self.schedule = Some(HalvingSchedule {
            base_difficulty: difficulty,
            halving_interval_blocks: halving_blocks,
        });
        info!(
            "Staking difficulty changed: {} -> {}, halving {} -> {} blocks",
            current.base_difficulty, difficulty, current.halving_interval_blocks, halving_blocks
        );
        events.push(LedgerEvent::DifficultyChanged {
            difficulty,
            halving_blocks,
        });
        Ok(())
    }

    /// Move the halving epoch zero.
    pub fn set_creation_block(
        &mut self,
        authority: &dyn Authority,
        caller: &AccountId,
        block: BlockHeight,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<(), LedgerError> {
        require(authority, caller, Capability::Difficulty)?;
        self.created_at_block = block;
        info!("Halving epoch zero set to block {}", block);
        events.push(LedgerEvent::CreationBlockSet { block });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AllowOnly(AccountId);

    impl Authority for AllowOnly {
        fn is_authorized(&self, caller: &AccountId, _: Capability) -> bool {
            *caller == self.0
        }
    }

    fn treasury() -> AccountId {
        AccountId::from_label("treasury")
    }

    #[test]
    fn test_initialize_once() {
        let auth = AllowOnly(treasury());
        let mut ctl = DifficultyController::new(7);
        let mut events = Vec::new();
        assert!(ctl.params().is_none());

        ctl.initialize_flexible_staking(&auth, &treasury(), 240, 365, &mut events)
            .unwrap();
        assert_eq!(
            ctl.params(),
            Some(DifficultyParameters {
                base_difficulty: 240,
                halving_interval_blocks: 365,
                created_at_block: 7,
            })
        );

        let err = ctl
            .initialize_flexible_staking(&auth, &treasury(), 240, 365, &mut events)
            .unwrap_err();
        assert_eq!(err, LedgerError::AlreadyInitialized);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_non_governance_rejected() {
        let auth = AllowOnly(treasury());
        let mut ctl = DifficultyController::new(0);
        let mut events = Vec::new();
        let anyone = AccountId::from_label("anyone");
        let err = ctl
            .initialize_flexible_staking(&auth, &anyone, 240, 365, &mut events)
            .unwrap_err();
        assert!(matches!(err, LedgerError::Unauthorized { .. }));
        assert!(!ctl.is_initialized());
    }

    #[test]
    fn test_zero_parameters_rejected() {
        let auth = AllowOnly(treasury());
        let mut ctl = DifficultyController::new(0);
        let mut events = Vec::new();
        assert!(matches!(
            ctl.initialize_flexible_staking(&auth, &treasury(), 0, 365, &mut events),
            Err(LedgerError::InvalidDifficulty(_))
        ));
        assert!(matches!(
            ctl.initialize_flexible_staking(&auth, &treasury(), 240, 0, &mut events),
            Err(LedgerError::InvalidDifficulty(_))
        ));
    }

    #[test]
    fn test_set_difficulty_keeps_halving_when_omitted() {
        let auth = AllowOnly(treasury());
        let mut ctl = DifficultyController::new(0);
        let mut events = Vec::new();
        ctl.initialize_flexible_staking(&auth, &treasury(), 240, 365, &mut events)
            .unwrap();

        ctl.set_flexible_stake_difficulty(&auth, &treasury(), 480, None, &mut events)
            .unwrap();
        assert_eq!(ctl.get_flexible_stake_difficulty(), Some((480, 365)));

        ctl.set_flexible_stake_difficulty(&auth, &treasury(), 100, Some(30), &mut events)
            .unwrap();
        assert_eq!(ctl.get_flexible_stake_difficulty(), Some((100, 30)));
    }

    #[test]
    fn test_set_difficulty_before_initialize() {
        let auth = AllowOnly(treasury());
        let mut ctl = DifficultyController::new(0);
        let mut events = Vec::new();
        assert_eq!(
            ctl.set_flexible_stake_difficulty(&auth, &treasury(), 480, None, &mut events),
            Err(LedgerError::StakingNotInitialized)
        );
        assert!(events.is_empty());

        ctl.set_flexible_stake_difficulty(&auth, &treasury(), 240, Some(365), &mut events)
            .unwrap();
        assert_eq!(ctl.get_flexible_stake_difficulty(), Some((240, 365)));
        assert_eq!(
            events,
            vec![LedgerEvent::FlexibleStakingInitialized {
                difficulty: 240,
                halving_blocks: 365,
            }]
        );
        assert_eq!(
            ctl.initialize_flexible_staking(&auth, &treasury(), 240, 365, &mut events),
            Err(LedgerError::AlreadyInitialized)
        );
    }

    #[test]
    fn test_set_creation_block() {
        let auth = AllowOnly(treasury());
        let mut ctl = DifficultyController::new(0);
        let mut events = Vec::new();
        ctl.set_creation_block(&auth, &treasury(), 1_000, &mut events)
            .unwrap();
        assert_eq!(ctl.created_at_block(), 1_000);
        assert_eq!(events, vec![LedgerEvent::CreationBlockSet { block: 1_000 }]);
    }
}
