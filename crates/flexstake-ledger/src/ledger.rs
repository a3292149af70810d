// crates/flexstake-ledger/src/ledger.rs
//
// The transactional ledger facade.
//
// `Ledger` owns every piece of state (balances, supply, stakes, difficulty,
// roles) and is the only thing callers mutate. Each public operation:
//   1. rejects a block height lower than the last executed one,
//   2. validates every leg before its first write,
//   3. buffers the events it produces,
//   4. on success records the block height and hands the events to the sink.
// A failed operation returns its error and leaves state and sink untouched.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use flexstake_core::{
    AccountId, Atoms, BlockHeight, Capability, EventSink, LedgerError, LedgerEvent, Percentage,
    DECIMALS,
};

use crate::balances::BalanceStore;
use crate::difficulty::DifficultyController;
use crate::rewards::{calculate_reward, split_reward, RewardQuote};
use crate::roles::{require, Roles};
use crate::sink::EventLog;
use crate::staking::StakeRegistry;
use crate::supply::SupplyLedger;
use crate::token::DEFAULT_MAX_SUPPLY_ATOMS;

/// Construction parameters for a fresh ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerOptions {
    pub name: String,
    pub symbol: String,
    pub treasury: AccountId,
    /// Minted to the treasury at construction.
    pub initial_supply: Atoms,
    pub max_supply: Atoms,
    /// Halving epoch zero, and the first accepted block height.
    pub creation_block: BlockHeight,
}

impl LedgerOptions {
    pub fn new(treasury: AccountId) -> Self {
        Self {
            name: "FlexStake".to_string(),
            symbol: "FLX".to_string(),
            treasury,
            initial_supply: 0,
            max_supply: DEFAULT_MAX_SUPPLY_ATOMS,
            creation_block: 0,
        }
    }
}

/// Everything the ledger persists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerState {
    pub name: String,
    pub symbol: String,
    pub balances: BalanceStore,
    pub supply: SupplyLedger,
    pub stakes: StakeRegistry,
    pub difficulty: DifficultyController,
    pub roles: Roles,
    /// Height of the last committed operation.
    pub last_block: BlockHeight,
}

impl LedgerState {
    /// Check the invariants every committed operation preserves: supply
    /// within the cap, balances summing to supply, and every stake matching
    /// its holder's balance.
    pub fn validate(&self) -> Result<(), LedgerError> {
        let total = self.supply.total_supply();
        if total > self.supply.max_supply() {
            return Err(LedgerError::InvalidState(format!(
                "total supply {} exceeds max supply {}",
                total,
                self.supply.max_supply()
            )));
        }
        let sum = self
            .balances
            .iter()
            .try_fold(0 as Atoms, |acc, (_, account)| acc.checked_add(account.liquid_balance))
            .ok_or_else(|| LedgerError::InvalidState("balances overflow".to_string()))?;
        if sum != total {
            return Err(LedgerError::InvalidState(format!(
                "balances sum to {} but total supply is {}",
                sum, total
            )));
        }
        for (holder, record) in self.stakes.iter() {
            let balance = self.balances.balance_of(holder);
            if record.staked_amount != balance {
                return Err(LedgerError::InvalidState(format!(
                    "stake of {} is {} but balance is {}",
                    holder.short(),
                    record.staked_amount,
                    balance
                )));
            }
        }
        Ok(())
    }
}

/// Token ledger with flexible staking.
pub struct Ledger<S: EventSink = EventLog> {
    state: LedgerState,
    sink: S,
}

impl<S: EventSink> Ledger<S> {
    /// Create a ledger and mint `initial_supply` to the treasury.
    ///
    /// # Errors
    /// `ZeroAddressTarget` for a null treasury, `MaxSupplyExceeded` when the
    /// initial supply is above the cap.
    pub fn new(options: LedgerOptions, sink: S) -> Result<Self, LedgerError> {
        let treasury = options.treasury;
        let mut state = LedgerState {
            name: options.name,
            symbol: options.symbol,
            balances: BalanceStore::new(),
            supply: SupplyLedger::new(options.max_supply),
            stakes: StakeRegistry::new(),
            difficulty: DifficultyController::new(options.creation_block),
            roles: Roles::new(treasury),
            last_block: options.creation_block,
        };

        let mut events = Vec::new();
        if treasury.is_zero() {
            return Err(LedgerError::ZeroAddressTarget);
        }
        if options.initial_supply > 0 {
            state.supply.mint(
                &mut state.balances,
                &mut state.stakes,
                &treasury,
                &treasury,
                options.initial_supply,
                &mut events,
            )?;
        }
        info!(
            "Ledger {} ({}) created: treasury {}, supply {} / {} atoms",
            state.name,
            state.symbol,
            treasury.short(),
            state.supply.total_supply(),
            state.supply.max_supply()
        );

        let mut ledger = Self { state, sink };
        for event in events {
            ledger.sink.emit(event);
        }
        Ok(ledger)
    }

    /// Rebuild a ledger from saved state.
    ///
    /// # Errors
    /// `InvalidState` when the state fails [`LedgerState::validate`].
    pub fn from_state(state: LedgerState, sink: S) -> Result<Self, LedgerError> {
        state.validate()?;
        Ok(Self { state, sink })
    }

    /// Run `op` as one all-or-nothing operation at `block`.
    fn execute<T>(
        &mut self,
        block: BlockHeight,
        op: impl FnOnce(&mut LedgerState, &mut Vec<LedgerEvent>) -> Result<T, LedgerError>,
    ) -> Result<T, LedgerError> {
        if block < self.state.last_block {
            return Err(LedgerError::BlockHeightRegressed {
                current: block,
                last: self.state.last_block,
            });
        }
        let mut events = Vec::new();
        let out = op(&mut self.state, &mut events)?;
        self.state.last_block = block;
        for event in events {
            self.sink.emit(event);
        }
        Ok(out)
    }

    // --- Token operations ---

    /// Move `amount` from `from` to `to`.
    pub fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: Atoms,
        block: BlockHeight,
    ) -> Result<(), LedgerError> {
        self.execute(block, |state, events| state.transfer(from, to, amount, events))
    }

    /// Destroy `amount` of the caller's balance.
    pub fn burn(&mut self, from: &AccountId, amount: Atoms, block: BlockHeight) -> Result<(), LedgerError> {
        self.execute(block, |state, events| {
            state.roles.ensure_not_paused()?;
            state
                .supply
                .burn(&mut state.balances, &mut state.stakes, from, amount, events)
        })
    }

    /// Treasury mints `amount` to itself.
    pub fn treasury_mint(
        &mut self,
        caller: &AccountId,
        amount: Atoms,
        block: BlockHeight,
    ) -> Result<(), LedgerError> {
        self.execute(block, |state, events| {
            let treasury = state.roles.treasury();
            if *caller != treasury {
                return Err(LedgerError::Unauthorized {
                    caller: *caller,
                    capability: Capability::Mint,
                });
            }
            state.mint(caller, &treasury, amount, events)
        })
    }

    /// Treasury or an authorized operator mints `amount` to `to`.
    pub fn mint_to(
        &mut self,
        caller: &AccountId,
        to: &AccountId,
        amount: Atoms,
        block: BlockHeight,
    ) -> Result<(), LedgerError> {
        self.execute(block, |state, events| {
            require(&state.roles, caller, Capability::Mint)?;
            state.mint(caller, to, amount, events)
        })
    }

    // --- Flexible staking ---

    /// Stake the holder's entire balance, delegating `percentage` of the
    /// eventual reward to `delegate_to`.
    pub fn stake(
        &mut self,
        holder: &AccountId,
        delegate_to: Option<AccountId>,
        percentage: u8,
        block: BlockHeight,
    ) -> Result<(), LedgerError> {
        self.execute(block, |state, events| {
            state.roles.ensure_not_paused()?;
            if state.balances.is_frozen(holder) {
                return Err(LedgerError::AccountFrozen(*holder));
            }
            if !state.difficulty.is_initialized() {
                return Err(LedgerError::StakingNotInitialized);
            }
            let balance = state.balances.balance_of(holder);
            state
                .stakes
                .stake(holder, balance, delegate_to, percentage, block, events)?;
            Ok(())
        })
    }

    /// Close the holder's stake and mint the reward accrued up to `block`.
    ///
    /// The mint is capped at the remaining supply headroom; the capped total
    /// is split between holder and delegate as usual.
    pub fn unstake(&mut self, holder: &AccountId, block: BlockHeight) -> Result<RewardQuote, LedgerError> {
        self.execute(block, |state, events| state.unstake(holder, block, events))
    }

    /// Reward `holder` would receive by unstaking at `block`.
    pub fn calculate_flexible_stake_reward(
        &self,
        holder: &AccountId,
        block: BlockHeight,
    ) -> Result<RewardQuote, LedgerError> {
        self.state.payable_reward(holder, block).map(|(quote, _)| quote)
    }

    pub fn stake_balance(&self, holder: &AccountId) -> Option<(Atoms, Option<AccountId>, Percentage)> {
        self.state.stakes.stake_balance(holder)
    }

    // --- Difficulty administration ---

    pub fn initialize_flexible_staking(
        &mut self,
        caller: &AccountId,
        difficulty: Atoms,
        halving_blocks: BlockHeight,
        block: BlockHeight,
    ) -> Result<(), LedgerError> {
        self.execute(block, |state, events| {
            state.difficulty.initialize_flexible_staking(
                &state.roles,
                caller,
                difficulty,
                halving_blocks,
                events,
            )
        })
    }

    pub fn set_flexible_stake_difficulty(
        &mut self,
        caller: &AccountId,
        difficulty: Atoms,
        halving_blocks: Option<BlockHeight>,
        block: BlockHeight,
    ) -> Result<(), LedgerError> {
        self.execute(block, |state, events| {
            state.difficulty.set_flexible_stake_difficulty(
                &state.roles,
                caller,
                difficulty,
                halving_blocks,
                events,
            )
        })
    }

    pub fn get_flexible_stake_difficulty(&self) -> Option<(Atoms, BlockHeight)> {
        self.state.difficulty.get_flexible_stake_difficulty()
    }

    pub fn set_creation_block(
        &mut self,
        caller: &AccountId,
        creation_block: BlockHeight,
        block: BlockHeight,
    ) -> Result<(), LedgerError> {
        self.execute(block, |state, events| {
            state
                .difficulty
                .set_creation_block(&state.roles, caller, creation_block, events)
        })
    }

    // --- Asset protection ---

    pub fn freeze(&mut self, caller: &AccountId, account: &AccountId, block: BlockHeight) -> Result<(), LedgerError> {
        self.execute(block, |state, events| {
            require(&state.roles, caller, Capability::Freeze)?;
            state.roles.ensure_unprotected(account)?;
            state.balances.set_frozen(account, true);
            info!("Account {} frozen by {}", account.short(), caller.short());
            events.push(LedgerEvent::AddressFrozen { account: *account });
            Ok(())
        })
    }

    pub fn unfreeze(&mut self, caller: &AccountId, account: &AccountId, block: BlockHeight) -> Result<(), LedgerError> {
        self.execute(block, |state, events| {
            require(&state.roles, caller, Capability::Freeze)?;
            state.balances.set_frozen(account, false);
            info!("Account {} unfrozen by {}", account.short(), caller.short());
            events.push(LedgerEvent::AddressUnfrozen { account: *account });
            Ok(())
        })
    }

    /// Zero a frozen account, remove its balance from circulation and forfeit
    /// any open stake without reward. Returns the amount wiped.
    pub fn wipe_frozen_address(
        &mut self,
        caller: &AccountId,
        account: &AccountId,
        block: BlockHeight,
    ) -> Result<Atoms, LedgerError> {
        self.execute(block, |state, events| state.wipe_frozen_address(caller, account, events))
    }

    // --- Roles ---

    pub fn set_asset_protection_role(
        &mut self,
        caller: &AccountId,
        new: &AccountId,
        block: BlockHeight,
    ) -> Result<(), LedgerError> {
        self.execute(block, |state, events| {
            state.roles.set_asset_protection_role(caller, new, events)
        })
    }

    pub fn authorize_operator(
        &mut self,
        caller: &AccountId,
        operator: &AccountId,
        block: BlockHeight,
    ) -> Result<(), LedgerError> {
        self.execute(block, |state, events| {
            state.roles.authorize_operator(caller, operator, events)
        })
    }

    pub fn revoke_operator(
        &mut self,
        caller: &AccountId,
        operator: &AccountId,
        block: BlockHeight,
    ) -> Result<(), LedgerError> {
        self.execute(block, |state, events| {
            state.roles.revoke_operator(caller, operator, events)
        })
    }

    pub fn pause(&mut self, caller: &AccountId, block: BlockHeight) -> Result<(), LedgerError> {
        self.execute(block, |state, events| state.roles.pause(caller, events))
    }

    pub fn unpause(&mut self, caller: &AccountId, block: BlockHeight) -> Result<(), LedgerError> {
        self.execute(block, |state, events| state.roles.unpause(caller, events))
    }

    // --- Queries ---

    pub fn name(&self) -> &str {
        &self.state.name
    }

    pub fn symbol(&self) -> &str {
        &self.state.symbol
    }

    pub fn decimals(&self) -> u32 {
        DECIMALS
    }

    pub fn balance_of(&self, account: &AccountId) -> Atoms {
        self.state.balances.balance_of(account)
    }

    pub fn is_frozen(&self, account: &AccountId) -> bool {
        self.state.balances.is_frozen(account)
    }

    pub fn total_supply(&self) -> Atoms {
        self.state.supply.total_supply()
    }

    pub fn max_supply(&self) -> Atoms {
        self.state.supply.max_supply()
    }

    pub fn treasury(&self) -> AccountId {
        self.state.roles.treasury()
    }

    pub fn is_paused(&self) -> bool {
        self.state.roles.is_paused()
    }

    pub fn last_block(&self) -> BlockHeight {
        self.state.last_block
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    pub fn roles(&self) -> &Roles {
        &self.state.roles
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_parts(self) -> (LedgerState, S) {
        (self.state, self.sink)
    }
}

impl LedgerState {
    fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: Atoms,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<(), LedgerError> {
        self.roles.ensure_not_paused()?;
        self.balances.check_debit(from, amount)?;
        if from == to {
            if to.is_zero() {
                return Err(LedgerError::ZeroAddressTarget);
            }
        } else {
            self.balances.check_credit(to, amount)?;
        }

        self.balances.debit(from, amount, &mut self.stakes, events)?;
        self.balances.credit(to, amount, &mut self.stakes, events)?;
        events.push(LedgerEvent::Transfer {
            from: *from,
            to: *to,
            amount,
        });
        Ok(())
    }

    fn mint(
        &mut self,
        operator: &AccountId,
        to: &AccountId,
        amount: Atoms,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<(), LedgerError> {
        self.roles.ensure_not_paused()?;
        self.supply
            .mint(&mut self.balances, &mut self.stakes, operator, to, amount, events)
    }

    /// Capped reward for `holder` at `block`, and the uncapped total when the
    /// cap applied.
    fn payable_reward(
        &self,
        holder: &AccountId,
        block: BlockHeight,
    ) -> Result<(RewardQuote, Option<Atoms>), LedgerError> {
        let record = self
            .stakes
            .get(holder)
            .ok_or(LedgerError::NotStaked(*holder))?;
        let params = self
            .difficulty
            .params()
            .ok_or(LedgerError::StakingNotInitialized)?;

        let quote = calculate_reward(record, block, &params);
        let requested = quote.total();
        let available = self.supply.available();
        if requested <= available {
            return Ok((quote, None));
        }
        let capped = split_reward(available, record.delegate_to, record.delegate_percentage);
        Ok((capped, Some(requested)))
    }

    fn unstake(
        &mut self,
        holder: &AccountId,
        block: BlockHeight,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<RewardQuote, LedgerError> {
        self.roles.ensure_not_paused()?;
        let (quote, requested) = self.payable_reward(holder, block)?;

        self.balances.check_credit(holder, quote.reward)?;
        if let Some(delegate) = quote.delegate {
            let incoming = if delegate == *holder {
                quote.total()
            } else {
                quote.reward_delegated
            };
            self.balances.check_credit(&delegate, incoming)?;
        }

        let record = self.stakes.remove(holder)?;
        if let Some(requested) = requested {
            warn!(
                "Unstake reward for {} capped: requested {} atoms, minting {}",
                holder.short(),
                requested,
                quote.total()
            );
            events.push(LedgerEvent::RewardCapped {
                account: *holder,
                requested,
                minted: quote.total(),
            });
        }

        let treasury = self.roles.treasury();
        if quote.reward > 0 {
            self.supply.mint(
                &mut self.balances,
                &mut self.stakes,
                &treasury,
                holder,
                quote.reward,
                events,
            )?;
        }
        if let Some(delegate) = quote.delegate.filter(|_| quote.reward_delegated > 0) {
            self.supply.mint(
                &mut self.balances,
                &mut self.stakes,
                &treasury,
                &delegate,
                quote.reward_delegated,
                events,
            )?;
        }

        info!(
            "Flexible stake closed by {} at block {}: reward {}, delegated {}",
            holder.short(),
            block,
            quote.reward,
            quote.reward_delegated
        );
        events.push(LedgerEvent::Unstaked {
            account: *holder,
            amount: record.staked_amount,
            reward: quote.reward,
            delegate_to: quote.delegate,
            reward_delegated: quote.reward_delegated,
            block,
        });
        Ok(quote)
    }

    fn wipe_frozen_address(
        &mut self,
        caller: &AccountId,
        account: &AccountId,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<Atoms, LedgerError> {
        require(&self.roles, caller, Capability::Wipe)?;
        self.roles.ensure_unprotected(account)?;
        if !self.balances.is_frozen(account) {
            return Err(LedgerError::NotFrozen(*account));
        }

        let stake_forfeited = self.stakes.remove(account).is_ok();
        let amount = self.balances.wipe(account);
        self.supply.retire(amount);
        warn!(
            "Frozen account {} wiped by {}: {} atoms retired, stake forfeited: {}",
            account.short(),
            caller.short(),
            amount,
            stake_forfeited
        );
        events.push(LedgerEvent::FrozenAddressWiped {
            account: *account,
            amount,
            stake_forfeited,
        });
        events.push(LedgerEvent::Transfer {
            from: *account,
            to: AccountId::ZERO,
            amount,
        });
        Ok(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flexstake_core::ATOMS_PER_FLX;

    fn treasury() -> AccountId {
        AccountId::from_label("treasury")
    }

    fn alice() -> AccountId {
        AccountId::from_label("alice")
    }

    fn bob() -> AccountId {
        AccountId::from_label("bob")
    }

    fn ledger() -> Ledger {
        let mut options = LedgerOptions::new(treasury());
        options.initial_supply = 1_000 * ATOMS_PER_FLX;
        let mut ledger = Ledger::new(options, EventLog::new()).unwrap();
        ledger
            .initialize_flexible_staking(&treasury(), 240, 365, 0)
            .unwrap();
        ledger.sink_mut().drain();
        ledger
    }

    #[test]
    fn test_initial_supply_goes_to_treasury() {
        let mut options = LedgerOptions::new(treasury());
        options.initial_supply = 5;
        let ledger = Ledger::new(options, EventLog::new()).unwrap();
        assert_eq!(ledger.balance_of(&treasury()), 5);
        assert_eq!(ledger.total_supply(), 5);
        assert_eq!(ledger.sink().len(), 2);
    }

    #[test]
    fn test_initial_supply_above_cap_rejected() {
        let mut options = LedgerOptions::new(treasury());
        options.max_supply = 10;
        options.initial_supply = 11;
        assert!(matches!(
            Ledger::new(options, EventLog::new()),
            Err(LedgerError::MaxSupplyExceeded { .. })
        ));
    }

    #[test]
    fn test_transfer_moves_balance_and_emits() {
        let mut ledger = ledger();
        ledger.transfer(&treasury(), &alice(), 10, 1).unwrap();
        assert_eq!(ledger.balance_of(&alice()), 10);
        assert_eq!(
            ledger.sink().events(),
            &[LedgerEvent::Transfer {
                from: treasury(),
                to: alice(),
                amount: 10
            }]
        );
    }

    #[test]
    fn test_failed_operation_emits_nothing() {
        let mut ledger = ledger();
        assert!(ledger.transfer(&alice(), &bob(), 1, 1).is_err());
        assert!(ledger.sink().is_empty());
        assert_eq!(ledger.last_block(), 0);
    }

    #[test]
    fn test_transfer_to_frozen_leaves_sender_untouched() {
        let mut ledger = ledger();
        ledger.freeze(&treasury(), &bob(), 1).unwrap();
        let before = ledger.balance_of(&treasury());
        assert_eq!(
            ledger.transfer(&treasury(), &bob(), 10, 2),
            Err(LedgerError::AccountFrozen(bob()))
        );
        assert_eq!(ledger.balance_of(&treasury()), before);
    }

    #[test]
    fn test_self_transfer_is_balance_neutral() {
        let mut ledger = ledger();
        let before = ledger.balance_of(&treasury());
        ledger.transfer(&treasury(), &treasury(), 10, 1).unwrap();
        assert_eq!(ledger.balance_of(&treasury()), before);
    }

    #[test]
    fn test_block_height_regression_rejected() {
        let mut ledger = ledger();
        ledger.transfer(&treasury(), &alice(), 1, 10).unwrap();
        assert_eq!(
            ledger.transfer(&treasury(), &alice(), 1, 9),
            Err(LedgerError::BlockHeightRegressed {
                current: 9,
                last: 10
            })
        );
        ledger.transfer(&treasury(), &alice(), 1, 10).unwrap();
    }

    #[test]
    fn test_stake_requires_initialization() {
        let mut ledger = Ledger::new(LedgerOptions::new(treasury()), EventLog::new()).unwrap();
        assert_eq!(
            ledger.stake(&alice(), None, 0, 0),
            Err(LedgerError::StakingNotInitialized)
        );
    }

    #[test]
    fn test_treasury_mint_only_by_treasury() {
        let mut ledger = ledger();
        ledger
            .authorize_operator(&treasury(), &alice(), 0)
            .unwrap();
        assert!(matches!(
            ledger.treasury_mint(&alice(), 1, 0),
            Err(LedgerError::Unauthorized { .. })
        ));
        ledger.mint_to(&alice(), &bob(), 7, 0).unwrap();
        assert_eq!(ledger.balance_of(&bob()), 7);
    }

    #[test]
    fn test_unstake_credits_holder_and_delegate() {
        let mut ledger = ledger();
        ledger.transfer(&treasury(), &alice(), 240, 0).unwrap();
        ledger.stake(&alice(), Some(bob()), 50, 0).unwrap();
        let quote = ledger.unstake(&alice(), 10).unwrap();
        // 240 atoms over 10 blocks at difficulty 240
        assert_eq!(quote.total(), 10);
        assert_eq!(quote.reward_delegated, 5);
        assert_eq!(ledger.balance_of(&alice()), 245);
        assert_eq!(ledger.balance_of(&bob()), 5);
        assert!(ledger.stake_balance(&alice()).is_none());
    }

    #[test]
    fn test_unstake_with_frozen_delegate_keeps_stake() {
        let mut ledger = ledger();
        ledger.transfer(&treasury(), &alice(), 240, 0).unwrap();
        ledger.stake(&alice(), Some(bob()), 50, 0).unwrap();
        ledger.freeze(&treasury(), &bob(), 1).unwrap();
        assert_eq!(
            ledger.unstake(&alice(), 10),
            Err(LedgerError::AccountFrozen(bob()))
        );
        assert!(ledger.stake_balance(&alice()).is_some());
    }

    #[test]
    fn test_wipe_requires_frozen_and_forfeits_stake() {
        let mut ledger = ledger();
        ledger.transfer(&treasury(), &alice(), 100, 0).unwrap();
        ledger.stake(&alice(), None, 0, 0).unwrap();
        assert_eq!(
            ledger.wipe_frozen_address(&treasury(), &alice(), 1),
            Err(LedgerError::NotFrozen(alice()))
        );

        let supply = ledger.total_supply();
        ledger.freeze(&treasury(), &alice(), 1).unwrap();
        assert_eq!(ledger.wipe_frozen_address(&treasury(), &alice(), 2), Ok(100));
        assert_eq!(ledger.balance_of(&alice()), 0);
        assert_eq!(ledger.total_supply(), supply - 100);
        assert!(ledger.stake_balance(&alice()).is_none());
    }

    #[test]
    fn test_treasury_cannot_be_frozen() {
        let mut ledger = ledger();
        assert_eq!(
            ledger.freeze(&treasury(), &treasury(), 0),
            Err(LedgerError::ProtectedAccount(treasury()))
        );
    }

    #[test]
    fn test_state_serializes() {
        let ledger = ledger();
        let json = serde_json::to_string(ledger.state()).unwrap();
        let restored: LedgerState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.supply, ledger.state().supply);
        assert_eq!(restored.roles, ledger.state().roles);
    }

    #[test]
    fn test_from_state_restores_and_continues() {
        let mut ledger = ledger();
        ledger.transfer(&treasury(), &alice(), 240, 3).unwrap();
        ledger.stake(&alice(), None, 0, 3).unwrap();
        let json = serde_json::to_string(ledger.state()).unwrap();

        let state: LedgerState = serde_json::from_str(&json).unwrap();
        let mut restored = Ledger::from_state(state, EventLog::new()).unwrap();
        assert_eq!(restored.last_block(), 3);
        let quote = restored.unstake(&alice(), 13).unwrap();
        assert_eq!(quote.reward, 10);
    }

    #[test]
    fn test_from_state_rejects_supply_over_cap() {
        let mut options = LedgerOptions::new(treasury());
        options.initial_supply = 100;
        options.max_supply = 100;
        let ledger = Ledger::new(options, EventLog::new()).unwrap();

        let mut json: serde_json::Value = serde_json::to_value(ledger.state()).unwrap();
        json["supply"]["max_supply"] = serde_json::json!(50);
        let state: LedgerState = serde_json::from_value(json).unwrap();
        assert!(matches!(
            Ledger::from_state(state, EventLog::new()),
            Err(LedgerError::InvalidState(_))
        ));
    }

    #[test]
    fn test_from_state_rejects_unbacked_balances() {
        let ledger = ledger();
        let mut state = ledger.state().clone();
        state.supply = SupplyLedger::new(state.supply.max_supply());
        assert!(matches!(
            state.validate(),
            Err(LedgerError::InvalidState(_))
        ));
    }
}
