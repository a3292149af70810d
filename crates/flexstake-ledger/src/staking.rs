// crates/flexstake-ledger/src/staking.rs
//
// Flexible stake registry: "stake everything" records with optional reward
// delegation.
//
// Per-account lifecycle: Unstaked -> Staked -> Unstaked. A record is created
// by `stake`, resized in place whenever the holder's balance changes (the
// registry is the balance store's hook), and removed by unstake or a wipe.
// Re-staking creates a fresh record.
//
// Invariant: while staked, staked_amount == liquid balance.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use flexstake_core::{AccountId, Atoms, BlockHeight, LedgerError, LedgerEvent, Percentage};

use crate::balances::BalanceHook;

/// A holder's flexible stake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeRecord {
    /// Tracks the holder's full liquid balance.
    pub staked_amount: Atoms,
    /// Receiver of the delegated share of the reward, if any.
    pub delegate_to: Option<AccountId>,
    /// Share of the reward that goes to `delegate_to`.
    pub delegate_percentage: Percentage,
    /// Block at which the stake was opened. Accrual is measured from here.
    pub stake_start_block: BlockHeight,
    /// Block of the last reward settlement.
    pub last_accrual_block: BlockHeight,
}

/// All open flexible stakes, keyed by holder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StakeRegistry {
    records: BTreeMap<AccountId, StakeRecord>,
}

impl StakeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_staked(&self, holder: &AccountId) -> bool {
        self.records.contains_key(holder)
    }

    pub fn get(&self, holder: &AccountId) -> Option<&StakeRecord> {
        self.records.get(holder)
    }

    /// `(amount, delegate, percentage)` for an open stake.
    pub fn stake_balance(
        &self,
        holder: &AccountId,
    ) -> Option<(Atoms, Option<AccountId>, Percentage)> {
        self.records
            .get(holder)
            .map(|r| (r.staked_amount, r.delegate_to, r.delegate_percentage))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AccountId, &StakeRecord)> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Validate `stake` without writing.
    pub fn check_stake(&self, holder: &AccountId, percentage: u8) -> Result<Percentage, LedgerError> {
        if self.is_staked(holder) {
            return Err(LedgerError::AlreadyStaked(*holder));
        }
        Percentage::new(percentage)
    }

    /// Open a stake over the holder's entire `balance`.
    ///
    /// A zero-address delegate is treated as no delegate.
    ///
    /// # Errors
    /// `AlreadyStaked` if a record exists; `InvalidPercentage` above 100.
    pub fn stake(
        &mut self,
        holder: &AccountId,
        balance: Atoms,
        delegate_to: Option<AccountId>,
        percentage: u8,
        block: BlockHeight,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<&StakeRecord, LedgerError> {
        let percentage = self.check_stake(holder, percentage)?;
        let delegate_to = delegate_to.filter(|d| !d.is_zero());

        info!(
            "Flexible stake opened by {}: {} atoms, {} delegated to {:?}",
            holder.short(),
            balance,
            percentage,
            delegate_to.map(|d| d.short())
        );
        events.push(LedgerEvent::Staked {
            account: *holder,
            amount: balance,
            delegate_to,
            percentage,
            block,
        });

        let record = self.records.entry(*holder).or_insert(StakeRecord {
            staked_amount: balance,
            delegate_to,
            delegate_percentage: percentage,
            stake_start_block: block,
            last_accrual_block: block,
        });
        Ok(record)
    }

    /// Remove a holder's record, returning it.
    pub fn remove(&mut self, holder: &AccountId) -> Result<StakeRecord, LedgerError> {
        self.records
            .remove(holder)
            .ok_or(LedgerError::NotStaked(*holder))
    }

    /// Resize after a credit. `new_balance` is the post-credit balance.
    pub fn grow_stake(&mut self, holder: &AccountId, new_balance: Atoms) -> Option<&StakeRecord> {
        let record = self.records.get_mut(holder)?;
        record.staked_amount = new_balance;
        debug!("Stake of {} grew to {} atoms", holder.short(), new_balance);
        Some(record)
    }

    /// Resize after a debit. `new_balance` is the post-debit balance.
    pub fn shrink_stake(&mut self, holder: &AccountId, new_balance: Atoms) -> Option<&StakeRecord> {
        let record = self.records.get_mut(holder)?;
        record.staked_amount = new_balance;
        debug!("Stake of {} reduced to {} atoms", holder.short(), new_balance);
        Some(record)
    }
}

impl BalanceHook for StakeRegistry {
    fn on_debit(&mut self, account: &AccountId, new_balance: Atoms, events: &mut Vec<LedgerEvent>) {
        if let Some(record) = self.shrink_stake(account, new_balance) {
            events.push(LedgerEvent::StakeReduced {
                account: *account,
                amount: record.staked_amount,
                delegate_to: record.delegate_to,
                percentage: record.delegate_percentage,
            });
        }
    }

    fn on_credit(&mut self, account: &AccountId, new_balance: Atoms, events: &mut Vec<LedgerEvent>) {
        if let Some(record) = self.grow_stake(account, new_balance) {
            events.push(LedgerEvent::StakeGrown {
                account: *account,
                amount: record.staked_amount,
                delegate_to: record.delegate_to,
                percentage: record.delegate_percentage,
            });
        }
    }
}
