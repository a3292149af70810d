// crates/flexstake-ledger/src/balances.rs
//
// Balance store: per-holder liquid balances and the frozen flag.
//
// Every debit and credit first validates, then notifies a `BalanceHook` with
// the post-change balance, then writes. The stake registry is the hook in
// production, which keeps this module unaware of staking.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use flexstake_core::{AccountId, Atoms, LedgerError, LedgerEvent};

/// A holder's balance entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Spendable balance in atoms.
    pub liquid_balance: Atoms,
    /// Frozen accounts reject every debit and credit except a wipe.
    pub frozen: bool,
}

/// Observer invoked on every balance change, before the new balance is
/// written.
pub trait BalanceHook {
    /// `account` is about to be debited down to `new_balance`.
    fn on_debit(&mut self, account: &AccountId, new_balance: Atoms, events: &mut Vec<LedgerEvent>);

    /// `account` is about to be credited up to `new_balance`.
    fn on_credit(&mut self, account: &AccountId, new_balance: Atoms, events: &mut Vec<LedgerEvent>);
}

/// Hook that ignores every change.
pub struct NoHook;

impl BalanceHook for NoHook {
    fn on_debit(&mut self, _: &AccountId, _: Atoms, _: &mut Vec<LedgerEvent>) {}
    fn on_credit(&mut self, _: &AccountId, _: Atoms, _: &mut Vec<LedgerEvent>) {}
}

/// Per-account liquid balances.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BalanceStore {
    accounts: BTreeMap<AccountId, Account>,
}

impl BalanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Liquid balance of `account` (zero for unknown accounts).
    pub fn balance_of(&self, account: &AccountId) -> Atoms {
        self.accounts
            .get(account)
            .map(|a| a.liquid_balance)
            .unwrap_or(0)
    }

    pub fn is_frozen(&self, account: &AccountId) -> bool {
        self.accounts.get(account).map(|a| a.frozen).unwrap_or(false)
    }

    pub fn account(&self, account: &AccountId) -> Option<&Account> {
        self.accounts.get(account)
    }

    /// All known accounts in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&AccountId, &Account)> {
        self.accounts.iter()
    }

    /// Validate a debit without writing.
    ///
    /// # Errors
    /// `AccountFrozen` if the account is frozen, `InsufficientBalance` if
    /// `amount` exceeds the liquid balance.
    pub fn check_debit(&self, account: &AccountId, amount: Atoms) -> Result<(), LedgerError> {
        if self.is_frozen(account) {
            return Err(LedgerError::AccountFrozen(*account));
        }
        let available = self.balance_of(account);
        if amount > available {
            return Err(LedgerError::InsufficientBalance {
                account: *account,
                requested: amount,
                available,
            });
        }
        Ok(())
    }

    /// Validate a credit without writing.
    ///
    /// # Errors
    /// `ZeroAddressTarget` for the null account, `AccountFrozen` if frozen,
    /// `ArithmeticOverflow` if the balance would leave the `u128` range.
    pub fn check_credit(&self, account: &AccountId, amount: Atoms) -> Result<(), LedgerError> {
        if account.is_zero() {
            return Err(LedgerError::ZeroAddressTarget);
        }
        if self.is_frozen(account) {
            return Err(LedgerError::AccountFrozen(*account));
        }
        self.balance_of(account).checked_add(amount).ok_or_else(|| {
            LedgerError::ArithmeticOverflow(format!("credit of {} atoms to {}", amount, account))
        })?;
        Ok(())
    }

    /// Debit `amount` from `account`.
    pub fn debit(
        &mut self,
        account: &AccountId,
        amount: Atoms,
        hook: &mut dyn BalanceHook,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<(), LedgerError> {
        self.check_debit(account, amount)?;
        let entry = self.accounts.entry(*account).or_default();
        let new_balance = entry.liquid_balance - amount;
        hook.on_debit(account, new_balance, events);
        entry.liquid_balance = new_balance;
        debug!("Debited {} atoms from {}, balance now {}", amount, account.short(), new_balance);
        Ok(())
    }

    /// Credit `amount` to `account`.
    pub fn credit(
        &mut self,
        account: &AccountId,
        amount: Atoms,
        hook: &mut dyn BalanceHook,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<(), LedgerError> {
        self.check_credit(account, amount)?;
        let entry = self.accounts.entry(*account).or_default();
        let new_balance = entry.liquid_balance + amount;
        hook.on_credit(account, new_balance, events);
        entry.liquid_balance = new_balance;
        debug!("Credited {} atoms to {}, balance now {}", amount, account.short(), new_balance);
        Ok(())
    }

    pub fn set_frozen(&mut self, account: &AccountId, frozen: bool) {
        self.accounts.entry(*account).or_default().frozen = frozen;
    }

    /// Zero the balance of `account` regardless of the frozen flag.
    /// Returns the amount removed.
    pub fn wipe(&mut self, account: &AccountId) -> Atoms {
        match self.accounts.get_mut(account) {
            Some(entry) => std::mem::take(&mut entry.liquid_balance),
            None => 0,
        }
    }
}
