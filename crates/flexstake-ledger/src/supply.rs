// crates/flexstake-ledger/src/supply.rs
//
// Supply ledger: total supply, the max-supply cap, and the mint/burn
// primitives built on the balance store.
//
// Invariant: total_supply <= max_supply after every operation. A mint is
// validated in full (cap and credit) before any write, so it either
// completes or leaves both counters and balances untouched.

use serde::{Deserialize, Serialize};
use tracing::debug;

use flexstake_core::{AccountId, Atoms, LedgerError, LedgerEvent};

use crate::balances::{BalanceHook, BalanceStore};

/// Global supply counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyLedger {
    total_supply: Atoms,
    max_supply: Atoms,
}

impl SupplyLedger {
    /// Create a supply ledger with zero circulating supply.
    pub fn new(max_supply: Atoms) -> Self {
        Self {
            total_supply: 0,
            max_supply,
        }
    }

    pub fn total_supply(&self) -> Atoms {
        self.total_supply
    }

    pub fn max_supply(&self) -> Atoms {
        self.max_supply
    }

    /// Remaining headroom under the cap.
    pub fn available(&self) -> Atoms {
        self.max_supply - self.total_supply
    }

    /// Validate that `amount` can be minted without breaching the cap.
    pub fn check_mint(&self, amount: Atoms) -> Result<(), LedgerError> {
        let available = self.available();
        if amount > available {
            return Err(LedgerError::MaxSupplyExceeded {
                requested: amount,
                available,
            });
        }
        Ok(())
    }

    /// Mint `amount` to `to`.
    ///
    /// # Errors
    /// `MaxSupplyExceeded` if the cap would be breached; any credit failure
    /// of `to` (`ZeroAddressTarget`, `AccountFrozen`). Nothing is written on
    /// error.
    pub fn mint(
        &mut self,
        balances: &mut BalanceStore,
        hook: &mut dyn BalanceHook,
        operator: &AccountId,
        to: &AccountId,
        amount: Atoms,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<(), LedgerError> {
        self.check_mint(amount)?;
        balances.check_credit(to, amount)?;

        balances.credit(to, amount, hook, events)?;
        self.total_supply += amount;
        debug!(
            "Minted {} atoms to {}, total supply {}",
            amount,
            to.short(),
            self.total_supply
        );
        events.push(LedgerEvent::Minted {
            operator: *operator,
            to: *to,
            amount,
        });
        events.push(LedgerEvent::Transfer {
            from: AccountId::ZERO,
            to: *to,
            amount,
        });
        Ok(())
    }

    /// Burn `amount` from `from`.
    ///
    /// # Errors
    /// Whatever the debit fails with (`AccountFrozen`, `InsufficientBalance`).
    pub fn burn(
        &mut self,
        balances: &mut BalanceStore,
        hook: &mut dyn BalanceHook,
        from: &AccountId,
        amount: Atoms,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<(), LedgerError> {
        balances.debit(from, amount, hook, events)?;
        self.total_supply -= amount;
        debug!(
            "Burned {} atoms from {}, total supply {}",
            amount,
            from.short(),
            self.total_supply
        );
        events.push(LedgerEvent::Burned {
            from: *from,
            amount,
        });
        events.push(LedgerEvent::Transfer {
            from: *from,
            to: AccountId::ZERO,
            amount,
        });
        Ok(())
    }

    /// Remove `amount` from circulation without touching balances
    /// (the balance was already zeroed by a wipe).
    pub fn retire(&mut self, amount: Atoms) {
        self.total_supply = self.total_supply.saturating_sub(amount);
    }
}
