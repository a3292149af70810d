// crates/flexstake-ledger/src/roles.rs
//
// Governance roles: the treasury, the asset-protection account, treasury
// operators, and the pause switch.
//
// Capability map:
//   treasury          -> every capability
//   asset protection  -> Freeze, Wipe
//   operators         -> Mint
//
// The treasury is a protected account: it can be neither frozen nor wiped.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::info;

use flexstake_core::{AccountId, Authority, Capability, LedgerError, LedgerEvent};

/// Fail with `Unauthorized` unless `caller` holds `capability`.
pub fn require(
    authority: &dyn Authority,
    caller: &AccountId,
    capability: Capability,
) -> Result<(), LedgerError> {
    if authority.is_authorized(caller, capability) {
        Ok(())
    } else {
        Err(LedgerError::Unauthorized {
            caller: *caller,
            capability,
        })
    }
}

/// Role assignments for one ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roles {
    treasury: AccountId,
    asset_protection: Option<AccountId>,
    operators: BTreeSet<AccountId>,
    paused: bool,
}

impl Authority for Roles {
    fn is_authorized(&self, caller: &AccountId, capability: Capability) -> bool {
        if *caller == self.treasury {
            return true;
        }
        match capability {
            Capability::Freeze | Capability::Wipe => self.asset_protection == Some(*caller),
            Capability::Mint => self.operators.contains(caller),
            Capability::Difficulty | Capability::Pause | Capability::ManageRoles => false,
        }
    }
}

impl Roles {
    pub fn new(treasury: AccountId) -> Self {
        Self {
            treasury,
            asset_protection: None,
            operators: BTreeSet::new(),
            paused: false,
        }
    }

    pub fn treasury(&self) -> AccountId {
        self.treasury
    }

    pub fn asset_protection(&self) -> Option<AccountId> {
        self.asset_protection
    }

    pub fn is_operator(&self, account: &AccountId) -> bool {
        self.operators.contains(account)
    }

    pub fn operators(&self) -> impl Iterator<Item = &AccountId> {
        self.operators.iter()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// `Paused` while the ledger is paused.
    pub fn ensure_not_paused(&self) -> Result<(), LedgerError> {
        if self.paused {
            return Err(LedgerError::Paused);
        }
        Ok(())
    }

    /// `ProtectedAccount` for the treasury.
    pub fn ensure_unprotected(&self, account: &AccountId) -> Result<(), LedgerError> {
        if *account == self.treasury {
            return Err(LedgerError::ProtectedAccount(*account));
        }
        Ok(())
    }

    /// Hand the asset-protection role to `new`. Allowed for the treasury and
    /// for the current role holder.
    pub fn set_asset_protection_role(
        &mut self,
        caller: &AccountId,
        new: &AccountId,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<(), LedgerError> {
        if self.asset_protection != Some(*caller) {
            require(&*self, caller, Capability::ManageRoles)?;
        }
        if new.is_zero() {
            return Err(LedgerError::ZeroAddressTarget);
        }
        let old = self.asset_protection.replace(*new);
        info!(
            "Asset protection role: {:?} -> {}",
            old.map(|a| a.short()),
            new.short()
        );
        events.push(LedgerEvent::AssetProtectionRoleSet { old, new: *new });
        Ok(())
    }

    pub fn authorize_operator(
        &mut self,
        caller: &AccountId,
        operator: &AccountId,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<(), LedgerError> {
        require(&*self, caller, Capability::ManageRoles)?;
        if operator.is_zero() {
            return Err(LedgerError::ZeroAddressTarget);
        }
        if self.operators.insert(*operator) {
            info!("Treasury operator authorized: {}", operator.short());
            events.push(LedgerEvent::OperatorAuthorized {
                operator: *operator,
            });
        }
        Ok(())
    }

    pub fn revoke_operator(
        &mut self,
        caller: &AccountId,
        operator: &AccountId,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<(), LedgerError> {
        require(&*self, caller, Capability::ManageRoles)?;
        if self.operators.remove(operator) {
            info!("Treasury operator revoked: {}", operator.short());
            events.push(LedgerEvent::OperatorRevoked {
                operator: *operator,
            });
        }
        Ok(())
    }

    pub fn pause(&mut self, caller: &AccountId, events: &mut Vec<LedgerEvent>) -> Result<(), LedgerError> {
        require(&*self, caller, Capability::Pause)?;
        if !self.paused {
            self.paused = true;
            info!("Ledger paused by {}", caller.short());
            events.push(LedgerEvent::Paused);
        }
        Ok(())
    }

    pub fn unpause(&mut self, caller: &AccountId, events: &mut Vec<LedgerEvent>) -> Result<(), LedgerError> {
        require(&*self, caller, Capability::Pause)?;
        if self.paused {
            self.paused = false;
            info!("Ledger unpaused by {}", caller.short());
            events.push(LedgerEvent::Unpaused);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn treasury() -> AccountId {
        AccountId::from_label("treasury")
    }

    fn guard() -> AccountId {
        AccountId::from_label("asset-protection")
    }

    fn operator() -> AccountId {
        AccountId::from_label("operator")
    }

    #[test]
    fn test_treasury_holds_everything() {
        let roles = Roles::new(treasury());
        for cap in [
            Capability::Mint,
            Capability::Freeze,
            Capability::Wipe,
            Capability::Difficulty,
            Capability::Pause,
            Capability::ManageRoles,
        ] {
            assert!(roles.is_authorized(&treasury(), cap));
            assert!(!roles.is_authorized(&guard(), cap));
        }
    }

    #[test]
    fn test_capability_map() {
        let mut roles = Roles::new(treasury());
        let mut events = Vec::new();
        roles
            .set_asset_protection_role(&treasury(), &guard(), &mut events)
            .unwrap();
        roles
            .authorize_operator(&treasury(), &operator(), &mut events)
            .unwrap();

        assert!(roles.is_authorized(&guard(), Capability::Freeze));
        assert!(roles.is_authorized(&guard(), Capability::Wipe));
        assert!(!roles.is_authorized(&guard(), Capability::Mint));
        assert!(roles.is_authorized(&operator(), Capability::Mint));
        assert!(!roles.is_authorized(&operator(), Capability::Difficulty));
    }

    #[test]
    fn test_require_reports_capability() {
        let roles = Roles::new(treasury());
        assert_eq!(
            require(&roles, &operator(), Capability::Pause),
            Err(LedgerError::Unauthorized {
                caller: operator(),
                capability: Capability::Pause,
            })
        );
    }

    #[test]
    fn test_role_holder_can_hand_over() {
        let mut roles = Roles::new(treasury());
        let mut events = Vec::new();
        roles
            .set_asset_protection_role(&treasury(), &guard(), &mut events)
            .unwrap();
        let successor = AccountId::from_label("successor");
        roles
            .set_asset_protection_role(&guard(), &successor, &mut events)
            .unwrap();
        assert_eq!(roles.asset_protection(), Some(successor));

        // The previous holder lost the right to reassign.
        assert!(roles
            .set_asset_protection_role(&guard(), &guard(), &mut events)
            .is_err());
        assert_eq!(
            events.last(),
            Some(&LedgerEvent::AssetProtectionRoleSet {
                old: Some(guard()),
                new: successor,
            })
        );
    }

    #[test]
    fn test_revoke_operator() {
        let mut roles = Roles::new(treasury());
        let mut events = Vec::new();
        roles
            .authorize_operator(&treasury(), &operator(), &mut events)
            .unwrap();
        roles
            .revoke_operator(&treasury(), &operator(), &mut events)
            .unwrap();
        assert!(!roles.is_operator(&operator()));
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_pause_toggle() {
        let mut roles = Roles::new(treasury());
        let mut events = Vec::new();
        assert!(roles.ensure_not_paused().is_ok());
        roles.pause(&treasury(), &mut events).unwrap();
        assert_eq!(roles.ensure_not_paused(), Err(LedgerError::Paused));
        assert!(roles.unpause(&operator(), &mut events).is_err());
        roles.unpause(&treasury(), &mut events).unwrap();
        assert!(!roles.is_paused());
        assert_eq!(events, vec![LedgerEvent::Paused, LedgerEvent::Unpaused]);
    }

    #[test]
    fn test_treasury_is_protected() {
        let roles = Roles::new(treasury());
        assert_eq!(
            roles.ensure_unprotected(&treasury()),
            Err(LedgerError::ProtectedAccount(treasury()))
        );
        assert!(roles.ensure_unprotected(&guard()).is_ok());
    }
}
