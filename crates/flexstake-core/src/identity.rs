// crates/flexstake-core/src/identity.rs

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::crypto;
use crate::error::LedgerError;

/// Opaque 32-byte account identity (the address of a holder, delegate or role).
///
/// Serialized as a `0x`-prefixed hex string. When deserializing, any string
/// that does not start with `0x` is treated as a label and hashed with
/// [`AccountId::from_label`], which keeps genesis files and transaction
/// scripts readable ("treasury", "alice", ...).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountId(pub [u8; 32]);

impl AccountId {
    /// The null account. Credits to it are rejected; it is the `from` of mints
    /// and the `to` of burns in `Transfer` events.
    pub const ZERO: AccountId = AccountId([0u8; 32]);

    /// Derive an account id from a human-readable label.
    pub fn from_label(label: &str) -> Self {
        AccountId(crypto::hash_label(label))
    }

    /// Parse a `0x`-prefixed, 64-digit hex string.
    pub fn from_hex(s: &str) -> Result<Self, LedgerError> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits)
            .map_err(|e| LedgerError::Serialization(format!("Invalid account hex {}: {}", s, e)))?;
        let arr: [u8; 32] = bytes.try_into().map_err(|_| {
            LedgerError::Serialization(format!("Account id {} must be exactly 32 bytes", s))
        })?;
        Ok(AccountId(arr))
    }

    /// Resolve a user-supplied reference: `0x...` hex, otherwise a label.
    pub fn resolve(s: &str) -> Result<Self, LedgerError> {
        if s.starts_with("0x") {
            Self::from_hex(s)
        } else {
            Ok(Self::from_label(s))
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Abbreviated form for tables and log lines: `0x1234abcd…9f8e7d6c`.
    pub fn short(&self) -> String {
        let full = hex::encode(self.0);
        format!("0x{}…{}", &full[..8], &full[56..])
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.short())
    }
}

impl FromStr for AccountId {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::resolve(s)
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

struct AccountIdVisitor;

impl<'de> Visitor<'de> for AccountIdVisitor {
    type Value = AccountId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a 0x-prefixed 32-byte hex string or an account label")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        AccountId::resolve(v).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(AccountIdVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        let id = AccountId::from_label("alice");
        let parsed = AccountId::from_hex(&id.to_hex()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_resolve_label_vs_hex() {
        let zero_hex = format!("0x{}", "00".repeat(32));
        assert_eq!(AccountId::resolve(&zero_hex).unwrap(), AccountId::ZERO);
        assert_eq!(
            AccountId::resolve("treasury").unwrap(),
            AccountId::from_label("treasury")
        );
    }

    #[test]
    fn test_bad_hex_is_rejected() {
        assert!(AccountId::resolve("0xzz").is_err());
        assert!(AccountId::resolve("0x1234").is_err());
    }

    #[test]
    fn test_serde_accepts_labels() {
        let id: AccountId = serde_json::from_str("\"bob\"").unwrap();
        assert_eq!(id, AccountId::from_label("bob"));

        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.to_hex()));
    }

    #[test]
    fn test_short_form() {
        let short = AccountId::ZERO.short();
        assert!(short.starts_with("0x00000000"));
        assert!(short.ends_with("00000000"));
    }
}
