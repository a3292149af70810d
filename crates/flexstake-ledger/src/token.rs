// crates/flexstake-ledger/src/token.rs
//
// FLX token amount type.
//
// The smallest unit of FLX is the "atom". 1 FLX = 10^18 atoms. All internal
// accounting uses atoms; `Flx` exists for parsing and displaying
// human-entered decimal amounts in configs, scripts and CLI output.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use flexstake_core::{Atoms, LedgerError, ATOMS_PER_FLX, DECIMALS};

/// Default maximum supply: 21,000,000,000 FLX.
pub const DEFAULT_MAX_SUPPLY_ATOMS: Atoms = 21_000_000_000 * ATOMS_PER_FLX;

/// A FLX token amount.
///
/// Wraps an amount in atoms. Serialized as a decimal FLX string ("1.5"), so
/// 18-decimal amounts survive formats without 128-bit integers (TOML).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Flx {
    /// Amount in atoms (1 FLX = 10^18 atoms).
    pub atoms: Atoms,
}

impl Flx {
    /// Create a Flx amount from whole tokens.
    ///
    /// # Example
    /// ```
    /// use flexstake_ledger::token::Flx;
    /// let amount = Flx::from_whole(3);
    /// assert_eq!(amount.atoms, 3_000_000_000_000_000_000);
    /// ```
    pub fn from_whole(tokens: u64) -> Self {
        Self {
            atoms: tokens as Atoms * ATOMS_PER_FLX,
        }
    }

    /// Create a Flx amount from an atom value.
    pub fn from_atoms(atoms: Atoms) -> Self {
        Self { atoms }
    }

    /// Returns zero FLX.
    pub fn zero() -> Self {
        Self { atoms: 0 }
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.atoms.checked_add(rhs.atoms).map(Self::from_atoms)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.atoms.checked_sub(rhs.atoms).map(Self::from_atoms)
    }
}

impl FromStr for Flx {
    type Err = LedgerError;

    /// Parse a decimal FLX amount: `"42"`, `"0.5"`, `"1_000_000"`.
    /// At most 18 fractional digits are accepted; nothing is rounded.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned: String = s.trim().chars().filter(|c| *c != '_').collect();
        let invalid = || LedgerError::Serialization(format!("Invalid FLX amount: {:?}", s));

        let (whole, frac) = match cleaned.split_once('.') {
            Some((w, f)) => (w, f),
            None => (cleaned.as_str(), ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if frac.len() > DECIMALS as usize {
            return Err(LedgerError::Serialization(format!(
                "FLX amount {:?} has more than {} decimal places",
                s, DECIMALS
            )));
        }

        let whole_atoms = if whole.is_empty() {
            0
        } else {
            whole
                .parse::<Atoms>()
                .map_err(|_| invalid())?
                .checked_mul(ATOMS_PER_FLX)
                .ok_or_else(|| LedgerError::ArithmeticOverflow(format!("FLX amount {:?}", s)))?
        };
        let frac_atoms = if frac.is_empty() {
            0
        } else {
            let padded = format!("{:0<width$}", frac, width = DECIMALS as usize);
            padded.parse::<Atoms>().map_err(|_| invalid())?
        };

        whole_atoms
            .checked_add(frac_atoms)
            .map(Self::from_atoms)
            .ok_or_else(|| LedgerError::ArithmeticOverflow(format!("FLX amount {:?}", s)))
    }
}

impl fmt::Display for Flx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.atoms / ATOMS_PER_FLX;
        let frac = self.atoms % ATOMS_PER_FLX;
        if frac == 0 {
            write!(f, "{}", whole)
        } else {
            // Display up to 18 decimal places, trimming trailing zeros
            let frac_str = format!("{:018}", frac);
            let trimmed = frac_str.trim_end_matches('0');
            write!(f, "{}.{}", whole, trimmed)
        }
    }
}

impl Serialize for Flx {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct FlxVisitor;

impl<'de> Visitor<'de> for FlxVisitor {
    type Value = Flx;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal FLX amount as a string, or a whole number of FLX")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Flx::from_whole(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        let whole = u64::try_from(v).map_err(|_| E::custom("FLX amounts cannot be negative"))?;
        Ok(Flx::from_whole(whole))
    }
}

impl<'de> Deserialize<'de> for Flx {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(FlxVisitor)
    }
}
