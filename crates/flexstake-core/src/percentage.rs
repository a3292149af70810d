// crates/flexstake-core/src/percentage.rs

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::amount::Atoms;
use crate::error::LedgerError;

/// Share of a stake's reward delegated to another account, 0–100 inclusive.
///
/// Construction is the validation boundary: values above 100, and negative
/// values arriving from signed inputs, fail with `InvalidPercentage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Percentage(u8);

impl Percentage {
    pub const ZERO: Percentage = Percentage(0);
    pub const FULL: Percentage = Percentage(100);

    pub fn new(value: u8) -> Result<Self, LedgerError> {
        if value > 100 {
            return Err(LedgerError::InvalidPercentage(value as i64));
        }
        Ok(Percentage(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// `floor(amount * self / 100)` without overflowing for any `amount`.
    pub fn of(self, amount: Atoms) -> Atoms {
        let p = self.0 as Atoms;
        (amount / 100) * p + (amount % 100) * p / 100
    }
}

impl TryFrom<i64> for Percentage {
    type Error = LedgerError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if !(0..=100).contains(&value) {
            return Err(LedgerError::InvalidPercentage(value));
        }
        Ok(Percentage(value as u8))
    }
}

impl From<Percentage> for u8 {
    fn from(p: Percentage) -> u8 {
        p.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        assert!(Percentage::new(0).is_ok());
        assert!(Percentage::new(100).is_ok());
        assert_eq!(
            Percentage::new(101).unwrap_err(),
            LedgerError::InvalidPercentage(101)
        );
    }

    #[test]
    fn test_negative_rejected_at_boundary() {
        assert_eq!(
            Percentage::try_from(-1i64).unwrap_err(),
            LedgerError::InvalidPercentage(-1)
        );
        assert_eq!(Percentage::try_from(30i64).unwrap().value(), 30);
    }

    #[test]
    fn test_of_truncates() {
        let p = Percentage::new(30).unwrap();
        assert_eq!(p.of(1000), 300);
        assert_eq!(p.of(7), 2); // 2.1 -> 2
        assert_eq!(Percentage::ZERO.of(12345), 0);
        assert_eq!(Percentage::FULL.of(12345), 12345);
    }

    #[test]
    fn test_of_matches_naive_formula() {
        let p = Percentage::new(37).unwrap();
        for amount in [0u128, 1, 99, 100, 101, 4_166_666_666_666_666_666_666] {
            assert_eq!(p.of(amount), amount * 37 / 100);
        }
    }

    #[test]
    fn test_of_does_not_overflow() {
        assert_eq!(Percentage::FULL.of(u128::MAX), u128::MAX);
    }

    #[test]
    fn test_serde_validates() {
        let p: Percentage = serde_json::from_str("30").unwrap();
        assert_eq!(p.value(), 30);
        assert!(serde_json::from_str::<Percentage>("101").is_err());
        assert!(serde_json::from_str::<Percentage>("-1").is_err());
    }
}
