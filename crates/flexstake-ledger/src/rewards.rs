// crates/flexstake-ledger/src/rewards.rs
//
// Flexible stake reward calculation.
//
// A stake earns `staked / base_difficulty` atoms per block in halving epoch 0
// and half as much in each following epoch. Epochs are counted from the
// difficulty controller's creation block:
//
//   epoch(b) = (b - created_at_block) / halving_interval_blocks
//
// The elapsed span `[stake_start_block, current_block)` is split at halving
// boundaries and each segment is accrued separately, then summed. Each
// segment truncates toward zero. No floating point is involved.

use serde::{Deserialize, Serialize};

use flexstake_core::{AccountId, Atoms, BlockHeight, Percentage};

use crate::difficulty::DifficultyParameters;
use crate::staking::StakeRecord;

/// Beyond this many halvings the divisor no longer fits in `u128`.
const MAX_HALVINGS: u64 = 128;

/// Reward owed to a stake, split between the holder and the delegate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RewardQuote {
    /// Holder's share.
    pub reward: Atoms,
    /// Delegate receiving `reward_delegated`, if any.
    pub delegate: Option<AccountId>,
    /// Delegate's share.
    pub reward_delegated: Atoms,
}

impl RewardQuote {
    pub fn total(&self) -> Atoms {
        self.reward + self.reward_delegated
    }
}

/// Halving epoch of `block`. Blocks before the creation block count as
/// epoch 0.
pub fn halving_epoch(block: BlockHeight, params: &DifficultyParameters) -> u64 {
    if params.halving_interval_blocks == 0 {
        return 0;
    }
    block.saturating_sub(params.created_at_block) / params.halving_interval_blocks
}

/// `floor(a * b / d)`, saturating instead of overflowing.
fn mul_div(a: Atoms, b: Atoms, d: Atoms) -> Atoms {
    match a.checked_mul(b) {
        Some(product) => product / d,
        None => {
            let (q, r) = (a / d, a % d);
            q.saturating_mul(b).saturating_add(r.saturating_mul(b) / d)
        }
    }
}

/// Total reward accrued by `staked` atoms over `[from, to)`.
///
/// Zero for an empty span, a zero stake, or zero parameters.
pub fn accrued_reward(
    staked: Atoms,
    from: BlockHeight,
    to: BlockHeight,
    params: &DifficultyParameters,
) -> Atoms {
    if to <= from
        || staked == 0
        || params.base_difficulty == 0
        || params.halving_interval_blocks == 0
    {
        return 0;
    }

    let mut total: Atoms = 0;
    let mut cursor = from;
    while cursor < to {
        let epoch = halving_epoch(cursor, params);
        if epoch >= MAX_HALVINGS {
            break;
        }
        let divisor = match params.base_difficulty.checked_mul(1u128 << epoch) {
            Some(d) => d,
            None => break,
        };

        // First block of the next epoch
        let boundary = params
            .created_at_block
            .saturating_add((epoch + 1).saturating_mul(params.halving_interval_blocks));
        let segment_end = to.min(boundary);
        let blocks = (segment_end - cursor) as Atoms;

        total = total.saturating_add(mul_div(staked, blocks, divisor));
        cursor = segment_end;
    }
    total
}

/// Split `total` between holder and delegate. Without a delegate the holder
/// keeps everything.
pub fn split_reward(total: Atoms, delegate: Option<AccountId>, percentage: Percentage) -> RewardQuote {
    match delegate {
        Some(delegate) => {
            let reward_delegated = percentage.of(total);
            RewardQuote {
                reward: total - reward_delegated,
                delegate: Some(delegate),
                reward_delegated,
            }
        }
        None => RewardQuote {
            reward: total,
            delegate: None,
            reward_delegated: 0,
        },
    }
}

/// Reward owed to `record` if it were settled at `current_block`.
pub fn calculate_reward(
    record: &StakeRecord,
    current_block: BlockHeight,
    params: &DifficultyParameters,
) -> RewardQuote {
    let total = accrued_reward(
        record.staked_amount,
        record.stake_start_block,
        current_block,
        params,
    );
    split_reward(total, record.delegate_to, record.delegate_percentage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flexstake_core::ATOMS_PER_FLX;

    fn params() -> DifficultyParameters {
        DifficultyParameters {
            base_difficulty: 240,
            halving_interval_blocks: 365,
            created_at_block: 0,
        }
    }

    fn record(staked: Atoms, start: BlockHeight, delegate: Option<AccountId>, pct: u8) -> StakeRecord {
        StakeRecord {
            staked_amount: staked,
            delegate_to: delegate,
            delegate_percentage: Percentage::new(pct).unwrap(),
            stake_start_block: start,
            last_accrual_block: start,
        }
    }

    const MILLION_FLX: Atoms = 1_000_000 * ATOMS_PER_FLX;

    #[test]
    fn test_zero_elapsed_is_zero() {
        assert_eq!(accrued_reward(MILLION_FLX, 10, 10, &params()), 0);
        assert_eq!(accrued_reward(MILLION_FLX, 10, 9, &params()), 0);
        assert_eq!(accrued_reward(0, 0, 1_000, &params()), 0);
    }

    #[test]
    fn test_one_year_calibration() {
        let total = accrued_reward(MILLION_FLX, 0, 365, &params());
        assert_eq!(total, MILLION_FLX * 365 / 240);
        assert_eq!(total / ATOMS_PER_FLX, 1_520_833);
    }

    #[test]
    fn test_reward_non_decreasing() {
        let mut previous = 0;
        for block in (0..2_000).step_by(17) {
            let r = accrued_reward(MILLION_FLX, 3, block, &params());
            assert!(r >= previous, "reward dropped at block {}", block);
            previous = r;
        }
    }

    #[test]
    fn test_halving_halves_rate() {
        let first = accrued_reward(MILLION_FLX, 0, 365, &params());
        let second = accrued_reward(MILLION_FLX, 365, 730, &params());
        let diff = first.abs_diff(second * 2);
        assert!(diff <= 2, "first {} second {}", first, second);
    }

    #[test]
    fn test_span_across_boundary_is_sum_of_segments() {
        let whole = accrued_reward(MILLION_FLX, 300, 400, &params());
        let split = accrued_reward(MILLION_FLX, 300, 365, &params())
            + accrued_reward(MILLION_FLX, 365, 400, &params());
        assert_eq!(whole, split);
    }

    #[test]
    fn test_epochs_counted_from_creation_block() {
        let p = DifficultyParameters {
            created_at_block: 1_000,
            ..params()
        };
        assert_eq!(halving_epoch(0, &p), 0);
        assert_eq!(halving_epoch(1_364, &p), 0);
        assert_eq!(halving_epoch(1_365, &p), 1);
        assert_eq!(
            accrued_reward(MILLION_FLX, 1_000, 1_365, &p),
            accrued_reward(MILLION_FLX, 0, 365, &params())
        );
    }

    #[test]
    fn test_far_future_terminates() {
        let p = DifficultyParameters {
            halving_interval_blocks: 1,
            ..params()
        };
        let total = accrued_reward(MILLION_FLX, 0, u64::MAX, &p);
        // Geometric series bounded by twice the first block.
        assert!(total <= 2 * (MILLION_FLX / 240));
    }

    #[test]
    fn test_single_block_split_with_delegate() {
        let delegate = AccountId::from_label("stake-delegated-to");
        let quote = calculate_reward(&record(MILLION_FLX, 0, Some(delegate), 30), 1, &params());
        let total = MILLION_FLX / 240;
        assert_eq!(quote.reward_delegated, total * 30 / 100);
        assert_eq!(quote.reward, total - total * 30 / 100);
        assert_eq!(quote.delegate, Some(delegate));
        assert_eq!(quote.total(), total);
    }

    #[test]
    fn test_no_delegate_keeps_everything() {
        let quote = calculate_reward(&record(MILLION_FLX, 0, None, 30), 10, &params());
        assert_eq!(quote.reward_delegated, 0);
        assert_eq!(quote.reward, MILLION_FLX * 10 / 240);
    }

    #[test]
    fn test_full_delegation() {
        let delegate = AccountId::from_label("d");
        let quote = split_reward(1_000, Some(delegate), Percentage::FULL);
        assert_eq!(quote.reward, 0);
        assert_eq!(quote.reward_delegated, 1_000);
    }

    #[test]
    fn test_huge_stake_saturates_instead_of_overflowing() {
        let r = accrued_reward(u128::MAX, 0, 1_000_000, &params());
        assert!(r > 0);
    }
}
