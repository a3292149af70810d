// crates/flexstake-ledger/src/oracle.rs

use flexstake_core::{BlockHeight, BlockOracle};

/// Block oracle advanced by hand, for replays and tests.
///
/// Heights only move forward: `advance_to` ignores lower targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManualBlockOracle {
    height: BlockHeight,
}

impl ManualBlockOracle {
    pub fn new(height: BlockHeight) -> Self {
        Self { height }
    }

    pub fn advance_to(&mut self, height: BlockHeight) -> BlockHeight {
        self.height = self.height.max(height);
        self.height
    }

    pub fn advance(&mut self, blocks: BlockHeight) -> BlockHeight {
        self.height = self.height.saturating_add(blocks);
        self.height
    }
}

impl BlockOracle for ManualBlockOracle {
    fn current_block(&self) -> BlockHeight {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_moves_backwards() {
        let mut oracle = ManualBlockOracle::new(10);
        assert_eq!(oracle.advance(5), 15);
        assert_eq!(oracle.advance_to(12), 15);
        assert_eq!(oracle.advance_to(20), 20);
        assert_eq!(oracle.current_block(), 20);
    }
}
