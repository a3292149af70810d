// crates/flexstake-cli/src/commands/quote.rs
//
// `flexstake quote`: reward a flexible stake accrues over a block span,
// broken down by halving epoch. Staking parameters come from the genesis
// file unless overridden.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use flexstake_core::{AccountId, BlockHeight, LedgerError, Percentage};
use flexstake_ledger::{
    accrued_reward, halving_epoch, split_reward, DifficultyParameters, Flx, StakingConfig,
};

use crate::commands::Context;
use crate::error::CliError;
use crate::output::{format_flx, format_json, format_table, OutputFormat};

/// Arguments for `flexstake quote`.
#[derive(Debug, Args)]
pub struct QuoteCmd {
    /// Staked amount in FLX, e.g. "1000000" or "0.5".
    #[arg(long)]
    pub amount: Flx,

    /// Block the stake was opened at. Defaults to the genesis creation block.
    #[arg(long)]
    pub from: Option<BlockHeight>,

    /// Block to quote at.
    #[arg(long)]
    pub to: BlockHeight,

    /// Share of the reward delegated, 0-100.
    #[arg(long, default_value_t = 0)]
    pub percentage: u8,

    /// Delegate account (label or 0x-hex).
    #[arg(long)]
    pub delegate: Option<AccountId>,

    /// Override the base difficulty.
    #[arg(long)]
    pub difficulty: Option<u64>,

    /// Override the halving interval in blocks.
    #[arg(long)]
    pub halving_blocks: Option<BlockHeight>,
}

#[derive(Debug, Serialize, Tabled)]
pub struct SegmentRow {
    #[tabled(rename = "Epoch")]
    pub epoch: u64,
    #[tabled(rename = "From")]
    pub from: BlockHeight,
    #[tabled(rename = "To")]
    pub to: BlockHeight,
    #[tabled(rename = "Reward")]
    pub reward: Flx,
}

#[derive(Debug, Serialize)]
pub struct QuoteReport {
    pub amount: Flx,
    pub from: BlockHeight,
    pub to: BlockHeight,
    pub params: DifficultyParameters,
    pub segments: Vec<SegmentRow>,
    pub total: Flx,
    pub holder: Flx,
    pub delegate: Option<AccountId>,
    pub delegated: Flx,
}

/// Segments after this many halvings accrue nothing.
const MAX_SEGMENTS: usize = 128;

/// Compute a quote from resolved parameters.
pub fn quote(
    amount: Flx,
    from: BlockHeight,
    to: BlockHeight,
    params: DifficultyParameters,
    delegate: Option<AccountId>,
    percentage: Percentage,
) -> QuoteReport {
    let mut segments = Vec::new();
    let mut cursor = from;
    while cursor < to && segments.len() < MAX_SEGMENTS {
        let epoch = halving_epoch(cursor, &params);
        let boundary = params
            .created_at_block
            .saturating_add((epoch + 1).saturating_mul(params.halving_interval_blocks));
        let end = to.min(boundary);
        segments.push(SegmentRow {
            epoch,
            from: cursor,
            to: end,
            reward: Flx::from_atoms(accrued_reward(amount.atoms, cursor, end, &params)),
        });
        cursor = end;
    }

    let total = accrued_reward(amount.atoms, from, to, &params);
    let split = split_reward(total, delegate, percentage);
    QuoteReport {
        amount,
        from,
        to,
        params,
        segments,
        total: Flx::from_atoms(total),
        holder: Flx::from_atoms(split.reward),
        delegate: split.delegate,
        delegated: Flx::from_atoms(split.reward_delegated),
    }
}

fn resolve_params(ctx: &Context, cmd: &QuoteCmd) -> Result<DifficultyParameters, LedgerError> {
    let staking = ctx.genesis.staking.clone().unwrap_or_default();
    let StakingConfig {
        difficulty,
        halving_blocks,
    } = staking;
    let difficulty = cmd.difficulty.unwrap_or(difficulty);
    let halving_blocks = cmd.halving_blocks.unwrap_or(halving_blocks);
    if difficulty == 0 || halving_blocks == 0 {
        return Err(LedgerError::InvalidDifficulty(
            "difficulty and halving interval must be greater than zero".to_string(),
        ));
    }
    Ok(DifficultyParameters {
        base_difficulty: difficulty as u128,
        halving_interval_blocks: halving_blocks,
        created_at_block: ctx.genesis.creation_block,
    })
}

/// Run the quote subcommand.
pub fn run(ctx: &Context, cmd: &QuoteCmd) -> Result<(), CliError> {
    let params = resolve_params(ctx, cmd)?;
    let percentage = Percentage::new(cmd.percentage)?;
    let from = cmd.from.unwrap_or(ctx.genesis.creation_block);
    if cmd.percentage > 0 && cmd.delegate.is_none() {
        return Err(CliError::Usage(
            "--percentage needs a --delegate to receive the delegated share".to_string(),
        ));
    }

    let report = quote(cmd.amount, from, cmd.to, params, cmd.delegate, percentage);
    match ctx.format {
        OutputFormat::Json => println!("{}", format_json(&report)),
        OutputFormat::Table => {
            println!(
                "Flexible stake of {} over blocks [{}, {})",
                format_flx(report.amount.atoms),
                report.from,
                report.to
            );
            println!(
                "Difficulty {}  |  Halving every {} blocks from block {}",
                params.base_difficulty, params.halving_interval_blocks, params.created_at_block
            );
            println!();
            println!("{}", format_table(&report.segments));
            println!();
            println!("  Total reward:  {}", format_flx(report.total.atoms));
            println!("  Holder:        {}", format_flx(report.holder.atoms));
            if let Some(delegate) = report.delegate {
                println!(
                    "  Delegate:      {} to {} ({})",
                    format_flx(report.delegated.atoms),
                    delegate.short(),
                    percentage
                );
            }
        }
    }

    Ok(())
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

    #[test]
    fn test_one_year_quote() {
        let report = quote(
            Flx::from_whole(1_000_000),
            0,
            365,
            params(),
            None,
            Percentage::ZERO,
        );
        assert_eq!(report.segments.len(), 1);
        assert_eq!(report.total.atoms / ATOMS_PER_FLX, 1_520_833);
        assert_eq!(report.holder, report.total);
    }

    #[test]
    fn test_segments_split_at_halving() {
        let delegate = AccountId::from_label("d");
        let report = quote(
            Flx::from_whole(1_000_000),
            300,
            800,
            params(),
            Some(delegate),
            Percentage::new(30).unwrap(),
        );
        let bounds: Vec<(u64, u64, u64)> =
            report.segments.iter().map(|s| (s.epoch, s.from, s.to)).collect();
        assert_eq!(bounds, vec![(0, 300, 365), (1, 365, 730), (2, 730, 800)]);

        let sum: u128 = report.segments.iter().map(|s| s.reward.atoms).sum();
        assert_eq!(sum, report.total.atoms);
        assert_eq!(
            report.holder.atoms + report.delegated.atoms,
            report.total.atoms
        );
    }
}
