// crates/flexstake-cli/src/commands/replay.rs
//
// `flexstake replay <script>`: run a JSON transaction script against the
// genesis ledger and report receipts, final balances and committed events.
//
// Script format: an array of steps, executed in order.
//   [
//     {"block": 1, "caller": "treasury", "tx": {"transfer": {"to": "alice", "amount": "1000000"}}},
//     {"block": 1, "caller": "alice", "tx": {"stake": {"delegate_to": "bob", "percentage": 30}}},
//     {"block": 366, "caller": "alice", "tx": "unstake"}
//   ]
//
// A failed step is recorded and the replay continues, unless --fail-fast.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use serde::{Deserialize, Serialize};
use tabled::Tabled;
use tracing::{info, warn};

use flexstake_core::{AccountId, BlockHeight, LedgerEvent};
use flexstake_ledger::{EventLog, Flx, GenesisConfig, Ledger, Outcome, TracingSink, Transaction};

use crate::commands::Context;
use crate::error::CliError;
use crate::output::{format_flx, format_json, format_table, OutputFormat};

/// Arguments for `flexstake replay`.
#[derive(Debug, Args)]
pub struct ReplayCmd {
    /// JSON transaction script.
    pub script: PathBuf,

    /// Abort at the first failed step.
    #[arg(long)]
    pub fail_fast: bool,

    /// Write the final ledger state as JSON to this file.
    #[arg(long)]
    pub state_out: Option<PathBuf>,
}

/// One scripted transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    pub block: BlockHeight,
    pub caller: AccountId,
    pub tx: Transaction,
}

#[derive(Debug, Serialize, Tabled)]
pub struct ReceiptRow {
    #[tabled(rename = "#")]
    pub step: usize,
    #[tabled(rename = "Block")]
    pub block: BlockHeight,
    #[tabled(rename = "Caller")]
    pub caller: String,
    #[tabled(rename = "Transaction")]
    pub tx: String,
    #[tabled(rename = "Result")]
    pub result: String,
    #[tabled(skip)]
    pub ok: bool,
}

#[derive(Debug, Serialize, Tabled)]
struct BalanceRow {
    #[tabled(rename = "Account")]
    account: String,
    #[tabled(rename = "Balance")]
    balance: String,
    #[tabled(rename = "Staked")]
    staked: String,
    #[tabled(rename = "Delegate")]
    delegate: String,
    #[tabled(rename = "Frozen")]
    frozen: bool,
}

#[derive(Tabled)]
struct EventRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Event")]
    name: &'static str,
    #[tabled(rename = "Detail")]
    detail: String,
}

#[derive(Serialize)]
struct ReplayReport<'a> {
    receipts: &'a [ReceiptRow],
    balances: Vec<BalanceRow>,
    events: &'a [LedgerEvent],
    total_supply: Flx,
    max_supply: Flx,
    last_block: BlockHeight,
}

pub type ReplayLedger = Ledger<TracingSink<EventLog>>;

/// Parse a script file's contents.
pub fn parse_script(text: &str) -> Result<Vec<Step>, CliError> {
    Ok(serde_json::from_str(text)?)
}

/// Build the genesis ledger and run every step against it.
pub fn replay(
    genesis: &GenesisConfig,
    steps: &[Step],
    fail_fast: bool,
) -> Result<(ReplayLedger, Vec<ReceiptRow>), CliError> {
    let mut ledger = genesis.build(TracingSink::new(EventLog::new()))?;
    let mut receipts = Vec::with_capacity(steps.len());

    for (index, step) in steps.iter().enumerate() {
        let step_no = index + 1;
        let result = ledger.apply(&step.caller, &step.tx, step.block);
        let (ok, summary) = match result {
            Ok(Outcome::Done) => (true, "ok".to_string()),
            Ok(Outcome::Reward(quote)) => (
                true,
                format!(
                    "reward {} (+{} delegated)",
                    format_flx(quote.reward),
                    format_flx(quote.reward_delegated)
                ),
            ),
            Ok(Outcome::Wiped(amount)) => (true, format!("wiped {}", format_flx(amount))),
            Err(e) => {
                warn!("Step {} ({}) failed: {}", step_no, step.tx.kind(), e);
                if fail_fast {
                    return Err(CliError::Step {
                        step: step_no,
                        source: e,
                    });
                }
                (false, format!("error: {}", e))
            }
        };
        receipts.push(ReceiptRow {
            step: step_no,
            block: step.block,
            caller: step.caller.short(),
            tx: step.tx.kind().to_string(),
            result: summary,
            ok,
        });
    }

    let failed = receipts.iter().filter(|r| !r.ok).count();
    info!(
        "Replayed {} steps ({} failed), last block {}",
        receipts.len(),
        failed,
        ledger.last_block()
    );
    Ok((ledger, receipts))
}

fn balance_rows(ledger: &ReplayLedger) -> Vec<BalanceRow> {
    ledger
        .state()
        .balances
        .iter()
        .map(|(account, entry)| {
            let stake = ledger.stake_balance(account);
            BalanceRow {
                account: account.short(),
                balance: format_flx(entry.liquid_balance),
                staked: stake
                    .map(|(amount, _, _)| format_flx(amount))
                    .unwrap_or_else(|| "-".to_string()),
                delegate: match stake {
                    Some((_, Some(delegate), pct)) => format!("{} ({})", delegate.short(), pct),
                    _ => "-".to_string(),
                },
                frozen: entry.frozen,
            }
        })
        .collect()
}

/// Run the replay subcommand.
pub fn run(ctx: &Context, cmd: &ReplayCmd) -> Result<(), CliError> {
    let text = fs::read_to_string(&cmd.script)?;
    let steps = parse_script(&text)?;
    let (ledger, receipts) = replay(&ctx.genesis, &steps, cmd.fail_fast)?;

    if let Some(path) = &cmd.state_out {
        fs::write(path, serde_json::to_string_pretty(ledger.state())?)?;
        info!("Ledger state written to {}", path.display());
    }

    let events = ledger.sink().inner().events();
    match ctx.format {
        OutputFormat::Json => {
            let report = ReplayReport {
                receipts: &receipts,
                balances: balance_rows(&ledger),
                events,
                total_supply: Flx::from_atoms(ledger.total_supply()),
                max_supply: Flx::from_atoms(ledger.max_supply()),
                last_block: ledger.last_block(),
            };
            println!("{}", format_json(&report));
        }
        OutputFormat::Table => {
            println!("Receipts");
            println!("{}", format_table(&receipts));
            println!();
            println!("Balances");
            println!("{}", format_table(&balance_rows(&ledger)));
            println!();

            let rows: Vec<EventRow> = events
                .iter()
                .enumerate()
                .map(|(i, event)| EventRow {
                    index: i + 1,
                    name: event.name(),
                    detail: serde_json::to_string(event).unwrap_or_default(),
                })
                .collect();
            println!("Events");
            println!("{}", format_table(&rows));
            println!();
            println!(
                "Total supply: {} / {}  |  Last block: {}",
                format_flx(ledger.total_supply()),
                format_flx(ledger.max_supply()),
                ledger.last_block()
            );
        }
    }

    Ok(())
}
