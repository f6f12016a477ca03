mod persistence;

#[cfg(test)]
mod tests;

use std::path::PathBuf;
use std::sync::Arc;

use alloy_primitives::{Address, B256};
use clap::{Parser, Subcommand};
use futures::StreamExt;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use govlock_decode::{
    cancel_request, execute_request, multisig_submit_request, PopulatedCall, ADMIN_TIMELOCK,
};
use govlock_stream::{TimelockWatcher, TrackedTransaction, WatcherEvent};

use persistence::{ScanCheckpoint, SqliteDb, TrackedRecord, WatchDb};

/// Save the checkpoint every this many blocks while watching.
const CHECKPOINT_INTERVAL: u64 = 100;

#[derive(Parser)]
#[command(name = "govlock")]
#[command(about = "Decode and track timelocked governance transactions")]
struct Cli {
    /// JSON-RPC endpoint (HTTP or WebSocket URL)
    #[arg(long, env = "RPC_URL")]
    rpc_url: String,

    /// Multisig transaction-service base URL
    #[arg(long, env = "MULTISIG_API")]
    multisig_api: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Follow the timelocks and persist tracked operations
    Watch {
        /// SQLite database path
        #[arg(long, env = "GOVLOCK_DB", default_value = "govlock.db")]
        db: PathBuf,

        /// Backfill from this block; defaults to the stored checkpoint,
        /// or the current head when no checkpoint exists
        #[arg(long, env = "START_BLOCK")]
        from_block: Option<u64>,
    },
    /// Decode the scheduled operation in a transaction
    Decode {
        /// Hash of the transaction that scheduled the operation
        tx_hash: B256,
    },
    /// Query the lifecycle state of an operation
    Status {
        /// 32-byte operation id
        id: B256,

        /// Timelock to query (defaults to the admin timelock)
        #[arg(long)]
        timelock: Option<Address>,
    },
    /// Build the execute call for a scheduled transaction (prints, does
    /// not submit)
    Execute {
        tx_hash: B256,

        /// Wrap the call into the multisig's submitTransaction
        #[arg(long)]
        via_multisig: bool,
    },
    /// Build the cancel call for an operation id (prints, does not
    /// submit)
    Cancel {
        id: B256,

        /// Timelock holding the operation (defaults to the admin timelock)
        #[arg(long)]
        timelock: Option<Address>,

        /// Wrap the call into the multisig's submitTransaction
        #[arg(long)]
        via_multisig: bool,
    },
}

#[derive(Debug, Default, Clone)]
struct WatchStats {
    pub blocks_seen: u64,
    pub schedules_tracked: u64,
    pub cancellations: u64,
}

impl WatchStats {
    pub fn log_stats(&self) {
        info!(
            target: "govlock::watch",
            blocks = %self.blocks_seen,
            schedules = %self.schedules_tracked,
            cancellations = %self.cancellations,
            "watch stats"
        );
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,govlock=debug")),
        )
        .init();

    let cli = Cli::parse();

    let watcher = TimelockWatcher::builder()
        .rpc_url(cli.rpc_url.clone())
        .maybe_multisig_api_url(cli.multisig_api.clone())
        .build()
        .start()?;

    match cli.command {
        Command::Watch { db, from_block } => watch(watcher, &db, from_block).await,
        Command::Decode { tx_hash } => {
            let tracked = watcher.track(tx_hash).await?;
            print_json(&tracked)
        }
        Command::Status { id, timelock } => {
            let timelock = timelock.unwrap_or(ADMIN_TIMELOCK);
            let state = watcher.operation_state(timelock, id).await?;
            println!("{state}");
            Ok(())
        }
        Command::Execute { tx_hash, via_multisig } => {
            let tracked = watcher.track(tx_hash).await?;
            let call = execute_request(&tracked.scheduled);
            print_call(&watcher, call, via_multisig)
        }
        Command::Cancel { id, timelock, via_multisig } => {
            let timelock = timelock.unwrap_or(ADMIN_TIMELOCK);
            let call = cancel_request(timelock, id);
            print_call(&watcher, call, via_multisig)
        }
    }
}

async fn watch(
    watcher: TimelockWatcher,
    db_path: &PathBuf,
    from_block: Option<u64>,
) -> eyre::Result<()> {
    let db = SqliteDb::open(db_path)?;
    let checkpoint = db.load_checkpoint()?;
    let mut stats = WatchStats::default();
    let mut operations_tracked = checkpoint.as_ref().map(|c| c.operations_tracked).unwrap_or(0);

    if let Some(start) = from_block.or(checkpoint.as_ref().map(|c| c.block_number + 1)) {
        let head = watcher.head_block().await?;
        if start <= head {
            info!("backfilling schedules from block {start} to {head}");
            let tracked = watcher.backfill(start, head).await?;
            for t in &tracked {
                db.upsert_tracked(&record_from(t)?)?;
                stats.schedules_tracked += 1;
                operations_tracked += 1;
            }
            info!("backfill complete: {} operations", tracked.len());
        }
    }

    let mut events = watcher.events();
    let watcher = Arc::new(watcher);
    let runner = watcher.clone();
    tokio::spawn(async move {
        if let Err(e) = runner.run().await {
            warn!("watcher stopped: {e}");
        }
    });

    while let Some(event) = events.next().await {
        match event {
            Ok(WatcherEvent::Scheduled(tracked)) => {
                info!(
                    id = %tracked.id,
                    proposer = ?tracked.scheduled.proposer,
                    calls = tracked.scheduled.calls.len(),
                    state = %tracked.state,
                    "scheduled operation tracked"
                );
                db.upsert_tracked(&record_from(&tracked)?)?;
                stats.schedules_tracked += 1;
                operations_tracked += 1;
            }
            Ok(WatcherEvent::StateChange { id, state }) => {
                debug!(id = %id, state = %state, "operation state changed");
                db.set_state(&id.0, &state.to_string())?;
                stats.cancellations += 1;
            }
            Ok(WatcherEvent::NewBlock { number, hash }) => {
                stats.blocks_seen += 1;
                if number % CHECKPOINT_INTERVAL == 0 {
                    let mut cp = ScanCheckpoint::new(number, hash.0);
                    cp.operations_tracked = operations_tracked;
                    db.save_checkpoint(&cp)?;
                    stats.log_stats();
                }
            }
            Err(e) => warn!("watch error: {e}"),
        }
    }

    Ok(())
}

fn record_from(tracked: &TrackedTransaction) -> eyre::Result<TrackedRecord> {
    Ok(TrackedRecord {
        id: tracked.id.0,
        tx_hash: tracked.tx_hash.0,
        block_number: tracked.block_number,
        state: tracked.state.to_string(),
        payload: serde_json::to_string(tracked)?,
    })
}

fn print_call(
    watcher: &TimelockWatcher,
    call: PopulatedCall,
    via_multisig: bool,
) -> eyre::Result<()> {
    let call = if via_multisig {
        multisig_submit_request(watcher.governance().multisig, &call)
    } else {
        call
    };
    print_json(&call)
}

fn print_json<T: serde::Serialize>(value: &T) -> eyre::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
