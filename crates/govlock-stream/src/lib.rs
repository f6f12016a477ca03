//! Async watch layer over timelocked governance transactions.
//!
//! This crate feeds the pure decoding core with on-chain data:
//! - Following new blocks via WebSocket subscription
//! - Fetching `CallScheduled`/`Cancelled` logs and raw transactions
//! - Resolving operation lifecycle states from the timelock's status
//!   predicates
//! - Looking up the multisig owner set over HTTP
//!
//! # Quick Start
//!
//! ```ignore
//! use futures::StreamExt;
//! use govlock_stream::{run_watcher, WatcherEvent};
//!
//! // Follow the mainnet deployment
//! let watcher = run_watcher("wss://eth.example.com")?;
//!
//! let mut events = watcher.events();
//! tokio::spawn(async move { watcher.run().await });
//!
//! while let Some(event) = events.next().await {
//!     match event? {
//!         WatcherEvent::Scheduled(tx) => println!("scheduled {}", tx.id),
//!         WatcherEvent::StateChange { id, state } => println!("{id} -> {state}"),
//!         WatcherEvent::NewBlock { number, .. } => println!("block {number}"),
//!     }
//! }
//! ```
//!
//! # Custom Configuration
//!
//! ```ignore
//! use govlock_stream::TimelockWatcher;
//!
//! let watcher = TimelockWatcher::builder()
//!     .rpc_url("wss://custom-node.com".to_string())
//!     .decode_cache_capacity(512)
//!     .backfill_chunk(2_000)
//!     .build()    // Returns TimelockWatcherConfig
//!     .start()?;  // Builds the watcher
//! ```

mod error;
mod follower;
mod multisig;
mod rpc;
mod tracker;
mod watcher;

#[cfg(test)]
mod tests;

pub use error::WatchError;
pub use follower::{ScheduleEvent, ScheduleFollower, ScheduledLog};
pub use multisig::{MultisigApi, MultisigApiError, DEFAULT_MULTISIG_API};
pub use rpc::{EthRpcClient, FetchedTransaction, LogEntry};
pub use tracker::{current_state, LifecycleQueryError, RpcTimelockReader, TimelockReader};
pub use watcher::{TimelockWatcher, TimelockWatcherConfig, TrackedTransaction, WatcherEvent};

/// Build a watcher for the mainnet deployment with default settings.
///
/// The returned watcher still needs `run()` driven and `events()`
/// consumed by the caller.
pub fn run_watcher(rpc_url: impl Into<String>) -> Result<TimelockWatcher, WatchError> {
    TimelockWatcher::builder().rpc_url(rpc_url.into()).build().start()
}
