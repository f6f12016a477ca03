//! Schedule log follower via WebSocket subscription.
//!
//! Subscribes to `newHeads` and, for each new block, pulls the timelocks'
//! `CallScheduled` and `Cancelled` logs over HTTP. Historical ranges are
//! covered by chunked backfill.

use std::pin::Pin;
use std::sync::Arc;

use alloy_primitives::{Address, B256};
use alloy_sol_types::SolEvent;
use futures::{stream::Stream, SinkExt, StreamExt};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use govlock_decode::abi::Timelock;
use govlock_decode::{GovernanceConfig, OperationId};

use crate::rpc::{EthRpcClient, LogEntry};
use crate::WatchError;

/// Events emitted by the schedule follower.
#[derive(Debug, Clone)]
pub enum ScheduleEvent {
    /// New block header received.
    NewBlock { number: u64, hash: B256 },
    /// A `CallScheduled` log. Batch schedules emit one log per leaf with
    /// the same id; consumers dedup by `(tx_hash, id)`.
    Scheduled(ScheduledLog),
    /// A `Cancelled` log.
    Cancelled { id: OperationId, block_number: u64 },
}

/// The identity tuple of a schedule log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledLog {
    pub id: OperationId,
    /// Leaf index within the operation.
    pub index: u64,
    pub tx_hash: B256,
    pub block_number: u64,
}

/// Follows new blocks via WebSocket and surfaces timelock schedule logs.
pub struct ScheduleFollower {
    ws_url: String,
    rpc: Arc<EthRpcClient>,
    /// Contracts whose logs are followed: the admin timelock and the
    /// workers' union.
    timelocks: Vec<Address>,
}

impl ScheduleFollower {
    /// Create a follower for the deployment in `config`.
    ///
    /// Automatically converts `https://` to `wss://` and `http://` to
    /// `ws://` for the subscription leg.
    pub fn new(url: impl Into<String>, rpc: Arc<EthRpcClient>, config: &GovernanceConfig) -> Self {
        let url = url.into();
        let ws_url = url.replace("https://", "wss://").replace("http://", "ws://");
        Self {
            ws_url,
            rpc,
            timelocks: vec![config.admin_timelock, config.workers_union],
        }
    }

    /// Subscribe to schedule events from new blocks onward.
    pub async fn subscribe(
        &self,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<ScheduleEvent, WatchError>> + Send>>, WatchError>
    {
        let (tx, rx) = mpsc::channel(256);
        let ws_url = self.ws_url.clone();
        let rpc = self.rpc.clone();
        let timelocks = self.timelocks.clone();

        tokio::spawn(async move {
            if let Err(e) = run_subscription(ws_url, rpc, timelocks, tx).await {
                tracing::error!("schedule follower error: {}", e);
            }
        });

        Ok(Box::pin(tokio_stream::wrappers::ReceiverStream::new(rx)))
    }

    /// Collect historical schedule logs over an inclusive block range,
    /// in chunks of `chunk` blocks.
    pub async fn backfill(
        &self,
        from_block: u64,
        to_block: u64,
        chunk: u64,
    ) -> Result<Vec<ScheduledLog>, WatchError> {
        let chunk = chunk.max(1);
        let mut logs = Vec::new();
        let mut start = from_block;

        while start <= to_block {
            let end = to_block.min(start + chunk - 1);
            for timelock in &self.timelocks {
                let entries = self
                    .rpc
                    .get_logs(*timelock, Timelock::CallScheduled::SIGNATURE_HASH, start, end)
                    .await?;
                logs.extend(entries.iter().filter_map(scheduled_log_from));
            }
            start = end + 1;
        }

        logs.sort_by_key(|l| l.block_number);
        Ok(logs)
    }
}

async fn run_subscription(
    ws_url: String,
    rpc: Arc<EthRpcClient>,
    timelocks: Vec<Address>,
    tx: mpsc::Sender<Result<ScheduleEvent, WatchError>>,
) -> Result<(), WatchError> {
    let (ws_stream, _) =
        connect_async(&ws_url).await.map_err(|e| WatchError::WebSocket(e.to_string()))?;

    let (mut write, mut read) = ws_stream.split();

    // Subscribe to newHeads
    let subscribe_msg = serde_json::json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "eth_subscribe",
        "params": ["newHeads"]
    });

    write
        .send(Message::Text(subscribe_msg.to_string().into()))
        .await
        .map_err(|e| WatchError::WebSocket(e.to_string()))?;

    while let Some(msg) = read.next().await {
        let msg = match msg {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                let _ = tx.send(Err(WatchError::WebSocket(e.to_string()))).await;
                break;
            }
        };

        let parsed: Value = match serde_json::from_str(&msg) {
            Ok(v) => v,
            Err(_) => continue,
        };

        let Some((number, hash)) = parse_new_head(&parsed) else {
            continue;
        };

        if tx.send(Ok(ScheduleEvent::NewBlock { number, hash })).await.is_err() {
            break;
        }

        for timelock in &timelocks {
            match rpc
                .get_logs(*timelock, Timelock::CallScheduled::SIGNATURE_HASH, number, number)
                .await
            {
                Ok(entries) => {
                    for log in entries.iter().filter_map(scheduled_log_from) {
                        if tx.send(Ok(ScheduleEvent::Scheduled(log))).await.is_err() {
                            return Ok(());
                        }
                    }
                }
                Err(e) => {
                    let _ = tx.send(Err(e)).await;
                }
            }

            match rpc
                .get_logs(*timelock, Timelock::Cancelled::SIGNATURE_HASH, number, number)
                .await
            {
                Ok(entries) => {
                    for entry in &entries {
                        let Some(id) = entry.topics.get(1).copied() else {
                            continue;
                        };
                        let event = ScheduleEvent::Cancelled {
                            id,
                            block_number: entry.block_number,
                        };
                        if tx.send(Ok(event)).await.is_err() {
                            return Ok(());
                        }
                    }
                }
                Err(e) => {
                    let _ = tx.send(Err(e)).await;
                }
            }
        }
    }

    Ok(())
}

/// Extract `(number, hash)` from a `newHeads` notification.
pub(crate) fn parse_new_head(msg: &Value) -> Option<(u64, B256)> {
    let header = msg.get("params")?.get("result")?;
    let number = header
        .get("number")?
        .as_str()
        .and_then(|s| u64::from_str_radix(s.trim_start_matches("0x"), 16).ok())?;
    let hash = header.get("hash")?.as_str()?.parse::<B256>().ok()?;
    Some((number, hash))
}

/// Reduce a `CallScheduled` log to its identity tuple.
///
/// `id` and the leaf index are indexed topics; the remaining fields live
/// in the log data and are recovered from the raw transaction instead.
pub(crate) fn scheduled_log_from(entry: &LogEntry) -> Option<ScheduledLog> {
    let id = entry.topics.get(1).copied()?;
    let index_word = entry.topics.get(2)?;
    let index = u64::from_be_bytes(index_word[24..32].try_into().ok()?);
    Some(ScheduledLog {
        id,
        index,
        tx_hash: entry.tx_hash,
        block_number: entry.block_number,
    })
}
