//! Watcher orchestrating follow → fetch → reconstruct → classify.

use std::{pin::Pin, sync::Arc};

use alloy_primitives::{Address, B256};
use bon::Builder;
use futures::{stream::Stream, StreamExt};
use schnellru::{ByLength, LruMap};
use tokio::sync::{broadcast, RwLock};

use govlock_decode::{
    decode_call, reconstruct, ContractRegistry, DecodedCall, GovernanceConfig, LifecycleState,
    OperationId, ScheduledTransaction,
};

use super::{
    follower::{ScheduleEvent, ScheduleFollower, ScheduledLog},
    multisig::{MultisigApi, DEFAULT_MULTISIG_API},
    rpc::EthRpcClient,
    tracker::{current_state, RpcTimelockReader},
    WatchError,
};

/// Events emitted by the watcher.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WatcherEvent {
    /// A scheduled operation was reconstructed and classified.
    Scheduled(TrackedTransaction),
    /// An operation's lifecycle state changed.
    StateChange {
        id: OperationId,
        state: LifecycleState,
    },
    /// New block observed.
    NewBlock { number: u64, hash: B256 },
}

/// A scheduled operation with everything the display layer needs.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TrackedTransaction {
    pub id: OperationId,
    pub tx_hash: B256,
    pub block_number: u64,
    pub scheduled: ScheduledTransaction,
    /// Registry decode of each leaf payload, independently: a leaf that
    /// fails to decode stays `None` without discarding its siblings.
    pub decoded: Vec<Option<DecodedCall>>,
    pub state: LifecycleState,
}

/// Builder for TimelockWatcher.
#[derive(Builder)]
pub struct TimelockWatcherConfig {
    /// JSON-RPC endpoint (HTTP or WebSocket URL).
    rpc_url: String,

    /// Multisig transaction-service base URL.
    #[builder(default = DEFAULT_MULTISIG_API.to_string())]
    multisig_api_url: String,

    /// Deployment addresses.
    #[builder(default = GovernanceConfig::mainnet())]
    governance: GovernanceConfig,

    /// Reconstructed-transaction cache capacity.
    #[builder(default = 256)]
    decode_cache_capacity: u32,

    /// Block span per backfill `eth_getLogs` request.
    #[builder(default = 5_000)]
    backfill_chunk: u64,
}

impl TimelockWatcherConfig {
    /// Build the watcher from this config.
    pub fn start(self) -> Result<TimelockWatcher, WatchError> {
        TimelockWatcher::from_config(self)
    }
}

/// Follows the timelocks and exposes reconstructed, classified scheduled
/// operations as a broadcast event stream.
pub struct TimelockWatcher {
    governance: GovernanceConfig,
    registry: ContractRegistry,
    rpc: Arc<EthRpcClient>,
    follower: ScheduleFollower,
    multisig_api: MultisigApi,
    backfill_chunk: u64,
    cache: Arc<RwLock<LruMap<B256, TrackedTransaction, ByLength>>>,
    event_tx: broadcast::Sender<WatcherEvent>,
}

impl TimelockWatcher {
    /// Create a watcher builder.
    pub fn builder() -> TimelockWatcherConfigBuilder {
        TimelockWatcherConfig::builder()
    }

    /// Build a new watcher from config.
    pub fn from_config(config: TimelockWatcherConfig) -> Result<Self, WatchError> {
        let registry =
            ContractRegistry::known().map_err(|e| WatchError::Config(e.to_string()))?;
        let rpc = Arc::new(EthRpcClient::new(&config.rpc_url));
        let follower =
            ScheduleFollower::new(config.rpc_url.clone(), rpc.clone(), &config.governance);
        let multisig_api = MultisigApi::new(&config.multisig_api_url);
        let (event_tx, _) = broadcast::channel(1024);

        Ok(Self {
            governance: config.governance,
            registry,
            rpc,
            follower,
            multisig_api,
            backfill_chunk: config.backfill_chunk,
            cache: Arc::new(RwLock::new(LruMap::new(ByLength::new(
                config.decode_cache_capacity,
            )))),
            event_tx,
        })
    }

    /// Stream watcher events.
    pub fn events(
        &self,
    ) -> Pin<Box<dyn Stream<Item = Result<WatcherEvent, WatchError>> + Send>> {
        let mut rx = self.event_tx.subscribe();
        Box::pin(async_stream::stream! {
            loop {
                match rx.recv().await {
                    Ok(event) => yield Ok(event),
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
        })
    }

    /// The deployment this watcher follows.
    pub fn governance(&self) -> &GovernanceConfig {
        &self.governance
    }

    /// Current head block number.
    pub async fn head_block(&self) -> Result<u64, WatchError> {
        self.rpc.block_number().await
    }

    /// Owner set of the governance multisig.
    pub async fn owners(&self) -> Result<Vec<Address>, WatchError> {
        Ok(self.multisig_api.owners(self.governance.multisig).await?)
    }

    /// Whether `account` may operate the timelock through the multisig.
    pub async fn can_operate(&self, account: Address) -> Result<bool, WatchError> {
        Ok(self
            .multisig_api
            .is_owner(self.governance.multisig, account)
            .await?)
    }

    /// Current lifecycle state of an operation on a given timelock.
    pub async fn operation_state(
        &self,
        timelock: Address,
        id: OperationId,
    ) -> Result<LifecycleState, WatchError> {
        let reader = RpcTimelockReader::new(self.rpc.clone(), timelock);
        Ok(current_state(&reader, id).await?)
    }

    /// Reconstruct, decode, and classify the scheduled operation in a
    /// transaction. Cached by transaction hash.
    pub async fn track(&self, tx_hash: B256) -> Result<TrackedTransaction, WatchError> {
        {
            let mut cache = self.cache.write().await;
            if let Some(tracked) = cache.get(&tx_hash) {
                return Ok(tracked.clone());
            }
        }

        let fetched = self.rpc.get_transaction(tx_hash).await?;
        let scheduled = reconstruct(&fetched.raw, &self.governance)?;

        let decoded = scheduled
            .calls
            .iter()
            .map(|leaf| {
                match decode_call(leaf.target, &leaf.payload, leaf.value, &self.registry) {
                    Ok(call) => Some(call),
                    Err(e) => {
                        tracing::debug!(
                            "undecodable leaf payload in {}: {} | raw: 0x{}",
                            tx_hash,
                            e,
                            hex::encode(&leaf.payload[..leaf.payload.len().min(100)])
                        );
                        None
                    }
                }
            })
            .collect();

        let id = scheduled.operation_id();
        let state = self.operation_state(scheduled.timelock, id).await?;

        let tracked = TrackedTransaction {
            id,
            tx_hash,
            block_number: fetched.block_number.unwrap_or_default(),
            scheduled,
            decoded,
            state,
        };

        {
            let mut cache = self.cache.write().await;
            cache.insert(tx_hash, tracked.clone());
        }

        Ok(tracked)
    }

    /// Track every schedule in an inclusive historical block range.
    ///
    /// Transactions that fail to reconstruct are skipped, not fatal.
    pub async fn backfill(
        &self,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<TrackedTransaction>, WatchError> {
        let logs = self
            .follower
            .backfill(from_block, to_block, self.backfill_chunk)
            .await?;

        let mut tracked = Vec::new();
        for log in logs {
            match self.track_log(&log).await {
                Ok(Some(t)) => tracked.push(t),
                Ok(None) => {} // duplicate leaf of an already-tracked batch
                Err(WatchError::Decode(e)) => {
                    tracing::debug!("skipping undecodable schedule tx {}: {}", log.tx_hash, e);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(tracked)
    }

    /// Run the watcher main loop: follow new blocks, track fresh
    /// schedules, surface cancellations.
    pub async fn run(&self) -> Result<(), WatchError> {
        let mut events = self.follower.subscribe().await?;

        while let Some(event) = events.next().await {
            match event {
                Ok(ScheduleEvent::NewBlock { number, hash }) => {
                    let _ = self.event_tx.send(WatcherEvent::NewBlock { number, hash });
                }
                Ok(ScheduleEvent::Scheduled(log)) => match self.track_log(&log).await {
                    Ok(Some(tracked)) => {
                        let _ = self.event_tx.send(WatcherEvent::Scheduled(tracked));
                    }
                    Ok(None) => {}
                    Err(WatchError::Decode(e)) => {
                        tracing::debug!(
                            "skipping undecodable schedule tx {}: {}",
                            log.tx_hash,
                            e
                        );
                    }
                    Err(e) => {
                        tracing::warn!("failed to track schedule tx {}: {}", log.tx_hash, e);
                    }
                },
                Ok(ScheduleEvent::Cancelled { id, .. }) => {
                    self.mark_canceled(id).await;
                    let _ = self.event_tx.send(WatcherEvent::StateChange {
                        id,
                        state: LifecycleState::Canceled,
                    });
                }
                Err(e) => {
                    tracing::warn!("follower error: {}", e);
                }
            }
        }

        Err(WatchError::StreamEnded)
    }

    /// Track the transaction behind a schedule log; `None` when the log
    /// is another leaf of an operation already in the cache.
    async fn track_log(&self, log: &ScheduledLog) -> Result<Option<TrackedTransaction>, WatchError> {
        {
            let mut cache = self.cache.write().await;
            if let Some(existing) = cache.get(&log.tx_hash) {
                if existing.id == log.id {
                    return Ok(None);
                }
            }
        }
        self.track(log.tx_hash).await.map(Some)
    }

    async fn mark_canceled(&self, id: OperationId) {
        let mut cache = self.cache.write().await;
        let hashes: Vec<B256> = cache
            .iter()
            .filter(|(_, tracked)| tracked.id == id)
            .map(|(hash, _)| *hash)
            .collect();
        for hash in hashes {
            if let Some(tracked) = cache.peek_mut(&hash) {
                tracked.state = LifecycleState::Canceled;
            }
        }
    }
}
