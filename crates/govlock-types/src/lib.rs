//! Shared types for the govlock crate family.

use serde::{Deserialize, Serialize};

/// Checkpoint of scan progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanCheckpoint {
    /// Last fully scanned block number.
    pub block_number: u64,
    /// Last fully scanned block hash.
    pub block_hash: [u8; 32],
    /// Number of operations tracked so far (for stats).
    pub operations_tracked: u64,
    /// Timestamp of this checkpoint.
    pub timestamp: u64,
}

impl ScanCheckpoint {
    pub fn new(block_number: u64, block_hash: [u8; 32]) -> Self {
        Self {
            block_number,
            block_hash,
            operations_tracked: 0,
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
        }
    }
}

/// Persisted record of a tracked operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedRecord {
    /// 32-byte operation id.
    pub id: [u8; 32],
    /// Hash of the transaction that scheduled it.
    pub tx_hash: [u8; 32],
    /// Block the schedule transaction was included in.
    pub block_number: u64,
    /// Last observed lifecycle state.
    pub state: String,
    /// Reconstructed operation, serialized as JSON for display layers.
    pub payload: String,
}
