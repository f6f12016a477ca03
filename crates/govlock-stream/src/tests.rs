//! Tests for the watch layer.

use alloy_primitives::{Address, Bytes, B256};
use alloy_sol_types::SolEvent;
use async_trait::async_trait;

use govlock_decode::abi::Timelock;
use govlock_decode::{LifecycleState, OperationId};

use super::follower::{parse_new_head, scheduled_log_from};
use super::rpc::LogEntry;
use super::tracker::{current_state, LifecycleQueryError, TimelockReader};

fn hash(n: u8) -> B256 {
    let mut bytes = [0u8; 32];
    bytes[0] = n;
    B256::from(bytes)
}

// =============================================================================
// Lifecycle tracker tests
// =============================================================================

/// Reader answering from fixed flags; a `None` flag fails the read.
struct FixedReader {
    done: Option<bool>,
    ready: Option<bool>,
    pending: Option<bool>,
}

impl FixedReader {
    fn answering(done: bool, ready: bool, pending: bool) -> Self {
        Self { done: Some(done), ready: Some(ready), pending: Some(pending) }
    }
}

#[async_trait]
impl TimelockReader for FixedReader {
    async fn is_operation_done(&self, _id: OperationId) -> Result<bool, LifecycleQueryError> {
        self.done.ok_or_else(|| LifecycleQueryError::Read("done read failed".to_string()))
    }

    async fn is_operation_ready(&self, _id: OperationId) -> Result<bool, LifecycleQueryError> {
        self.ready.ok_or_else(|| LifecycleQueryError::Read("ready read failed".to_string()))
    }

    async fn is_operation_pending(&self, _id: OperationId) -> Result<bool, LifecycleQueryError> {
        self.pending.ok_or_else(|| LifecycleQueryError::Read("pending read failed".to_string()))
    }
}

#[tokio::test]
async fn test_current_state_precedence() {
    // Contradictory flags: done wins.
    let reader = FixedReader::answering(true, true, true);
    let state = current_state(&reader, hash(1)).await.unwrap();
    assert_eq!(state, LifecycleState::Done);

    let reader = FixedReader::answering(false, true, true);
    let state = current_state(&reader, hash(1)).await.unwrap();
    assert_eq!(state, LifecycleState::Ready);
}

#[tokio::test]
async fn test_current_state_canceled_when_nothing_claims_it() {
    let reader = FixedReader::answering(false, false, false);
    let state = current_state(&reader, hash(1)).await.unwrap();
    assert_eq!(state, LifecycleState::Canceled);
}

#[tokio::test]
async fn test_read_failure_yields_no_state() {
    // One failing probe is enough: no state may be guessed.
    let reader = FixedReader { done: Some(false), ready: None, pending: Some(true) };
    let err = current_state(&reader, hash(1)).await.unwrap_err();
    assert!(matches!(err, LifecycleQueryError::Read(_)));
}

// =============================================================================
// Follower parsing tests
// =============================================================================

fn scheduled_entry(id: B256, index: u64) -> LogEntry {
    let mut index_word = [0u8; 32];
    index_word[24..].copy_from_slice(&index.to_be_bytes());
    LogEntry {
        address: Address::repeat_byte(0x01),
        topics: vec![
            Timelock::CallScheduled::SIGNATURE_HASH,
            id,
            B256::from(index_word),
        ],
        data: Bytes::new(),
        block_number: 123,
        tx_hash: hash(0xab),
    }
}

#[test]
fn test_scheduled_log_parsing() {
    let entry = scheduled_entry(hash(0x42), 3);

    let log = scheduled_log_from(&entry).unwrap();
    assert_eq!(log.id, hash(0x42));
    assert_eq!(log.index, 3);
    assert_eq!(log.tx_hash, hash(0xab));
    assert_eq!(log.block_number, 123);
}

#[test]
fn test_scheduled_log_requires_indexed_topics() {
    let mut entry = scheduled_entry(hash(0x42), 0);
    entry.topics.truncate(2); // drop the index topic

    assert!(scheduled_log_from(&entry).is_none());

    entry.topics.truncate(1); // only the signature left
    assert!(scheduled_log_from(&entry).is_none());
}

#[test]
fn test_parse_new_head() {
    let msg = serde_json::json!({
        "jsonrpc": "2.0",
        "method": "eth_subscription",
        "params": {
            "subscription": "0x9ce59a13059e417087c02d3236a0b1cc",
            "result": {
                "number": "0x1b4",
                "hash": "0x4200000000000000000000000000000000000000000000000000000000000000",
            }
        }
    });

    let (number, block_hash) = parse_new_head(&msg).unwrap();
    assert_eq!(number, 0x1b4);
    assert_eq!(block_hash, hash(0x42));
}

#[test]
fn test_parse_new_head_ignores_other_messages() {
    let ack = serde_json::json!({ "jsonrpc": "2.0", "id": 1, "result": "0xabc" });
    assert!(parse_new_head(&ack).is_none());
}
