//! Error types for the watch layer.

use thiserror::Error;

use govlock_decode::DecodeError;

use crate::multisig::MultisigApiError;
use crate::tracker::LifecycleQueryError;

/// Errors that can occur while following and decoding scheduled
/// transactions.
#[derive(Debug, Error)]
pub enum WatchError {
    /// WebSocket connection or communication error.
    #[error("websocket error: {0}")]
    WebSocket(String),

    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(String),

    /// JSON-RPC level error response.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Response missing an expected field or of the wrong shape.
    #[error("malformed response: {0}")]
    Response(String),

    /// Transaction lookup returned nothing.
    #[error("transaction not found: {0}")]
    TxNotFound(alloy_primitives::B256),

    /// Reconstruction or call decoding failed.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// A lifecycle status read failed.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleQueryError),

    /// Owner lookup against the multisig service failed.
    #[error("multisig API error: {0}")]
    MultisigApi(#[from] MultisigApiError),

    /// Stream ended unexpectedly.
    #[error("stream ended unexpectedly")]
    StreamEnded,

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<reqwest::Error> for WatchError {
    fn from(e: reqwest::Error) -> Self {
        WatchError::Http(e.to_string())
    }
}

impl From<serde_json::Error> for WatchError {
    fn from(e: serde_json::Error) -> Self {
        WatchError::Json(e.to_string())
    }
}
