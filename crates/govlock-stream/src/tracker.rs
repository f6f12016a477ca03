//! Lifecycle status tracking for scheduled operations.
//!
//! The timelock answers three boolean predicates per operation id. The
//! probes are independent and issued concurrently; interpretation happens
//! only once all three results are in, with the fixed precedence from
//! `govlock_decode::LifecycleState`. A failed read yields no state at all.

use std::sync::Arc;

use alloy_primitives::Address;
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use thiserror::Error;

use govlock_decode::abi::Timelock;
use govlock_decode::{LifecycleState, OperationId};

use crate::rpc::EthRpcClient;

/// A lifecycle status read failed; the operation's state is unknown.
#[derive(Debug, Error)]
pub enum LifecycleQueryError {
    /// The underlying read call failed.
    #[error("status read failed: {0}")]
    Read(String),

    /// The call returned, but not a boolean.
    #[error("malformed status response: {0}")]
    Response(String),
}

/// The timelock's three status predicates.
#[async_trait]
pub trait TimelockReader: Send + Sync {
    async fn is_operation_done(&self, id: OperationId) -> Result<bool, LifecycleQueryError>;
    async fn is_operation_ready(&self, id: OperationId) -> Result<bool, LifecycleQueryError>;
    async fn is_operation_pending(&self, id: OperationId) -> Result<bool, LifecycleQueryError>;
}

/// Status predicates answered over JSON-RPC `eth_call`.
pub struct RpcTimelockReader {
    client: Arc<EthRpcClient>,
    timelock: Address,
}

impl RpcTimelockReader {
    pub fn new(client: Arc<EthRpcClient>, timelock: Address) -> Self {
        Self { client, timelock }
    }

    async fn read(&self, data: Vec<u8>) -> Result<Vec<u8>, LifecycleQueryError> {
        self.client
            .call(self.timelock, &data)
            .await
            .map(|bytes| bytes.to_vec())
            .map_err(|e| LifecycleQueryError::Read(e.to_string()))
    }
}

#[async_trait]
impl TimelockReader for RpcTimelockReader {
    async fn is_operation_done(&self, id: OperationId) -> Result<bool, LifecycleQueryError> {
        let ret = self.read(Timelock::isOperationDoneCall { id }.abi_encode()).await?;
        Timelock::isOperationDoneCall::abi_decode_returns(&ret, true)
            .map(|r| r._0)
            .map_err(|e| LifecycleQueryError::Response(e.to_string()))
    }

    async fn is_operation_ready(&self, id: OperationId) -> Result<bool, LifecycleQueryError> {
        let ret = self.read(Timelock::isOperationReadyCall { id }.abi_encode()).await?;
        Timelock::isOperationReadyCall::abi_decode_returns(&ret, true)
            .map(|r| r._0)
            .map_err(|e| LifecycleQueryError::Response(e.to_string()))
    }

    async fn is_operation_pending(&self, id: OperationId) -> Result<bool, LifecycleQueryError> {
        let ret = self.read(Timelock::isOperationPendingCall { id }.abi_encode()).await?;
        Timelock::isOperationPendingCall::abi_decode_returns(&ret, true)
            .map(|r| r._0)
            .map_err(|e| LifecycleQueryError::Response(e.to_string()))
    }
}

/// Resolve the current lifecycle state of an operation.
///
/// The three probes run concurrently; any failure propagates before a
/// state is determined.
pub async fn current_state<R>(
    reader: &R,
    id: OperationId,
) -> Result<LifecycleState, LifecycleQueryError>
where
    R: TimelockReader + ?Sized,
{
    let (done, ready, pending) = tokio::try_join!(
        reader.is_operation_done(id),
        reader.is_operation_ready(id),
        reader.is_operation_pending(id),
    )?;
    Ok(LifecycleState::from_flags(done, ready, pending))
}
