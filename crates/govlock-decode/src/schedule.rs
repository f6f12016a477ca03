//! Reconstruction of scheduled transactions from raw on-chain calls.
//!
//! A schedule can arrive three ways: directly to the admin timelock,
//! directly to the workers' union (which carries the timelock interface
//! itself), or wrapped exactly once inside the multisig wallet's
//! `submitTransaction`. Deeper wrapping is rejected.

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::SolCall;
use serde::Serialize;

use crate::abi::{hash_operation, hash_operation_batch, MultiSigWallet, Timelock};
use crate::config::{GovernanceConfig, KnownContract};
use crate::decoder::{DecodeError, SELECTOR_LEN};
use crate::lifecycle::OperationId;

/// Maximum call-wrapping depth: the schedule itself, plus at most one
/// multisig envelope around it.
pub const MAX_WRAP_DEPTH: usize = 2;

/// The fields of a raw transaction the reconstructor needs.
#[derive(Debug, Clone, Serialize)]
pub struct RawTransaction {
    /// Recipient; `None` for contract creation.
    pub to: Option<Address>,
    /// Native value sent with the transaction.
    pub value: U256,
    /// Call data.
    pub input: Bytes,
}

/// Classified origin of a scheduled transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Proposer {
    Admin,
    WorkersUnion,
    Unknown,
}

/// One leaf call of a scheduled operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledCall {
    pub target: Address,
    pub value: U256,
    pub payload: Bytes,
}

/// The call set of a scheduled operation. Batch arms hold equal-length
/// argument arrays by construction; the shape is validated before this
/// enum is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduledCalls {
    Single(ScheduledCall),
    Batch(Vec<ScheduledCall>),
}

impl ScheduledCalls {
    pub fn is_batch(&self) -> bool {
        matches!(self, Self::Batch(_))
    }

    /// Number of leaf calls.
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Batch(calls) => calls.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate the leaf calls in order.
    pub fn iter(&self) -> impl Iterator<Item = &ScheduledCall> {
        match self {
            Self::Single(call) => std::slice::from_ref(call).iter(),
            Self::Batch(calls) => calls.iter(),
        }
    }
}

/// A fully reconstructed scheduled operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledTransaction {
    /// The timelock that will execute the operation (the address the
    /// schedule call was directed at, after unwrapping).
    pub timelock: Address,
    pub calls: ScheduledCalls,
    pub predecessor: B256,
    pub salt: B256,
    /// Delay in seconds, as decoded.
    pub delay: U256,
    pub proposer: Proposer,
    /// Scheduled through the forced-schedule entry point.
    pub forced: bool,
}

impl ScheduledTransaction {
    /// Operation id as the timelock computes it.
    pub fn operation_id(&self) -> OperationId {
        match &self.calls {
            ScheduledCalls::Single(call) => hash_operation(
                call.target,
                call.value,
                &call.payload,
                self.predecessor,
                self.salt,
            ),
            ScheduledCalls::Batch(calls) => {
                let targets: Vec<Address> = calls.iter().map(|c| c.target).collect();
                let values: Vec<U256> = calls.iter().map(|c| c.value).collect();
                let payloads: Vec<Bytes> = calls.iter().map(|c| c.payload.clone()).collect();
                hash_operation_batch(&targets, &values, &payloads, self.predecessor, self.salt)
            }
        }
    }

    /// Total native value the execution must carry.
    pub fn total_value(&self) -> U256 {
        self.calls
            .iter()
            .fold(U256::ZERO, |acc, call| acc.saturating_add(call.value))
    }
}

/// Reconstruct a scheduled operation from a raw transaction.
pub fn reconstruct(
    tx: &RawTransaction,
    config: &GovernanceConfig,
) -> Result<ScheduledTransaction, DecodeError> {
    let to = tx.to.ok_or_else(|| {
        DecodeError::MalformedArguments("contract creation transaction".to_string())
    })?;
    reconstruct_at(to, &tx.input, config, 0)
}

fn reconstruct_at(
    to: Address,
    data: &[u8],
    config: &GovernanceConfig,
    depth: usize,
) -> Result<ScheduledTransaction, DecodeError> {
    match config.classify(to) {
        KnownContract::Multisig => {
            if depth + 1 >= MAX_WRAP_DEPTH {
                return Err(DecodeError::UnsupportedNesting);
            }
            if data.len() < SELECTOR_LEN {
                return Err(DecodeError::TooShort { len: data.len() });
            }
            let wrapped = MultiSigWallet::submitTransactionCall::abi_decode(data, true)
                .map_err(|e| DecodeError::MalformedArguments(e.to_string()))?;
            reconstruct_at(wrapped.destination, &wrapped.data, config, depth + 1)
        }
        known => parse_schedule(to, data, proposer_for(known)),
    }
}

/// Proposer classification of the address that receives the schedule call.
fn proposer_for(known: KnownContract) -> Proposer {
    match known {
        KnownContract::AdminTimelock => Proposer::Admin,
        KnownContract::WorkersUnion => Proposer::WorkersUnion,
        KnownContract::Multisig | KnownContract::Unknown => Proposer::Unknown,
    }
}

/// Decode the schedule entry point at `timelock` and assemble the result.
fn parse_schedule(
    timelock: Address,
    data: &[u8],
    proposer: Proposer,
) -> Result<ScheduledTransaction, DecodeError> {
    if data.len() < SELECTOR_LEN {
        return Err(DecodeError::TooShort { len: data.len() });
    }

    let selector: [u8; 4] = data[..SELECTOR_LEN]
        .try_into()
        .map_err(|_| DecodeError::TooShort { len: data.len() })?;

    if selector == Timelock::scheduleCall::SELECTOR {
        let call = Timelock::scheduleCall::abi_decode(data, true)
            .map_err(|e| DecodeError::MalformedArguments(e.to_string()))?;
        Ok(ScheduledTransaction {
            timelock,
            calls: ScheduledCalls::Single(ScheduledCall {
                target: call.target,
                value: call.value,
                payload: call.data,
            }),
            predecessor: call.predecessor,
            salt: call.salt,
            delay: call.delay,
            proposer,
            forced: false,
        })
    } else if selector == Timelock::forceScheduleCall::SELECTOR {
        let call = Timelock::forceScheduleCall::abi_decode(data, true)
            .map_err(|e| DecodeError::MalformedArguments(e.to_string()))?;
        Ok(ScheduledTransaction {
            timelock,
            calls: ScheduledCalls::Single(ScheduledCall {
                target: call.target,
                value: call.value,
                payload: call.data,
            }),
            predecessor: call.predecessor,
            salt: call.salt,
            delay: call.delay,
            proposer,
            forced: true,
        })
    } else if selector == Timelock::scheduleBatchCall::SELECTOR {
        let call = Timelock::scheduleBatchCall::abi_decode(data, true)
            .map_err(|e| DecodeError::MalformedArguments(e.to_string()))?;
        if call.targets.len() != call.values.len() || call.targets.len() != call.payloads.len() {
            return Err(DecodeError::ShapeMismatch {
                targets: call.targets.len(),
                values: call.values.len(),
                payloads: call.payloads.len(),
            });
        }
        let calls = call
            .targets
            .into_iter()
            .zip(call.values)
            .zip(call.payloads)
            .map(|((target, value), payload)| ScheduledCall {
                target,
                value,
                payload,
            })
            .collect();
        Ok(ScheduledTransaction {
            timelock,
            calls: ScheduledCalls::Batch(calls),
            predecessor: call.predecessor,
            salt: call.salt,
            delay: call.delay,
            proposer,
            forced: false,
        })
    } else {
        Err(DecodeError::UnknownSelector(selector.into()))
    }
}
