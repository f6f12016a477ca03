//! Builders for the calls that transition an operation's lifecycle.
//!
//! Nothing here signs or submits. The output is an inert call description
//! for an external signer, which may wrap it for the multisig first.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;
use serde::Serialize;

use crate::abi::{MultiSigWallet, Timelock};
use crate::lifecycle::OperationId;
use crate::schedule::{ScheduledCalls, ScheduledTransaction};

/// An unsigned call, ready for a signer to submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopulatedCall {
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
}

/// Build the execute call for a scheduled operation.
///
/// Arity follows the reconstructed shape exactly: a single schedule gets
/// `execute`, a batch gets `executeBatch` with the parallel arrays. The
/// attached value covers the sum of the leaf values, which the timelock
/// forwards on execution.
pub fn execute_request(tx: &ScheduledTransaction) -> PopulatedCall {
    let data: Vec<u8> = match &tx.calls {
        ScheduledCalls::Single(call) => Timelock::executeCall {
            target: call.target,
            value: call.value,
            payload: call.payload.clone(),
            predecessor: tx.predecessor,
            salt: tx.salt,
        }
        .abi_encode(),
        ScheduledCalls::Batch(calls) => Timelock::executeBatchCall {
            targets: calls.iter().map(|c| c.target).collect(),
            values: calls.iter().map(|c| c.value).collect(),
            payloads: calls.iter().map(|c| c.payload.clone()).collect(),
            predecessor: tx.predecessor,
            salt: tx.salt,
        }
        .abi_encode(),
    };

    PopulatedCall {
        to: tx.timelock,
        value: tx.total_value(),
        data: data.into(),
    }
}

/// Build the cancel call for an operation id.
pub fn cancel_request(timelock: Address, id: OperationId) -> PopulatedCall {
    PopulatedCall {
        to: timelock,
        value: U256::ZERO,
        data: Timelock::cancelCall { id }.abi_encode().into(),
    }
}

/// Wrap a populated call into the multisig wallet's `submitTransaction`.
///
/// Whether to wrap at all is the caller's policy; this only produces the
/// envelope.
pub fn multisig_submit_request(multisig: Address, call: &PopulatedCall) -> PopulatedCall {
    PopulatedCall {
        to: multisig,
        value: U256::ZERO,
        data: MultiSigWallet::submitTransactionCall {
            destination: call.to,
            value: call.value,
            data: call.data.clone(),
        }
        .abi_encode()
        .into(),
    }
}
