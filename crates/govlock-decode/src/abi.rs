//! Typed bindings for the timelock controller and the multisig wallet.
//!
//! Only the entry points the decoder, reconstructor, and request builders
//! touch are declared here; the full deployed interfaces are larger.

use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use alloy_sol_types::{sol, SolValue};

sol! {
    /// OpenZeppelin-style timelock controller administering the protocol.
    interface Timelock {
        event CallScheduled(
            bytes32 indexed id,
            uint256 indexed index,
            address target,
            uint256 value,
            bytes data,
            bytes32 predecessor,
            uint256 delay
        );
        event CallExecuted(
            bytes32 indexed id,
            uint256 indexed index,
            address target,
            uint256 value,
            bytes data
        );
        event Cancelled(bytes32 indexed id);

        function schedule(
            address target,
            uint256 value,
            bytes data,
            bytes32 predecessor,
            bytes32 salt,
            uint256 delay
        );
        function forceSchedule(
            address target,
            uint256 value,
            bytes data,
            bytes32 predecessor,
            bytes32 salt,
            uint256 delay
        );
        function scheduleBatch(
            address[] targets,
            uint256[] values,
            bytes[] payloads,
            bytes32 predecessor,
            bytes32 salt,
            uint256 delay
        );
        function execute(
            address target,
            uint256 value,
            bytes payload,
            bytes32 predecessor,
            bytes32 salt
        ) payable;
        function executeBatch(
            address[] targets,
            uint256[] values,
            bytes[] payloads,
            bytes32 predecessor,
            bytes32 salt
        ) payable;
        function cancel(bytes32 id);
        function hashOperation(
            address target,
            uint256 value,
            bytes data,
            bytes32 predecessor,
            bytes32 salt
        ) view returns (bytes32);
        function hashOperationBatch(
            address[] targets,
            uint256[] values,
            bytes[] payloads,
            bytes32 predecessor,
            bytes32 salt
        ) view returns (bytes32);
        function isOperationPending(bytes32 id) view returns (bool);
        function isOperationReady(bytes32 id) view returns (bool);
        function isOperationDone(bytes32 id) view returns (bool);
        function getMinDelay() view returns (uint256);
    }

    /// Legacy multisig wallet that wraps calls into the timelock.
    interface MultiSigWallet {
        function submitTransaction(
            address destination,
            uint256 value,
            bytes data
        ) returns (uint256 transactionId);
        function confirmTransaction(uint256 transactionId);
        function executeTransaction(uint256 transactionId);
    }
}

/// Operation id of a single scheduled call, as the timelock computes it:
/// `keccak256(abi.encode(target, value, data, predecessor, salt))`.
pub fn hash_operation(
    target: Address,
    value: U256,
    data: &Bytes,
    predecessor: B256,
    salt: B256,
) -> B256 {
    keccak256((target, value, data.clone(), predecessor, salt).abi_encode())
}

/// Operation id of a scheduled batch, over the parallel argument arrays.
pub fn hash_operation_batch(
    targets: &[Address],
    values: &[U256],
    payloads: &[Bytes],
    predecessor: B256,
    salt: B256,
) -> B256 {
    keccak256(
        (targets.to_vec(), values.to_vec(), payloads.to_vec(), predecessor, salt).abi_encode(),
    )
}
