use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::SolCall;

use super::{addr, hash};
use crate::abi::{MultiSigWallet, Timelock};
use crate::{
    reconstruct, DecodeError, GovernanceConfig, Proposer, RawTransaction, ScheduledCalls,
    ADMIN_TIMELOCK, GOV_MULTISIG, WORKERS_UNION,
};

fn schedule_calldata(
    target: Address,
    value: U256,
    data: Bytes,
    predecessor: B256,
    salt: B256,
    delay: u64,
) -> Bytes {
    Timelock::scheduleCall {
        target,
        value,
        data,
        predecessor,
        salt,
        delay: U256::from(delay),
    }
    .abi_encode()
    .into()
}

fn raw(to: Address, input: Bytes) -> RawTransaction {
    RawTransaction {
        to: Some(to),
        value: U256::ZERO,
        input,
    }
}

#[test]
fn test_single_schedule_round_trip() {
    let config = GovernanceConfig::mainnet();
    let payload: Bytes = vec![0xde, 0xad, 0xbe, 0xef].into();
    let input = schedule_calldata(
        addr(0xaa),
        U256::from(42u64),
        payload.clone(),
        hash(0),
        hash(0x12),
        3600,
    );

    let scheduled = reconstruct(&raw(ADMIN_TIMELOCK, input), &config).unwrap();

    assert_eq!(scheduled.timelock, ADMIN_TIMELOCK);
    assert_eq!(scheduled.proposer, Proposer::Admin);
    assert!(!scheduled.forced);
    assert_eq!(scheduled.delay, U256::from(3600u64));
    assert_eq!(scheduled.predecessor, hash(0));
    assert_eq!(scheduled.salt, hash(0x12));
    match &scheduled.calls {
        ScheduledCalls::Single(call) => {
            assert_eq!(call.target, addr(0xaa));
            assert_eq!(call.value, U256::from(42u64));
            assert_eq!(call.payload, payload);
        }
        ScheduledCalls::Batch(_) => panic!("expected single call"),
    }
}

#[test]
fn test_workers_union_proposer() {
    let config = GovernanceConfig::mainnet();
    let input = schedule_calldata(addr(0xaa), U256::ZERO, Bytes::new(), hash(0), hash(1), 60);

    let scheduled = reconstruct(&raw(WORKERS_UNION, input), &config).unwrap();

    assert_eq!(scheduled.proposer, Proposer::WorkersUnion);
    assert_eq!(scheduled.timelock, WORKERS_UNION);
}

#[test]
fn test_unknown_address_still_decodes() {
    let config = GovernanceConfig::mainnet();
    let input = schedule_calldata(addr(0xaa), U256::ZERO, Bytes::new(), hash(0), hash(1), 60);

    let scheduled = reconstruct(&raw(addr(0x77), input), &config).unwrap();

    assert_eq!(scheduled.proposer, Proposer::Unknown);
    assert_eq!(scheduled.timelock, addr(0x77));
}

#[test]
fn test_forced_schedule_detected() {
    let config = GovernanceConfig::mainnet();
    let input: Bytes = Timelock::forceScheduleCall {
        target: addr(0xaa),
        value: U256::ZERO,
        data: Bytes::new(),
        predecessor: hash(0),
        salt: hash(1),
        delay: U256::from(60u64),
    }
    .abi_encode()
    .into();

    let scheduled = reconstruct(&raw(ADMIN_TIMELOCK, input), &config).unwrap();

    assert!(scheduled.forced);
}

#[test]
fn test_multisig_wrapped_schedule() {
    // The §8.6-style scenario: multisig wraps a schedule into the admin
    // timelock; classification follows the inner recipient.
    let config = GovernanceConfig::mainnet();
    let inner = schedule_calldata(
        addr(0xaa),
        U256::ZERO,
        vec![0xde, 0xad, 0xbe, 0xef].into(),
        B256::ZERO,
        hash(0x12),
        86400,
    );
    let wrapped: Bytes = MultiSigWallet::submitTransactionCall {
        destination: ADMIN_TIMELOCK,
        value: U256::ZERO,
        data: inner,
    }
    .abi_encode()
    .into();

    let scheduled = reconstruct(&raw(GOV_MULTISIG, wrapped), &config).unwrap();

    assert_eq!(scheduled.proposer, Proposer::Admin);
    assert_eq!(scheduled.delay, U256::from(86400u64));
    assert!(!scheduled.forced);
    assert!(!scheduled.calls.is_batch());
    assert_eq!(scheduled.timelock, ADMIN_TIMELOCK);

    // Executing it must produce the single-execute call, not the batch one.
    let call = crate::execute_request(&scheduled);
    assert_eq!(&call.data[..4], Timelock::executeCall::SELECTOR);
}

#[test]
fn test_double_wrapping_rejected() {
    let config = GovernanceConfig::mainnet();
    let inner = schedule_calldata(addr(0xaa), U256::ZERO, Bytes::new(), hash(0), hash(1), 60);
    let once: Bytes = MultiSigWallet::submitTransactionCall {
        destination: GOV_MULTISIG,
        value: U256::ZERO,
        data: MultiSigWallet::submitTransactionCall {
            destination: ADMIN_TIMELOCK,
            value: U256::ZERO,
            data: inner,
        }
        .abi_encode()
        .into(),
    }
    .abi_encode()
    .into();

    let err = reconstruct(&raw(GOV_MULTISIG, once), &config).unwrap_err();
    assert_eq!(err, DecodeError::UnsupportedNesting);
}

#[test]
fn test_batch_schedule() {
    let config = GovernanceConfig::mainnet();
    let input: Bytes = Timelock::scheduleBatchCall {
        targets: vec![addr(1), addr(2), addr(3)],
        values: vec![U256::ZERO, U256::from(1u64), U256::from(2u64)],
        payloads: vec![Bytes::new(), vec![0x01].into(), vec![0x02, 0x03].into()],
        predecessor: hash(0),
        salt: hash(5),
        delay: U256::from(7200u64),
    }
    .abi_encode()
    .into();

    let scheduled = reconstruct(&raw(ADMIN_TIMELOCK, input), &config).unwrap();

    assert!(scheduled.calls.is_batch());
    assert_eq!(scheduled.calls.len(), 3);
    assert_eq!(scheduled.total_value(), U256::from(3u64));
    let targets: Vec<Address> = scheduled.calls.iter().map(|c| c.target).collect();
    assert_eq!(targets, vec![addr(1), addr(2), addr(3)]);
}

#[test]
fn test_batch_shape_mismatch() {
    let config = GovernanceConfig::mainnet();
    let input: Bytes = Timelock::scheduleBatchCall {
        targets: vec![addr(1), addr(2)],
        values: vec![U256::ZERO],
        payloads: vec![Bytes::new(), Bytes::new()],
        predecessor: hash(0),
        salt: hash(5),
        delay: U256::from(60u64),
    }
    .abi_encode()
    .into();

    let err = reconstruct(&raw(ADMIN_TIMELOCK, input), &config).unwrap_err();
    assert_eq!(
        err,
        DecodeError::ShapeMismatch {
            targets: 2,
            values: 1,
            payloads: 2,
        }
    );
}

#[test]
fn test_non_schedule_selector_rejected() {
    let config = GovernanceConfig::mainnet();
    let input: Bytes = Timelock::cancelCall { id: hash(1) }.abi_encode().into();

    let err = reconstruct(&raw(ADMIN_TIMELOCK, input), &config).unwrap_err();
    assert!(matches!(err, DecodeError::UnknownSelector(_)));
}

#[test]
fn test_contract_creation_rejected() {
    let config = GovernanceConfig::mainnet();
    let tx = RawTransaction {
        to: None,
        value: U256::ZERO,
        input: Bytes::new(),
    };

    let err = reconstruct(&tx, &config).unwrap_err();
    assert!(matches!(err, DecodeError::MalformedArguments(_)));
}

#[test]
fn test_short_input_rejected() {
    let config = GovernanceConfig::mainnet();
    let tx = raw(ADMIN_TIMELOCK, vec![0xab, 0xcd].into());

    let err = reconstruct(&tx, &config).unwrap_err();
    assert_eq!(err, DecodeError::TooShort { len: 2 });
}

#[test]
fn test_operation_id_matches_offline_hash() {
    let config = GovernanceConfig::mainnet();
    let payload: Bytes = vec![0x01, 0x02].into();
    let input = schedule_calldata(
        addr(0xaa),
        U256::from(5u64),
        payload.clone(),
        hash(3),
        hash(4),
        600,
    );
    let scheduled = reconstruct(&raw(ADMIN_TIMELOCK, input), &config).unwrap();

    let expected = crate::abi::hash_operation(
        addr(0xaa),
        U256::from(5u64),
        &payload,
        hash(3),
        hash(4),
    );
    assert_eq!(scheduled.operation_id(), expected);

    // A different salt yields a different id.
    let other = schedule_calldata(addr(0xaa), U256::from(5u64), payload, hash(3), hash(9), 600);
    let other = reconstruct(&raw(ADMIN_TIMELOCK, other), &config).unwrap();
    assert_ne!(scheduled.operation_id(), other.operation_id());
}

#[test]
fn test_batch_operation_id_uses_batch_hash() {
    let config = GovernanceConfig::mainnet();
    let input: Bytes = Timelock::scheduleBatchCall {
        targets: vec![addr(1)],
        values: vec![U256::ZERO],
        payloads: vec![Bytes::new()],
        predecessor: hash(0),
        salt: hash(5),
        delay: U256::from(60u64),
    }
    .abi_encode()
    .into();
    let scheduled = reconstruct(&raw(ADMIN_TIMELOCK, input), &config).unwrap();

    let expected = crate::abi::hash_operation_batch(
        &[addr(1)],
        &[U256::ZERO],
        &[Bytes::new()],
        hash(0),
        hash(5),
    );
    assert_eq!(scheduled.operation_id(), expected);
}
