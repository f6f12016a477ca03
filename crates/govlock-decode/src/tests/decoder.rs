use alloy_primitives::U256;
use alloy_sol_types::SolValue;

use super::addr;
use crate::{decode_call, ContractRegistry, DecodeError};

/// ERC20 transfer selector, present in the known registry.
const TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];

fn registry() -> ContractRegistry {
    ContractRegistry::known().unwrap()
}

fn transfer_calldata(to: alloy_primitives::Address, amount: U256) -> Vec<u8> {
    let mut data = TRANSFER_SELECTOR.to_vec();
    data.extend_from_slice(&(to, amount).abi_encode());
    data
}

#[test]
fn test_too_short_always_fails() {
    let registry = registry();

    for data in [&[][..], &[0xa9][..], &[0xa9, 0x05, 0x9c][..]] {
        let err = decode_call(addr(0x11), data, U256::ZERO, &registry).unwrap_err();
        assert_eq!(err, DecodeError::TooShort { len: data.len() });
    }

    // Target address is irrelevant to the length check.
    let err = decode_call(addr(0x22), &[0x00], U256::ZERO, &registry).unwrap_err();
    assert_eq!(err, DecodeError::TooShort { len: 1 });
}

#[test]
fn test_unknown_selector() {
    let registry = registry();
    let mut data = vec![0xde, 0xad, 0xbe, 0xef];
    data.extend_from_slice(&[0u8; 32]);

    let err = decode_call(addr(0x11), &data, U256::ZERO, &registry).unwrap_err();
    assert!(matches!(err, DecodeError::UnknownSelector(_)));
}

#[test]
fn test_decode_transfer() {
    let registry = registry();
    let recipient = addr(0xaa);
    let data = transfer_calldata(recipient, U256::from(1000u64));

    let decoded = decode_call(addr(0x11), &data, U256::ZERO, &registry).unwrap();

    assert_eq!(decoded.contract, "VisionToken");
    assert_eq!(decoded.function, "transfer");
    assert_eq!(decoded.signature, "transfer(address,uint256)");
    assert_eq!(decoded.arguments.len(), 2);
    assert_eq!(decoded.arguments[0].name, "to");
    assert_eq!(decoded.arguments[0].kind, "address");
    assert_eq!(decoded.arguments[0].value, recipient.to_checksum(None));
    assert_eq!(decoded.arguments[1].name, "amount");
    assert_eq!(decoded.arguments[1].value, "1000");
}

#[test]
fn test_decode_is_selector_driven() {
    // The target does not belong to the token contract; decoding still
    // proceeds against the selector match.
    let registry = registry();
    let data = transfer_calldata(addr(0xaa), U256::from(5u64));

    let decoded = decode_call(addr(0xf0), &data, U256::from(7u64), &registry).unwrap();

    assert_eq!(decoded.target, addr(0xf0));
    assert_eq!(decoded.eth_value, U256::from(7u64));
    assert_eq!(decoded.contract, "VisionToken");
}

#[test]
fn test_malformed_arguments() {
    let registry = registry();
    let mut data = TRANSFER_SELECTOR.to_vec();
    data.extend_from_slice(&[0u8; 10]); // truncated argument block

    let err = decode_call(addr(0x11), &data, U256::ZERO, &registry).unwrap_err();
    assert!(matches!(err, DecodeError::MalformedArguments(_)));
}

#[test]
fn test_decode_batch_schedule_arguments() {
    let registry = registry();
    let call = crate::abi::Timelock::scheduleBatchCall {
        targets: vec![addr(0x01), addr(0x02)],
        values: vec![U256::ZERO, U256::from(1u64)],
        payloads: vec![vec![0xde, 0xad].into(), vec![0xbe, 0xef].into()],
        predecessor: super::hash(0),
        salt: super::hash(9),
        delay: U256::from(86400u64),
    };
    use alloy_sol_types::SolCall;
    let data = call.abi_encode();

    let decoded = decode_call(addr(0x11), &data, U256::ZERO, &registry).unwrap();

    assert_eq!(decoded.contract, "Timelock");
    assert_eq!(decoded.function, "scheduleBatch");
    assert_eq!(decoded.arguments[0].kind, "address[]");
    assert_eq!(decoded.arguments[2].value, "[0xdead, 0xbeef]");
    assert_eq!(decoded.arguments[5].value, "86400");
}
