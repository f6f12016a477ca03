//! Tests for the decoding core.

use alloy_primitives::{Address, B256};

mod decoder;
mod lifecycle;
mod schedule;

fn addr(n: u8) -> Address {
    Address::repeat_byte(n)
}

fn hash(n: u8) -> B256 {
    let mut bytes = [0u8; 32];
    bytes[0] = n;
    B256::from(bytes)
}
