//! Call-data decoding against the known-contract registry.

use alloy_dyn_abi::JsonAbiExt;
use alloy_primitives::{Address, Selector, U256};
use serde::Serialize;
use thiserror::Error;

use crate::registry::{format_value, ContractRegistry};

/// Length of a function selector.
pub const SELECTOR_LEN: usize = 4;

/// Errors from decoding or reconstructing scheduled call data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Call data shorter than a function selector.
    #[error("call data too short: {len} bytes")]
    TooShort { len: usize },

    /// Selector not present in the registry.
    #[error("unknown function selector {0}")]
    UnknownSelector(Selector),

    /// Arguments did not decode against the matched schema.
    #[error("malformed arguments: {0}")]
    MalformedArguments(String),

    /// More than one level of multisig wrapping.
    #[error("unsupported nesting: wrapped deeper than one multisig level")]
    UnsupportedNesting,

    /// Batch argument arrays of differing lengths.
    #[error("shape mismatch: {targets} targets, {values} values, {payloads} payloads")]
    ShapeMismatch {
        targets: usize,
        values: usize,
        payloads: usize,
    },
}

/// A decoded function argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedArg {
    /// Parameter name, or `argN` when the schema leaves it unnamed.
    pub name: String,
    /// Solidity type, e.g. `address` or `uint256[]`.
    pub kind: String,
    /// Rendered value.
    pub value: String,
}

/// A call resolved against the registry and decoded into its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedCall {
    /// Contract the matched function belongs to.
    pub contract: String,
    /// Function name.
    pub function: String,
    /// Canonical signature, e.g. `transfer(address,uint256)`.
    pub signature: String,
    /// Address the call is directed at. Advisory: the selector, not the
    /// address, drove the match.
    pub target: Address,
    /// Native value attached to the call.
    pub eth_value: U256,
    /// Decoded arguments in declaration order.
    pub arguments: Vec<DecodedArg>,
}

/// Decode raw call data against the registry.
///
/// The leading 4 bytes select the function; the remainder is decoded
/// according to that function's schema. `target` passes through to the
/// output untouched, an address that does not belong to the matched
/// contract still decodes speculatively.
pub fn decode_call(
    target: Address,
    data: &[u8],
    eth_value: U256,
    registry: &ContractRegistry,
) -> Result<DecodedCall, DecodeError> {
    if data.len() < SELECTOR_LEN {
        return Err(DecodeError::TooShort { len: data.len() });
    }

    let selector = Selector::from_slice(&data[..SELECTOR_LEN]);
    let known = registry
        .lookup(selector)
        .ok_or(DecodeError::UnknownSelector(selector))?;

    let values = known
        .function
        .abi_decode_input(&data[SELECTOR_LEN..], true)
        .map_err(|e| DecodeError::MalformedArguments(e.to_string()))?;

    let arguments = known
        .function
        .inputs
        .iter()
        .zip(values.iter())
        .enumerate()
        .map(|(i, (param, value))| DecodedArg {
            name: if param.name.is_empty() {
                format!("arg{i}")
            } else {
                param.name.clone()
            },
            kind: param.ty.clone(),
            value: format_value(value),
        })
        .collect();

    Ok(DecodedCall {
        contract: known.contract.clone(),
        function: known.function.name.clone(),
        signature: known.function.signature(),
        target,
        eth_value,
        arguments,
    })
}
