//! Registry of known contract functions, keyed by 4-byte selector.
//!
//! The registry is built once at startup from human-readable signatures and
//! never mutated afterwards. Lookup is selector-driven: the target address
//! of a call plays no part in resolution.

use std::collections::HashMap;

use alloy_dyn_abi::DynSolValue;
use alloy_json_abi::Function;
use alloy_primitives::{hex, Selector};
use thiserror::Error;

/// A known `(contract, function)` pair the decoder recognizes.
#[derive(Debug, Clone)]
pub struct CallSignature {
    /// Name of the contract the function belongs to.
    pub contract: String,
    /// Parsed function schema; the selector is derived from it.
    pub function: Function,
}

/// A human-readable signature failed to parse during registration.
#[derive(Debug, Error)]
#[error("invalid function signature `{signature}`: {reason}")]
pub struct RegistryError {
    pub signature: String,
    pub reason: String,
}

/// Selector-keyed table of every function the decoder recognizes.
#[derive(Debug, Clone, Default)]
pub struct ContractRegistry {
    by_selector: HashMap<Selector, CallSignature>,
}

/// Functions the governance suite is known to schedule, per contract.
///
/// Parameter names are carried through to the decoded output.
const KNOWN_SIGNATURES: &[(&str, &[&str])] = &[
    (
        "Timelock",
        &[
            "schedule(address target, uint256 value, bytes data, bytes32 predecessor, bytes32 salt, uint256 delay)",
            "forceSchedule(address target, uint256 value, bytes data, bytes32 predecessor, bytes32 salt, uint256 delay)",
            "scheduleBatch(address[] targets, uint256[] values, bytes[] payloads, bytes32 predecessor, bytes32 salt, uint256 delay)",
            "execute(address target, uint256 value, bytes payload, bytes32 predecessor, bytes32 salt)",
            "executeBatch(address[] targets, uint256[] values, bytes[] payloads, bytes32 predecessor, bytes32 salt)",
            "cancel(bytes32 id)",
            "updateDelay(uint256 newDelay)",
            "grantRole(bytes32 role, address account)",
            "revokeRole(bytes32 role, address account)",
        ],
    ),
    (
        "MultiSigWallet",
        &[
            "submitTransaction(address destination, uint256 value, bytes data)",
            "confirmTransaction(uint256 transactionId)",
            "revokeConfirmation(uint256 transactionId)",
            "addOwner(address owner)",
            "removeOwner(address owner)",
        ],
    ),
    (
        "VisionToken",
        &[
            "transfer(address to, uint256 amount)",
            "approve(address spender, uint256 amount)",
            "mint(address to, uint256 amount)",
            "setMinter(address minter)",
        ],
    ),
    (
        "VisionEmitter",
        &[
            "start()",
            "setEmission(address[] pools, uint256[] weights, uint256 treasuryWeight, uint256 callerBonus)",
            "setFounderShareDenominator(uint256 denominator)",
            "setTreasury(address treasury)",
        ],
    ),
    (
        "StableReserve",
        &[
            "grant(address recipient, uint256 amount, bytes data)",
            "setPriceOfCommit(uint256 price)",
        ],
    ),
    (
        "Marketplace",
        &[
            "setTaxRate(uint256 rate)",
            "addCurrency(address currency)",
            "removeCurrency(address currency)",
        ],
    ),
    (
        "WorkersUnion",
        &[
            "changeVotingRule(uint256 minimumPending, uint256 maximumPending, uint256 minimumVotingPeriod, uint256 maximumVotingPeriod, uint256 minimumVotesForProposal, uint256 minimumVotes)",
            "pause()",
            "unpause()",
        ],
    ),
    (
        "VotingEscrow",
        &[
            "setMinimumLockPeriod(uint256 period)",
            "setMaximumLockPeriod(uint256 period)",
        ],
    ),
    ("DividendPool", &["distribute(address token, uint256 amount)"]),
];

impl ContractRegistry {
    /// Empty registry; register contracts one by one.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with every function of the governance suite.
    pub fn known() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for (contract, signatures) in KNOWN_SIGNATURES {
            registry.register(contract, signatures)?;
        }
        Ok(registry)
    }

    /// Register a contract's functions from human-readable signatures.
    ///
    /// A later registration wins on selector collision; collisions across
    /// genuinely different signatures do not occur in the known set.
    pub fn register(&mut self, contract: &str, signatures: &[&str]) -> Result<(), RegistryError> {
        for signature in signatures {
            let function = Function::parse(signature).map_err(|e| RegistryError {
                signature: (*signature).to_string(),
                reason: e.to_string(),
            })?;
            self.by_selector.insert(
                function.selector(),
                CallSignature { contract: contract.to_string(), function },
            );
        }
        Ok(())
    }

    /// Look up the known signature for a selector.
    pub fn lookup(&self, selector: Selector) -> Option<&CallSignature> {
        self.by_selector.get(&selector)
    }

    /// Number of registered functions.
    pub fn len(&self) -> usize {
        self.by_selector.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_selector.is_empty()
    }
}

/// Render a decoded argument for display.
///
/// Addresses are checksummed, byte values 0x-prefixed, composites rendered
/// recursively.
pub(crate) fn format_value(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Address(a) => a.to_checksum(None),
        DynSolValue::Function(f) => format!("0x{}", hex::encode(f.as_slice())),
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::Int(i, _) => i.to_string(),
        DynSolValue::Uint(u, _) => u.to_string(),
        DynSolValue::FixedBytes(word, size) => format!("0x{}", hex::encode(&word[..*size])),
        DynSolValue::Bytes(bytes) => format!("0x{}", hex::encode(bytes)),
        DynSolValue::String(s) => s.clone(),
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) => {
            let inner: Vec<String> = items.iter().map(format_value).collect();
            format!("[{}]", inner.join(", "))
        }
        DynSolValue::Tuple(items) => {
            let inner: Vec<String> = items.iter().map(format_value).collect();
            format!("({})", inner.join(", "))
        }
    }
}
