//! Decoding core for timelocked governance transactions.
//!
//! This crate reconstructs scheduled timelock operations purely from call
//! data and classifies their lifecycle, with no I/O of its own:
//! - Call-data decoding against a registry of known contract functions
//! - Scheduled-transaction reconstruction (direct, via the workers' union,
//!   or wrapped one level inside the multisig wallet)
//! - Lifecycle state interpretation with fixed predicate precedence
//! - Execute/cancel request building (inert, unsigned calls)
//!
//! Everything is a pure function of its inputs plus the static registry;
//! results are safe to recompute or cache at any time.

pub mod abi;

mod config;
mod decoder;
mod lifecycle;
mod registry;
mod request;
mod schedule;

#[cfg(test)]
mod tests;

pub use config::{
    GovernanceConfig, KnownContract, ADMIN_TIMELOCK, GOV_MULTISIG, WORKERS_UNION,
};
pub use decoder::{decode_call, DecodeError, DecodedArg, DecodedCall, SELECTOR_LEN};
pub use lifecycle::{LifecycleState, OperationId, StatusFlags};
pub use registry::{CallSignature, ContractRegistry, RegistryError};
pub use request::{cancel_request, execute_request, multisig_submit_request, PopulatedCall};
pub use schedule::{
    reconstruct, Proposer, RawTransaction, ScheduledCall, ScheduledCalls, ScheduledTransaction,
    MAX_WRAP_DEPTH,
};
