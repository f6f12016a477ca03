use alloy_primitives::{address, Address};
use serde::Serialize;

/// Admin timelock controller (mainnet).
pub const ADMIN_TIMELOCK: Address = address!("63a32ca33ba7b7de50a309d1e9b379db3e78a2c5");

/// Workers' union voting contract (mainnet). Carries the timelock's
/// scheduling interface itself.
pub const WORKERS_UNION: Address = address!("f3f5f73cbd0c0a8468f22da9fcd269dbcf388b1a");

/// Governance multisig wallet (mainnet). Wraps timelock calls via
/// `submitTransaction`.
pub const GOV_MULTISIG: Address = address!("8f5c1a32e1b7d294dd1b09b037c15c4f0e360b26");

/// Which known singleton an address resolves to.
///
/// Classification is an exact address comparison against the configured
/// singletons; anything else is `Unknown`. `Unknown` is advisory only,
/// decoding proceeds regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KnownContract {
    AdminTimelock,
    WorkersUnion,
    Multisig,
    Unknown,
}

/// Singleton addresses of the governance deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GovernanceConfig {
    pub admin_timelock: Address,
    pub workers_union: Address,
    pub multisig: Address,
}

impl GovernanceConfig {
    /// Mainnet deployment addresses.
    pub const fn mainnet() -> Self {
        Self {
            admin_timelock: ADMIN_TIMELOCK,
            workers_union: WORKERS_UNION,
            multisig: GOV_MULTISIG,
        }
    }

    /// Resolve an address to the known singleton it belongs to.
    pub fn classify(&self, addr: Address) -> KnownContract {
        if addr == self.admin_timelock {
            KnownContract::AdminTimelock
        } else if addr == self.workers_union {
            KnownContract::WorkersUnion
        } else if addr == self.multisig {
            KnownContract::Multisig
        } else {
            KnownContract::Unknown
        }
    }
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self::mainnet()
    }
}
