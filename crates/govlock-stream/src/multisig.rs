//! Multisig transaction-service API wrapper.
//!
//! Owner lookups gate who may be offered execute/cancel actions; nothing
//! here touches the chain.

use alloy_primitives::Address;
use reqwest::Client;
use serde::Deserialize;

const SAFES_PATH: &str = "/api/v1/safes";

/// Public mainnet instance of the transaction service.
pub const DEFAULT_MULTISIG_API: &str = "https://safe-transaction-mainnet.safe.global";

#[derive(thiserror::Error, Debug)]
pub enum MultisigApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("service returned status {0}")]
    Status(u16),
    #[error("malformed owner list: {0}")]
    Malformed(String),
}

#[derive(Debug, Deserialize)]
struct SafeInfo {
    owners: Vec<String>,
}

/// Thin client over the multisig service's safe-info endpoint.
pub struct MultisigApi {
    client: Client,
    base: String,
}

impl MultisigApi {
    pub fn new(base_url: &str) -> Self {
        Self { client: Client::new(), base: base_url.trim_end_matches('/').to_string() }
    }

    #[inline]
    fn safe_url(&self, safe: Address) -> String {
        format!("{}{}/{}/", self.base, SAFES_PATH, safe)
    }

    /// Current owner set of a multisig.
    pub async fn owners(&self, safe: Address) -> Result<Vec<Address>, MultisigApiError> {
        let response = self.client.get(self.safe_url(safe)).send().await?;

        if !response.status().is_success() {
            return Err(MultisigApiError::Status(response.status().as_u16()));
        }

        let info: SafeInfo = response.json().await?;
        info.owners
            .iter()
            .map(|s| {
                s.parse::<Address>()
                    .map_err(|e| MultisigApiError::Malformed(format!("{s}: {e}")))
            })
            .collect()
    }

    /// Whether `account` is an owner of `safe`.
    pub async fn is_owner(
        &self,
        safe: Address,
        account: Address,
    ) -> Result<bool, MultisigApiError> {
        Ok(self.owners(safe).await?.contains(&account))
    }
}
