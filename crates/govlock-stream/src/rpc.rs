//! Minimal JSON-RPC read client for the watch layer.

use alloy_primitives::{hex, Address, Bytes, B256, U256};
use reqwest::Client;
use serde_json::{json, Value};

use govlock_decode::RawTransaction;

use super::WatchError;

/// Read-only Ethereum JSON-RPC client.
pub struct EthRpcClient {
    client: Client,
    rpc_url: String,
}

/// A log entry as returned by `eth_getLogs`.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
    pub block_number: u64,
    pub tx_hash: B256,
}

/// A transaction fetched by hash, reduced to the fields the reconstructor
/// needs plus its inclusion block.
#[derive(Debug, Clone)]
pub struct FetchedTransaction {
    pub hash: B256,
    pub raw: RawTransaction,
    /// `None` while the transaction is still pending.
    pub block_number: Option<u64>,
}

impl EthRpcClient {
    /// Create a new client from an HTTP or WebSocket URL.
    /// Converts wss:// to https:// and ws:// to http://.
    pub fn new(url: &str) -> Self {
        let rpc_url = url.replace("wss://", "https://").replace("ws://", "http://");
        Self { client: Client::new(), rpc_url }
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, WatchError> {
        let req = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let resp = self.client.post(&self.rpc_url).json(&req).send().await?;
        let body: Value = resp.json().await?;

        if let Some(err) = body.get("error") {
            return Err(WatchError::Rpc(err.to_string()));
        }
        body.get("result")
            .cloned()
            .ok_or_else(|| WatchError::Response("no result in response".to_string()))
    }

    /// Current head block number.
    pub async fn block_number(&self) -> Result<u64, WatchError> {
        let result = self.request("eth_blockNumber", json!([])).await?;
        quantity(&result).ok_or_else(|| WatchError::Response("bad block number".to_string()))
    }

    /// Read-only contract call against the latest block.
    pub async fn call(&self, to: Address, data: &[u8]) -> Result<Bytes, WatchError> {
        let params = json!([
            { "to": to.to_string(), "data": format!("0x{}", hex::encode(data)) },
            "latest",
        ]);
        let result = self.request("eth_call", params).await?;
        result
            .as_str()
            .and_then(|s| s.parse::<Bytes>().ok())
            .ok_or_else(|| WatchError::Response("bad call result".to_string()))
    }

    /// Logs for one contract and topic over an inclusive block range.
    pub async fn get_logs(
        &self,
        address: Address,
        topic0: B256,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<LogEntry>, WatchError> {
        let params = json!([{
            "address": address.to_string(),
            "topics": [format!("{topic0}")],
            "fromBlock": format!("0x{from_block:x}"),
            "toBlock": format!("0x{to_block:x}"),
        }]);
        let result = self.request("eth_getLogs", params).await?;

        let entries = result
            .as_array()
            .ok_or_else(|| WatchError::Response("logs is not an array".to_string()))?;

        entries.iter().map(parse_log).collect()
    }

    /// Fetch a transaction by hash.
    pub async fn get_transaction(&self, hash: B256) -> Result<FetchedTransaction, WatchError> {
        let result = self
            .request("eth_getTransactionByHash", json!([format!("{hash}")]))
            .await?;

        if result.is_null() {
            return Err(WatchError::TxNotFound(hash));
        }

        let to = match result.get("to") {
            Some(Value::Null) | None => None,
            Some(v) => Some(
                v.as_str()
                    .and_then(|s| s.parse::<Address>().ok())
                    .ok_or_else(|| WatchError::Response("bad to address".to_string()))?,
            ),
        };

        let value = result
            .get("value")
            .and_then(|v| v.as_str())
            .and_then(|s| U256::from_str_radix(s.trim_start_matches("0x"), 16).ok())
            .unwrap_or(U256::ZERO);

        let input = result
            .get("input")
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse::<Bytes>().ok())
            .ok_or_else(|| WatchError::Response("missing input data".to_string()))?;

        let block_number = result.get("blockNumber").and_then(quantity);

        Ok(FetchedTransaction {
            hash,
            raw: RawTransaction { to, value, input },
            block_number,
        })
    }
}

/// Parse a 0x-prefixed hex quantity field.
fn quantity(v: &Value) -> Option<u64> {
    v.as_str()
        .and_then(|s| u64::from_str_radix(s.trim_start_matches("0x"), 16).ok())
}

fn parse_log(entry: &Value) -> Result<LogEntry, WatchError> {
    let address = entry
        .get("address")
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse::<Address>().ok())
        .ok_or_else(|| WatchError::Response("log missing address".to_string()))?;

    let topics = entry
        .get("topics")
        .and_then(|v| v.as_array())
        .map(|xs| {
            xs.iter()
                .filter_map(|t| t.as_str().and_then(|s| s.parse::<B256>().ok()))
                .collect::<Vec<_>>()
        })
        .ok_or_else(|| WatchError::Response("log missing topics".to_string()))?;

    let data = entry
        .get("data")
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse::<Bytes>().ok())
        .unwrap_or_default();

    let block_number = entry
        .get("blockNumber")
        .and_then(quantity)
        .ok_or_else(|| WatchError::Response("log missing block number".to_string()))?;

    let tx_hash = entry
        .get("transactionHash")
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse::<B256>().ok())
        .ok_or_else(|| WatchError::Response("log missing transaction hash".to_string()))?;

    Ok(LogEntry { address, topics, data, block_number, tx_hash })
}
