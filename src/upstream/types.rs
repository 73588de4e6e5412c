//! Explorer API types and error definitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export UpstreamConfig from config module to avoid duplication
pub use crate::config::schema::UpstreamConfig;

/// Blockchain networks served by the gateway.
///
/// BTC, LTC and DOGE all use SHA-256 for block and transaction hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    Btc,
    Ltc,
    Doge,
}

impl Network {
    pub const ALL: [Network; 3] = [Network::Btc, Network::Ltc, Network::Doge];

    /// Network code as used in upstream URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Btc => "btc",
            Network::Ltc => "ltc",
            Network::Doge => "doge",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a network code is not one of the supported chains.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported network '{0}'")]
pub struct UnsupportedNetwork(pub String);

impl FromStr for Network {
    type Err = UnsupportedNetwork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Network::ALL
            .into_iter()
            .find(|n| n.as_str() == s)
            .ok_or_else(|| UnsupportedNetwork(s.to_string()))
    }
}

/// Errors that can occur during upstream explorer calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    /// Connection, timeout or body transfer failure.
    #[error("upstream transport error: {0}")]
    Transport(String),

    /// The response body did not match the expected shape.
    #[error("failed to decode upstream response: {0}")]
    Decode(String),

    /// The explorer answered with a non-success status.
    #[error("upstream response status {status} for {resource}")]
    Status { status: u16, resource: String },
}

impl UpstreamError {
    /// Status code reported by the explorer, if the failure carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::Status { status, .. } => Some(*status),
            UpstreamError::Transport(_) | UpstreamError::Decode(_) => None,
        }
    }
}

/// Result type for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// `get_info` envelope.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NetworkInfo {
    #[serde(default)]
    pub status: String,
    pub data: NetworkData,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkData {
    pub name: String,
    pub acronym: String,
    pub network: String,
    pub symbol_htmlcode: String,
    pub url: String,
    pub mining_difficulty: String,
    pub unconfirmed_txs: u64,
    /// Current chain height.
    pub blocks: u64,
    pub price: String,
    pub price_base: String,
    pub price_update_time: i64,
    pub hashrate: String,
}

/// `get_block` envelope.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub status: String,
    pub data: BlockData,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockData {
    pub network: String,
    pub blockhash: String,
    pub block_no: u64,
    pub mining_difficulty: String,
    /// Seconds since epoch.
    pub time: i64,
    pub confirmations: u64,
    pub is_orphan: bool,
    /// Transaction ids in block order.
    pub txs: Vec<String>,
    pub merkleroot: String,
    pub previous_blockhash: String,
    pub next_blockhash: String,
    pub size: u64,
}

/// `tx` envelope.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub status: String,
    pub data: TransactionData,
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionData {
    pub network: String,
    pub txid: String,
    pub blockhash: String,
    pub block_no: u64,
    pub confirmations: u64,
    /// Seconds since epoch.
    pub time: i64,
    pub size: u64,
    pub vsize: u64,
    pub version: i64,
    pub locktime: u64,
    /// Decimal string, kept verbatim.
    pub sent_value: String,
    /// Decimal string, kept verbatim.
    pub fee: String,
    pub inputs: Vec<Input>,
    pub outputs: Vec<Output>,
    pub tx_hex: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Input {
    pub input_no: u32,
    pub address: String,
    pub value: String,
    pub received_from: serde_json::Value,
    pub script_asm: String,
    pub script_hex: serde_json::Value,
    pub witness: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Output {
    pub output_no: u32,
    pub address: String,
    pub value: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub req_sigs: serde_json::Value,
    pub spent: serde_json::Value,
    pub script_asm: String,
    pub script_hex: String,
}
