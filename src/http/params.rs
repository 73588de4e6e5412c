//! Path and query parameter validation.
//!
//! Everything here runs before any upstream call; a failure is always a
//! client error.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use url::form_urlencoded;

use crate::upstream::Network;

/// BTC, LTC & DOGE use SHA-256 for block and transaction hashes.
static SHA256_HASH: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[A-Fa-f0-9]{64}$").expect("hash pattern compiles"));

/// Rejected request parameters. The message is returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("path param: network 'id' is missing")]
    MissingNetwork,

    #[error("path param: network 'id' can only be 'btc', 'ltc' or 'doge'")]
    UnsupportedNetwork(String),

    #[error("query param 'height' is no integer number, zero or negative")]
    InvalidHeight(String),

    #[error("provided blockhash is not a valid SHA-256 hash")]
    InvalidBlockHash(String),

    #[error("path param: missing 'txhash'")]
    MissingTxHash,

    #[error("path param: 'txhash' is not a valid SHA-256 hash")]
    InvalidTxHash(String),
}

/// Whether `value` is a 64 character hex string.
pub fn is_sha256_hash(value: &str) -> bool {
    SHA256_HASH.is_match(value)
}

pub fn parse_network(raw: &str) -> Result<Network, ParamError> {
    if raw.is_empty() {
        return Err(ParamError::MissingNetwork);
    }
    raw.parse()
        .map_err(|_| ParamError::UnsupportedNetwork(raw.to_string()))
}

pub fn parse_tx_hash(raw: &str) -> Result<&str, ParamError> {
    if raw.is_empty() {
        return Err(ParamError::MissingTxHash);
    }
    if !is_sha256_hash(raw) {
        return Err(ParamError::InvalidTxHash(raw.to_string()));
    }
    Ok(raw)
}

/// Query string of the block endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockQuery {
    pub height: Option<String>,
    pub blockhash: Option<String>,
}

impl BlockQuery {
    /// Parse a raw query string. A repeated key keeps its first value and
    /// unknown keys are ignored, so parsing never fails.
    pub fn parse(raw: Option<&str>) -> Self {
        let mut query = BlockQuery::default();
        for (key, value) in form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
            let slot = match key.as_ref() {
                "height" => &mut query.height,
                "blockhash" => &mut query.blockhash,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        query
    }
}

/// Which block a request asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockSelector {
    /// Neither `height` nor `blockhash` given.
    Latest,
    Height(u64),
    Hash(String),
}

impl BlockSelector {
    /// Resolve the query, `height` taking precedence over `blockhash`.
    /// Empty values count as absent.
    pub fn from_query(query: &BlockQuery) -> Result<Self, ParamError> {
        let height = query.height.as_deref().filter(|h| !h.is_empty());
        let blockhash = query.blockhash.as_deref().filter(|h| !h.is_empty());

        match (height, blockhash) {
            (None, None) => Ok(BlockSelector::Latest),
            (Some(raw), _) => match raw.parse::<u64>() {
                Ok(height) if height > 0 => Ok(BlockSelector::Height(height)),
                _ => Err(ParamError::InvalidHeight(raw.to_string())),
            },
            (None, Some(hash)) if is_sha256_hash(hash) => Ok(BlockSelector::Hash(hash.to_string())),
            (None, Some(hash)) => Err(ParamError::InvalidBlockHash(hash.to_string())),
        }
    }
}
