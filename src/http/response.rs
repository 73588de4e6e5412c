//! Response shapes and error mapping.
//!
//! # Responsibilities
//! - Reduce explorer payloads to the gateway's response shape
//! - Render epoch timestamps as RFC 3339 at the response boundary
//! - Map upstream failures to HTTP status codes
//!
//! # Design Decisions
//! - Error bodies are a plain JSON string; upstream detail stays in the logs
//! - Upstream 404 → 404, upstream 400 → 400, anything else → 500

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, SecondsFormat};
use serde::{Deserialize, Serialize};

use crate::http::params::ParamError;
use crate::upstream::types::{BlockData, Transaction, TransactionData};
use crate::upstream::UpstreamError;

/// Format seconds since epoch as RFC 3339 in UTC.
///
/// Out of range values render as an empty string.
pub fn format_timestamp(secs: i64) -> String {
    DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockResponse {
    pub blocknumber: u64,
    pub timestamp: String,
    pub previoushash: String,
    pub nexthash: String,
    pub size: u64,
    pub transactions: Vec<TransactionResponse>,
}

impl BlockResponse {
    pub fn new(block: &BlockData, transactions: &[Transaction]) -> Self {
        Self {
            blocknumber: block.block_no,
            timestamp: format_timestamp(block.time),
            previoushash: block.previous_blockhash.clone(),
            nexthash: block.next_blockhash.clone(),
            size: block.size,
            transactions: transactions
                .iter()
                .map(|tx| TransactionResponse::from(&tx.data))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransactionResponse {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub txid: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub time: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub fee: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sent_value: String,
}

impl From<&TransactionData> for TransactionResponse {
    fn from(tx: &TransactionData) -> Self {
        Self {
            txid: tx.txid.clone(),
            time: format_timestamp(tx.time),
            fee: tx.fee.clone(),
            sent_value: tx.sent_value.clone(),
        }
    }
}

/// Liveness payload.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub version: &'static str,
    pub status: &'static str,
}

/// A request failure, rendered as a status code and a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(m) | ApiError::NotFound(m) | ApiError::Internal(m) => m,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::BadRequest(m) | ApiError::NotFound(m) | ApiError::Internal(m) => m,
        };
        (status, Json(message)).into_response()
    }
}

impl From<ParamError> for ApiError {
    fn from(err: ParamError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

/// The upstream operation a failure came from; selects the caller message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    BlockByHeight,
    BlockByHash,
    Transaction,
}

impl Lookup {
    fn not_found(&self) -> &'static str {
        match self {
            Lookup::BlockByHeight => "unable to find block for given height",
            Lookup::BlockByHash => "unable to find block for given hash",
            Lookup::Transaction => "unable to find tx for given hash",
        }
    }

    fn bad_request(&self) -> &'static str {
        match self {
            Lookup::BlockByHeight => "bad request block for given height",
            Lookup::BlockByHash => "bad request block for given hash",
            Lookup::Transaction => "bad request tx for given hash",
        }
    }

    fn internal(&self) -> &'static str {
        match self {
            Lookup::BlockByHeight => "unable to fetch block for given height",
            Lookup::BlockByHash => "unable to fetch block by hash",
            Lookup::Transaction => "unable to fetch transaction",
        }
    }

    /// Map an upstream failure of this lookup to the caller-facing error.
    pub fn failure(&self, error: &UpstreamError) -> ApiError {
        match error.status() {
            Some(404) => ApiError::NotFound(self.not_found().to_string()),
            Some(400) => ApiError::BadRequest(self.bad_request().to_string()),
            _ => ApiError::Internal(self.internal().to_string()),
        }
    }
}
