//! Endpoint handlers.
//!
//! # Block lookup
//! ```text
//! network id ──invalid──▶ 400
//!     │
//!     ├─ no height, no blockhash → network_info → block_by_height(latest)
//!     ├─ height (> 0)            → block_by_height
//!     └─ blockhash (64 hex)      → block_by_hash
//!     │
//!     ▼
//! enrich first 10 tx ids → merge → 200
//! ```

use axum::{
    extract::{Path, RawQuery, State},
    Json,
};

use crate::enrichment::LookupFailure;
use crate::http::params::{parse_network, parse_tx_hash, BlockQuery, BlockSelector, ParamError};
use crate::http::response::{ApiError, BlockResponse, HealthStatus, Lookup, TransactionResponse};
use crate::http::server::AppState;
use crate::upstream::{Network, UpstreamError};

const LATEST_HEIGHT_UNAVAILABLE: &str = "one of query params 'height' or 'blockhash' is mandatory";

fn rejected(err: ParamError) -> ApiError {
    tracing::info!(error = %err, "Rejected request parameters");
    err.into()
}

fn upstream_failure(lookup: Lookup, network: Network, error: UpstreamError) -> ApiError {
    let api_error = lookup.failure(&error);
    match error.status() {
        Some(400) | Some(404) => {
            tracing::info!(network = %network, ?lookup, error = %error, "Upstream lookup rejected")
        }
        _ => tracing::warn!(network = %network, ?lookup, error = %error, "Upstream lookup failed"),
    }
    api_error
}

fn log_lookup_failures(network: Network, failures: &[LookupFailure]) {
    for failure in failures {
        match failure.error.status() {
            Some(status) => tracing::warn!(
                network = %network,
                txhash = %failure.tx_id,
                status,
                error = %failure.error,
                "Unable to fetch transaction"
            ),
            None => tracing::info!(
                network = %network,
                txhash = %failure.tx_id,
                error = %failure.error,
                "Unable to fetch transaction"
            ),
        }
    }
}

/// `GET /network/{id}`: a block with up to ten of its transactions.
pub async fn get_block(
    State(state): State<AppState>,
    Path(id): Path<String>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<BlockResponse>, ApiError> {
    let network = parse_network(&id).map_err(rejected)?;
    let query = BlockQuery::parse(raw_query.as_deref());
    let selector = BlockSelector::from_query(&query).map_err(rejected)?;

    let block = match selector {
        BlockSelector::Latest => {
            let info = state.connector.network_info(network).await.map_err(|e| {
                tracing::info!(network = %network, error = %e, "Unable to resolve latest block height");
                ApiError::BadRequest(LATEST_HEIGHT_UNAVAILABLE.to_string())
            })?;
            state
                .connector
                .block_by_height(network, info.data.blocks)
                .await
                .map_err(|e| upstream_failure(Lookup::BlockByHeight, network, e))?
        }
        BlockSelector::Height(height) => state
            .connector
            .block_by_height(network, height)
            .await
            .map_err(|e| upstream_failure(Lookup::BlockByHeight, network, e))?,
        BlockSelector::Hash(hash) => state
            .connector
            .block_by_hash(network, &hash)
            .await
            .map_err(|e| upstream_failure(Lookup::BlockByHash, network, e))?,
    };

    let outcome = state.enricher.enrich(network, &block.data.txs).await;
    log_lookup_failures(network, &outcome.failures);

    Ok(Json(BlockResponse::new(&block.data, &outcome.transactions)))
}

/// `GET /network/{id}/tx/{txhash}`: a single transaction.
pub async fn get_transaction(
    State(state): State<AppState>,
    Path((id, txhash)): Path<(String, String)>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let network = parse_network(&id).map_err(rejected)?;
    let tx_hash = parse_tx_hash(&txhash).map_err(rejected)?;

    let tx = state
        .connector
        .transaction(network, tx_hash)
        .await
        .map_err(|e| upstream_failure(Lookup::Transaction, network, e))?;

    Ok(Json(TransactionResponse::from(&tx.data)))
}

/// `GET /network`: the network segment is required.
pub async fn missing_network() -> ApiError {
    rejected(ParamError::MissingNetwork)
}

/// `GET /network/{id}/tx`: the transaction hash segment is required.
pub async fn missing_tx_hash(Path(id): Path<String>) -> ApiError {
    match parse_network(&id) {
        Ok(_) => rejected(ParamError::MissingTxHash),
        Err(e) => rejected(e),
    }
}

pub async fn get_health() -> Json<HealthStatus> {
    Json(HealthStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
    })
}
