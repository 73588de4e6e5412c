//! Explorer REST client with timeout and error classification.
//!
//! # Responsibilities
//! - Build one GET per logical operation against the configured base URL
//! - Decode JSON bodies into typed results
//! - Classify failures as transport, decode or upstream status
//!
//! # Design Decisions
//! - Exactly one attempt per call; retries are not this layer's job
//! - No caching and no per-call mutable state, so one client is shared by
//!   every concurrent lookup

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::observability::metrics;
use crate::upstream::types::{
    Block, Network, NetworkInfo, Transaction, UpstreamConfig, UpstreamError, UpstreamResult,
};

/// Read-only access to a blockchain explorer.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Network summary, including the current chain height.
    async fn network_info(&self, network: Network) -> UpstreamResult<NetworkInfo>;

    /// Block at the given height.
    async fn block_by_height(&self, network: Network, height: u64) -> UpstreamResult<Block>;

    /// Block with the given hash.
    async fn block_by_hash(&self, network: Network, hash: &str) -> UpstreamResult<Block>;

    /// Full transaction detail.
    async fn transaction(&self, network: Network, tx_id: &str) -> UpstreamResult<Transaction>;
}

/// HTTP client for the SoChain v2 explorer API.
#[derive(Clone)]
pub struct SochainClient {
    http: reqwest::Client,
    /// Base URL without trailing slash.
    base_url: String,
    config: UpstreamConfig,
}

impl SochainClient {
    /// Create a new explorer client.
    ///
    /// # Arguments
    /// * `config` - Upstream configuration
    ///
    /// # Returns
    /// A new client or error if the HTTP stack cannot be initialised
    pub fn new(config: UpstreamConfig) -> UpstreamResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| UpstreamError::Transport(format!("failed to build HTTP client: {}", e)))?;

        let base_url = config.base_url.trim_end_matches('/').to_string();

        tracing::info!(
            base_url = %base_url,
            request_timeout_secs = config.request_timeout_secs,
            "Explorer client initialized"
        );

        Ok(Self {
            http,
            base_url,
            config,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: String,
        resource: String,
    ) -> UpstreamResult<T> {
        let url = self.url(&path);
        let start = Instant::now();

        let result = self.fetch(&url, resource).await;

        let outcome = match &result {
            Ok(_) => "ok".to_string(),
            Err(UpstreamError::Status { status, .. }) => status.to_string(),
            Err(UpstreamError::Transport(_)) => "transport".to_string(),
            Err(UpstreamError::Decode(_)) => "decode".to_string(),
        };
        tracing::debug!(operation, url = %url, outcome = %outcome, "Upstream call finished");
        metrics::record_upstream_request(operation, outcome, start);

        result
    }

    async fn fetch<T: DeserializeOwned>(&self, url: &str, resource: String) -> UpstreamResult<T> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                resource,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        serde_json::from_slice(&body).map_err(|e| UpstreamError::Decode(e.to_string()))
    }
}

#[async_trait]
impl Connector for SochainClient {
    async fn network_info(&self, network: Network) -> UpstreamResult<NetworkInfo> {
        self.get_json(
            "network_info",
            format!("get_info/{}", network),
            format!("network '{}'", network),
        )
        .await
    }

    async fn block_by_height(&self, network: Network, height: u64) -> UpstreamResult<Block> {
        self.get_json(
            "block_by_height",
            format!("get_block/{}/{}", network, height),
            format!("height '{}'", height),
        )
        .await
    }

    async fn block_by_hash(&self, network: Network, hash: &str) -> UpstreamResult<Block> {
        self.get_json(
            "block_by_hash",
            format!("get_block/{}/{}", network, hash),
            format!("blockhash '{}'", hash),
        )
        .await
    }

    async fn transaction(&self, network: Network, tx_id: &str) -> UpstreamResult<Transaction> {
        self.get_json(
            "transaction",
            format!("tx/{}/{}", network, tx_id),
            format!("txhash '{}'", tx_id),
        )
        .await
    }
}

impl std::fmt::Debug for SochainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SochainClient")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.config.request_timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(base_url: &str) -> UpstreamConfig {
        UpstreamConfig {
            base_url: base_url.to_string(),
            request_timeout_secs: 2,
            connect_timeout_secs: 1,
            ..UpstreamConfig::default()
        }
    }

    #[test]
    fn test_url_building_trims_trailing_slash() {
        let client = SochainClient::new(test_config("http://127.0.0.1:1/api/v2/")).unwrap();
        assert_eq!(client.url("tx/btc/abc"), "http://127.0.0.1:1/api/v2/tx/btc/abc");
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_transport_error() {
        // Bind then drop to obtain a port nobody listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = SochainClient::new(test_config(&format!("http://{}/api/v2", addr))).unwrap();
        let err = client.network_info(Network::Btc).await.unwrap_err();
        assert!(matches!(err, UpstreamError::Transport(_)));
        assert_eq!(err.status(), None);
    }
}
