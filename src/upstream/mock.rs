//! In-memory explorer used by unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::upstream::client::Connector;
use crate::upstream::types::{
    Block, BlockData, Network, NetworkData, NetworkInfo, Transaction, TransactionData,
    UpstreamError, UpstreamResult,
};

/// Canned explorer responses. Anything not registered answers 404.
#[derive(Default)]
pub struct MockConnector {
    network_info: Option<UpstreamResult<NetworkInfo>>,
    blocks_by_height: HashMap<u64, UpstreamResult<Block>>,
    blocks_by_hash: HashMap<String, UpstreamResult<Block>>,
    transactions: HashMap<String, UpstreamResult<Transaction>>,
    tx_delays: HashMap<String, Duration>,
    calls: AtomicUsize,
    tx_in_flight: AtomicUsize,
    tx_peak_in_flight: AtomicUsize,
    tx_completed: AtomicUsize,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_height(mut self, height: u64) -> Self {
        self.network_info = Some(Ok(NetworkInfo {
            status: "success".to_string(),
            data: NetworkData {
                blocks: height,
                ..NetworkData::default()
            },
        }));
        self
    }

    pub fn with_network_info_error(mut self, error: UpstreamError) -> Self {
        self.network_info = Some(Err(error));
        self
    }

    pub fn with_block(mut self, height: u64, block: UpstreamResult<Block>) -> Self {
        self.blocks_by_height.insert(height, block);
        self
    }

    pub fn with_block_hash(mut self, hash: &str, block: UpstreamResult<Block>) -> Self {
        self.blocks_by_hash.insert(hash.to_string(), block);
        self
    }

    pub fn with_tx(mut self, tx_id: &str, tx: UpstreamResult<Transaction>) -> Self {
        self.transactions.insert(tx_id.to_string(), tx);
        self
    }

    pub fn with_tx_delay(mut self, tx_id: &str, delay: Duration) -> Self {
        self.tx_delays.insert(tx_id.to_string(), delay);
        self
    }

    /// Total upstream calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of transaction lookups observed running at once.
    pub fn peak_concurrency(&self) -> usize {
        self.tx_peak_in_flight.load(Ordering::SeqCst)
    }

    /// Transaction lookups that ran to the end.
    pub fn completed_lookups(&self) -> usize {
        self.tx_completed.load(Ordering::SeqCst)
    }

    fn not_found(resource: String) -> UpstreamError {
        UpstreamError::Status {
            status: 404,
            resource,
        }
    }
}

/// Block fixture with the given number and transaction ids.
pub fn block(block_no: u64, time: i64, txs: &[&str]) -> Block {
    Block {
        status: "success".to_string(),
        data: BlockData {
            network: "BTC".to_string(),
            blockhash: "1".to_string(),
            block_no,
            time,
            previous_blockhash: "1".to_string(),
            next_blockhash: "1".to_string(),
            size: 1,
            txs: txs.iter().map(|t| t.to_string()).collect(),
            ..BlockData::default()
        },
    }
}

/// Transaction fixture with fee and value of "1".
pub fn transaction(txid: &str, time: i64) -> Transaction {
    Transaction {
        status: "success".to_string(),
        data: TransactionData {
            txid: txid.to_string(),
            time,
            fee: "1".to_string(),
            sent_value: "1".to_string(),
            ..TransactionData::default()
        },
        ..Transaction::default()
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn network_info(&self, network: Network) -> UpstreamResult<NetworkInfo> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.network_info
            .clone()
            .unwrap_or_else(|| Err(Self::not_found(format!("network '{}'", network))))
    }

    async fn block_by_height(&self, _network: Network, height: u64) -> UpstreamResult<Block> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.blocks_by_height
            .get(&height)
            .cloned()
            .unwrap_or_else(|| Err(Self::not_found(format!("height '{}'", height))))
    }

    async fn block_by_hash(&self, _network: Network, hash: &str) -> UpstreamResult<Block> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.blocks_by_hash
            .get(hash)
            .cloned()
            .unwrap_or_else(|| Err(Self::not_found(format!("blockhash '{}'", hash))))
    }

    async fn transaction(&self, _network: Network, tx_id: &str) -> UpstreamResult<Transaction> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.tx_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.tx_peak_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.tx_delays.get(tx_id) {
            tokio::time::sleep(*delay).await;
        } else {
            tokio::task::yield_now().await;
        }

        self.tx_in_flight.fetch_sub(1, Ordering::SeqCst);
        self.tx_completed.fetch_add(1, Ordering::SeqCst);
        self.transactions
            .get(tx_id)
            .cloned()
            .unwrap_or_else(|| Err(Self::not_found(format!("txhash '{}'", tx_id))))
    }
}
