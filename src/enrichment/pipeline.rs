//! Concurrent transaction lookup for a block.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::observability::metrics;
use crate::upstream::types::Transaction;
use crate::upstream::{Connector, Network, UpstreamError, UpstreamResult};

/// Maximum number of transactions enriched per block.
pub const MAX_TX_PER_BLOCK: usize = 10;

/// A transaction id whose lookup failed, with that lookup's own error.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupFailure {
    pub tx_id: String,
    pub error: UpstreamError,
}

/// Result of enriching one block.
///
/// `transactions.len() + failures.len()` always equals the number of ids
/// processed (the input capped at [`MAX_TX_PER_BLOCK`]).
#[derive(Debug, Default)]
pub struct EnrichmentOutcome {
    /// Fetched transactions, in the order their ids were supplied.
    pub transactions: Vec<Transaction>,
    pub failures: Vec<LookupFailure>,
}

impl EnrichmentOutcome {
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }
}

/// Fans transaction lookups out over the runtime and gathers the results.
#[derive(Clone)]
pub struct Enricher {
    connector: Arc<dyn Connector>,
    max_concurrency: usize,
}

impl Enricher {
    /// `max_concurrency` is clamped to `1..=MAX_TX_PER_BLOCK`.
    pub fn new(connector: Arc<dyn Connector>, max_concurrency: usize) -> Self {
        Self {
            connector,
            max_concurrency: max_concurrency.clamp(1, MAX_TX_PER_BLOCK),
        }
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Look up the first [`MAX_TX_PER_BLOCK`] transaction ids concurrently.
    ///
    /// Every lookup runs to completion independently; a failure is recorded
    /// and never affects its siblings. Lookups still running when the
    /// returned future is dropped are aborted.
    pub async fn enrich(&self, network: Network, tx_ids: &[String]) -> EnrichmentOutcome {
        let ids = &tx_ids[..tx_ids.len().min(MAX_TX_PER_BLOCK)];
        if ids.is_empty() {
            return EnrichmentOutcome::default();
        }

        let permits = Arc::new(Semaphore::new(self.max_concurrency));
        let mut tasks = JoinSet::new();
        let mut slot_by_task = HashMap::with_capacity(ids.len());

        for (index, tx_id) in ids.iter().enumerate() {
            let connector = Arc::clone(&self.connector);
            let permits = Arc::clone(&permits);
            let tx_id = tx_id.clone();

            let handle = tasks.spawn(async move {
                let _permit = permits
                    .acquire_owned()
                    .await
                    .map_err(|e| UpstreamError::Transport(format!("lookup pool closed: {}", e)))?;
                connector.transaction(network, &tx_id).await
            });
            slot_by_task.insert(handle.id(), index);
        }

        let mut slots: Vec<Option<UpstreamResult<Transaction>>> =
            std::iter::repeat_with(|| None).take(ids.len()).collect();

        while let Some(joined) = tasks.join_next_with_id().await {
            let (task_id, result) = match joined {
                Ok((task_id, result)) => (task_id, result),
                Err(e) => (
                    e.id(),
                    Err(UpstreamError::Transport(format!("lookup task failed: {}", e))),
                ),
            };
            if let Some(&index) = slot_by_task.get(&task_id) {
                slots[index] = Some(result);
            }
        }

        let mut outcome = EnrichmentOutcome::default();
        for (tx_id, slot) in ids.iter().zip(slots) {
            match slot {
                Some(Ok(tx)) => outcome.transactions.push(tx),
                Some(Err(error)) => outcome.failures.push(LookupFailure {
                    tx_id: tx_id.clone(),
                    error,
                }),
                None => outcome.failures.push(LookupFailure {
                    tx_id: tx_id.clone(),
                    error: UpstreamError::Transport("lookup produced no result".to_string()),
                }),
            }
        }

        tracing::debug!(
            network = %network,
            requested = tx_ids.len(),
            processed = ids.len(),
            fetched = outcome.transactions.len(),
            failed = outcome.failures.len(),
            "Block transactions enriched"
        );
        metrics::record_enrichment(network.as_str(), outcome.failures.len());

        outcome
    }
}
