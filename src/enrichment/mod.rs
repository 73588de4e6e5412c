//! Block enrichment subsystem.
//!
//! # Data Flow
//! ```text
//! Block summary (ordered tx ids)
//!     → cap at MAX_TX_PER_BLOCK
//!     → pipeline.rs (one lookup task per id, bounded by a semaphore)
//!     → index-ordered gather
//!     → EnrichmentOutcome { transactions, failures }
//! ```
//!
//! # Design Decisions
//! - Failed lookups are dropped from the aggregate, never fatal
//! - Output order follows the block's own transaction order
//! - Tasks live in a JoinSet so an abandoned request aborts its lookups

pub mod pipeline;

pub use pipeline::{EnrichmentOutcome, Enricher, LookupFailure, MAX_TX_PER_BLOCK};
