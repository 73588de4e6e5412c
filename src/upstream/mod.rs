//! Upstream explorer integration subsystem.
//!
//! # Data Flow
//! ```text
//! Validated request (network, height | hash | txid)
//!     → client.rs (one GET per operation, timeouts)
//!     → types.rs (decode explorer JSON, classify failures)
//!     → handlers / enrichment pipeline
//! ```
//!
//! # Constraints
//! - Inputs are validated by the caller; the client treats ids as opaque
//! - Non-2xx statuses are surfaced with their code, never swallowed
//! - Raw upstream bodies are never forwarded to gateway callers

pub mod client;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use client::{Connector, SochainClient};
pub use types::{Network, UpstreamError, UpstreamResult};
