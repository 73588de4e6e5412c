//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_http_requests_total` (counter): inbound requests by route, status
//! - `gateway_http_request_duration_seconds` (histogram): inbound latency
//! - `gateway_upstream_requests_total` (counter): explorer calls by operation, outcome
//! - `gateway_upstream_request_duration_seconds` (histogram): explorer latency
//! - `gateway_enrichment_failures_total` (counter): dropped transaction lookups
//!
//! Recording is a no-op until a recorder is installed.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its HTTP scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one inbound HTTP request.
pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    ::metrics::counter!(
        "gateway_http_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!(
        "gateway_http_request_duration_seconds",
        "method" => method.to_string(),
        "route" => route.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record one explorer call.
pub fn record_upstream_request(operation: &'static str, outcome: String, start: Instant) {
    ::metrics::counter!(
        "gateway_upstream_requests_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
    ::metrics::histogram!(
        "gateway_upstream_request_duration_seconds",
        "operation" => operation
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record lookups dropped while enriching one block.
pub fn record_enrichment(network: &'static str, failures: usize) {
    if failures > 0 {
        ::metrics::counter!("gateway_enrichment_failures_total", "network" => network)
            .increment(failures as u64);
    }
}
