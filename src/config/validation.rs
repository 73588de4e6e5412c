//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, ports valid)
//! - Check the upstream URL is usable as a base for request paths
//! - Check the inbound request timeout outlasts the upstream calls it waits on
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;
use crate::enrichment::MAX_TX_PER_BLOCK;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(message) = check_host_port(&config.listener.bind_address) {
        errors.push(ValidationError::new("listener.bind_address", message));
    }

    match Url::parse(&config.upstream.base_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::new(
            "upstream.base_url",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new("upstream.base_url", e.to_string())),
    }

    if config.upstream.request_timeout_secs == 0 {
        errors.push(ValidationError::new("upstream.request_timeout_secs", "must be greater than 0"));
    }
    if config.upstream.connect_timeout_secs == 0 {
        errors.push(ValidationError::new("upstream.connect_timeout_secs", "must be greater than 0"));
    }

    let concurrency = config.enrichment.max_concurrency;
    if concurrency == 0 || concurrency > MAX_TX_PER_BLOCK {
        errors.push(ValidationError::new(
            "enrichment.max_concurrency",
            format!("must be between 1 and {}", MAX_TX_PER_BLOCK),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    } else if let Some(budget) = upstream_budget_secs(config) {
        if config.timeouts.request_secs < budget {
            errors.push(ValidationError::new(
                "timeouts.request_secs",
                format!("must be at least {} to cover the upstream calls of one request", budget),
            ));
        }
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", config.observability.log_level),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Longest time one block request can spend waiting on the explorer.
///
/// Latest-block requests make two sequential calls (network info, block)
/// followed by the transaction lookups, which run in rounds of
/// `max_concurrency`. `None` when the inputs are themselves invalid.
pub fn upstream_budget_secs(config: &GatewayConfig) -> Option<u64> {
    let per_call = config.upstream.request_timeout_secs;
    let concurrency = config.enrichment.max_concurrency;
    if per_call == 0 || concurrency == 0 || concurrency > MAX_TX_PER_BLOCK {
        return None;
    }
    let lookup_rounds = MAX_TX_PER_BLOCK.div_ceil(concurrency) as u64;
    Some((2 + lookup_rounds) * per_call)
}

fn check_host_port(address: &str) -> Result<(), String> {
    let (host, port) = address
        .rsplit_once(':')
        .ok_or_else(|| format!("'{}' is missing a port", address))?;
    if host.is_empty() {
        return Err(format!("'{}' is missing a host", address));
    }
    port.parse::<u16>()
        .map(|_| ())
        .map_err(|_| format!("'{}' is not a valid port", port))
}
