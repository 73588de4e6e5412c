//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize subsystems in dependency order (metrics, upstream client, server)
//! - Bind the listener last, so traffic only arrives when ready
//! - Turn OS signals into a graceful shutdown with a hard deadline
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - A stuck drain is abandoned after `timeouts.shutdown_grace_secs`

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::GatewayConfig;
use crate::http::GatewayServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;
use crate::upstream::{SochainClient, UpstreamError};

/// Errors that abort startup or serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to initialise upstream client: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to install metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("server error: {0}")]
    Server(#[source] std::io::Error),
}

/// Run the gateway until SIGINT/SIGTERM.
pub async fn run(config: GatewayConfig) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        // Validation guarantees this parses.
        if let Ok(addr) = config.observability.metrics_address.parse::<SocketAddr>() {
            metrics::init_metrics(addr)?;
        }
    }

    let client = SochainClient::new(config.upstream.clone())?;

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.listener.bind_address.clone(),
            source,
        })?;
    let local_addr = listener.local_addr().map_err(StartupError::Server)?;
    tracing::info!(address = %local_addr, "Listening for connections");

    let grace = Duration::from_secs(config.timeouts.shutdown_grace_secs);
    let shutdown = Shutdown::new();
    let server = GatewayServer::new(config, Arc::new(client));
    let mut server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    tokio::select! {
        joined = &mut server_task => {
            return flatten(joined);
        }
        _ = signals::wait_for_shutdown_signal() => {
            tracing::info!("Server shutdown started");
            shutdown.trigger();
        }
    }

    match tokio::time::timeout(grace, &mut server_task).await {
        Ok(joined) => flatten(joined),
        Err(_) => {
            tracing::warn!(grace_secs = grace.as_secs(), "Server shutdown was forced");
            server_task.abort();
            Ok(())
        }
    }
}

fn flatten(
    joined: Result<Result<(), std::io::Error>, tokio::task::JoinError>,
) -> Result<(), StartupError> {
    match joined {
        Ok(result) => result.map_err(StartupError::Server),
        Err(e) => Err(StartupError::Server(std::io::Error::new(
            std::io::ErrorKind::Other,
            e,
        ))),
    }
}
