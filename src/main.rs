//! Explorer Gateway
//!
//! A read-only HTTP gateway in front of a public blockchain explorer.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server (request id, trace, timeout, metrics)
//!                         │
//!                         ▼
//!                     http::params (network, height, hash validation)
//!                         │
//!                         ▼
//!                     http::handlers ──▶ upstream::client ──▶ Explorer API
//!                         │                   ▲
//!                         ▼                   │
//!                     enrichment::pipeline ───┘ (≤ 10 tx lookups, concurrent)
//!                         │
//!                         ▼
//!     Client Response ◀── http::response (shape, status mapping)
//! ```

use std::path::PathBuf;

use clap::Parser;

use explorer_gateway::config::load_config;
use explorer_gateway::lifecycle::startup;
use explorer_gateway::observability::logging;

#[derive(Parser)]
#[command(name = "explorer-gateway")]
#[command(about = "Read-only HTTP gateway for BTC, LTC and DOGE explorer data", long_about = None)]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    logging::init_logging(config.environment, &config.observability.log_level)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = ?config.environment,
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        "explorer-gateway starting"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
