//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, metrics)
//! - Answer timed-out requests with the same JSON error shape as handlers
//! - Bind server to listener
//! - Drain in-flight requests on shutdown

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{MatchedPath, Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::enrichment::Enricher;
use crate::http::handlers::{
    get_block, get_health, get_transaction, missing_network, missing_tx_hash,
};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::http::response::ApiError;
use crate::observability::metrics;
use crate::observability::tracing::make_request_span;
use crate::upstream::Connector;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub connector: Arc<dyn Connector>,
    pub enricher: Enricher,
}

impl AppState {
    pub fn new(connector: Arc<dyn Connector>, config: &GatewayConfig) -> Self {
        let enricher = Enricher::new(Arc::clone(&connector), config.enrichment.max_concurrency);
        Self {
            connector,
            enricher,
        }
    }
}

/// HTTP server for the explorer gateway.
pub struct GatewayServer {
    router: Router,
    config: GatewayConfig,
}

impl GatewayServer {
    /// Create a new HTTP server serving data from `connector`.
    pub fn new(config: GatewayConfig, connector: Arc<dyn Connector>) -> Self {
        let state = AppState::new(connector, &config);
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    pub fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/health", get(get_health))
            .route("/network", get(missing_network))
            .route("/network/", get(missing_network))
            .route("/network/{id}", get(get_block))
            .route("/network/{id}/tx", get(missing_tx_hash))
            .route("/network/{id}/tx/", get(missing_tx_hash))
            .route("/network/{id}/tx/{txhash}", get(get_transaction))
            .route_layer(middleware::from_fn(track_metrics))
            .with_state(state)
            .layer(middleware::from_fn_with_state(
                Duration::from_secs(config.timeouts.request_secs),
                enforce_timeout,
            ))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<Body>))
            .layer(set_request_id_layer())
    }

    /// Run the server until a shutdown signal arrives on `shutdown`.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Answer 500 when a request outlives `timeouts.request_secs`.
///
/// Dropping the handler future aborts its pending upstream lookups.
async fn enforce_timeout(
    State(limit): State<Duration>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(path = %path, limit_secs = limit.as_secs(), "Request timed out");
            ApiError::Internal("request timed out".to_string()).into_response()
        }
    }
}

async fn track_metrics(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let response = next.run(request).await;
    metrics::record_request(&method, &route, response.status().as_u16(), start);
    response
}
