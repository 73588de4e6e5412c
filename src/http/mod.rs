//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → params.rs (network, height, hash validation)
//!     → handlers.rs (upstream lookups, enrichment)
//!     → response.rs (response shape, status mapping)
//!     → Send to client
//! ```

pub mod handlers;
pub mod params;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::{ApiError, BlockResponse, TransactionResponse};
pub use server::{AppState, GatewayServer};
