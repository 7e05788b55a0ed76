//! REST API over a solved dispatch.
//!
//! Provides three GET endpoints:
//! - `/summary`: market report and scenario metadata
//! - `/snapshots`: per-snapshot results with optional range filtering
//! - `/generators`: the fleet with per-technology energy and price setting

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tracing::info;

use crate::market::kpi::MarketReport;
use crate::market::types::DispatchResult;

pub use types::{ErrorResponse, GeneratorRecord, SnapshotQuery, SnapshotRecord, SummaryResponse};

/// Immutable application state shared across all request handlers.
///
/// Built once after the dispatch is solved; read-only, so no locks.
pub struct AppState {
    /// Solved dispatch.
    pub result: DispatchResult,
    /// Aggregate report for `result`.
    pub report: MarketReport,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/summary", get(handlers::get_summary))
        .route("/snapshots", get(handlers::get_snapshots))
        .route("/generators", get(handlers::get_generators))
        .with_state(state)
}

/// Binds to `addr` and serves the API until the process is stopped.
///
/// # Errors
///
/// Returns an I/O error if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    eprintln!("API server listening on http://{addr}");
    axum::serve(listener, app).await
}
