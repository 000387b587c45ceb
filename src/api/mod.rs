//! HTTP API
//!
//! A thin JSON layer over the log reader, the pool status lookup and the
//! device restart call. Handlers hold no state of their own.

pub mod handlers;

use crate::config::Config;
use crate::device::DeviceClient;
use crate::error::{AppError, Result};

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

/// Shared, read-only handler state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub client: Arc<dyn DeviceClient>,
}

impl AppState {
    pub fn new(config: Arc<Config>, client: Arc<dyn DeviceClient>) -> Self {
        Self { config, client }
    }
}

/// All routes
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/combined-data", get(handlers::combined_data))
        .route("/latest-data", get(handlers::latest_data))
        .route("/medie-data", get(handlers::average_data))
        .route("/max-hashrate", get(handlers::max_hashrate))
        .route("/sessionbest", get(handlers::session_best))
        .route("/report", get(handlers::report))
        .route("/ckpool-status", get(handlers::pool_status))
        .route("/reset-bitaxe/{ip}", post(handlers::restart_device))
        .with_state(state)
}

/// Bind `addr` and serve until the process exits
pub async fn serve(state: AppState, addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Server(format!("failed to bind {addr}: {e}")))?;

    log::info!("HTTP API listening on http://{}", addr);

    axum::serve(listener, build_router(state))
        .await
        .map_err(|e| AppError::Server(e.to_string()))
}
