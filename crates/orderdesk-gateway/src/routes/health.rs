//! Health check endpoint.

use axum::{extract::State, routing::get, Json, Router};
use orderdesk_core::Store;

use crate::json::HealthResponse;
use crate::AppState;

/// Health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let store = state.store.clone();
    let store_connected = tokio::task::spawn_blocking(move || {
        let store = store.lock();
        store.query("SELECT 1", &[]).is_ok()
    })
    .await
    .unwrap_or(false);

    Json(HealthResponse {
        status: if store_connected { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store_connected,
    })
}
