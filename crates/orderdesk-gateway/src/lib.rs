//! orderdesk HTTP/JSON gateway.
//!
//! Serves the orders grid: `GET /orders` takes the grid parameters as a query
//! string, `POST /orders` takes them as a JSON body. Both answer with
//! `{"result": [...], "end": n}`.

pub mod config;
pub mod error;
pub mod json;
pub mod routes;

pub use config::{Args, GatewayConfig};
pub use error::AppError;

use std::sync::Arc;

use axum::Router;
use orderdesk_core::SqliteStore;
use parking_lot::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    /// Order store. A SQLite connection serves one call at a time.
    pub store: Arc<Mutex<SqliteStore>>,
}

impl AppState {
    /// Create new application state.
    pub fn new(store: SqliteStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }
}

/// Create the router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::health::routes())
        .merge(routes::orders::routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
