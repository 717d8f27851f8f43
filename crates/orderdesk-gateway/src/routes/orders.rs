//! Orders grid endpoint.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    routing::get,
    Json, Router,
};
use orderdesk_core::OrderService;
use orderdesk_proto::{GetOrdersParams, OrdersPage};
use tracing::warn;

use crate::error::AppError;
use crate::json::OrdersQuery;
use crate::AppState;

/// Orders routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/orders", get(list_orders).post(query_orders))
}

/// Serve a page from query string parameters.
async fn list_orders(
    State(state): State<AppState>,
    query: Result<Query<OrdersQuery>, QueryRejection>,
) -> Result<Json<OrdersPage>, AppError> {
    let Query(query) = query.map_err(|err| AppError::MalformedInput(err.body_text()))?;
    serve(state, query.into()).await
}

/// Serve a page from a JSON body.
async fn query_orders(
    State(state): State<AppState>,
    params: Result<Json<GetOrdersParams>, JsonRejection>,
) -> Result<Json<OrdersPage>, AppError> {
    let Json(params) = params.map_err(|err| AppError::MalformedInput(err.body_text()))?;
    serve(state, params).await
}

async fn serve(state: AppState, params: GetOrdersParams) -> Result<Json<OrdersPage>, AppError> {
    let store = state.store.clone();
    let page = tokio::task::spawn_blocking(move || {
        let store = store.lock();
        OrderService::new(&*store).get_orders(&params)
    })
    .await?
    .map_err(|err| {
        warn!(error = %err, "get_orders failed");
        AppError::from(err)
    })?;
    Ok(Json(page))
}
