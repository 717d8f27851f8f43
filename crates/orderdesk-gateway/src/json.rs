//! JSON request and response bodies that are specific to HTTP.

use orderdesk_proto::{Count, GetOrdersParams};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status.
    pub status: String,
    /// Gateway version.
    pub version: String,
    /// Whether the store answered a probe query.
    pub store_connected: bool,
}

/// `GET /orders` query string.
///
/// Query strings carry only text, so the models arrive JSON-encoded.
#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    pub start: Option<String>,
    pub size: Option<String>,
    #[serde(alias = "filterModel")]
    pub filter_model: Option<String>,
    #[serde(alias = "sortModel")]
    pub sort_model: Option<String>,
}

impl From<OrdersQuery> for GetOrdersParams {
    fn from(query: OrdersQuery) -> Self {
        GetOrdersParams {
            start: query.start.map(Count::Text),
            size: query.size.map(Count::Text),
            filter_model: query.filter_model.map(serde_json::Value::String),
            sort_model: query.sort_model.map(serde_json::Value::String),
        }
    }
}
