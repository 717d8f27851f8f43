//! The `get_orders` call contract.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::grid::{decode_sort_model, FilterModel, SortDescriptor};

/// Page size used when the caller does not send one.
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// A paging parameter that may arrive as a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Count {
    /// Any JSON number; negative and fractional values fail in `resolve`.
    Number(serde_json::Number),
    Text(String),
}

impl Count {
    fn resolve(&self, name: &str) -> Result<u64, Error> {
        let malformed = |got: &dyn std::fmt::Display| {
            Error::MalformedInput(format!("{name} must be a non-negative integer, got {got}"))
        };
        match self {
            Count::Number(n) => n.as_u64().ok_or_else(|| malformed(n)),
            Count::Text(s) => s.trim().parse().map_err(|_| malformed(&format!("{s:?}"))),
        }
    }
}

impl From<u64> for Count {
    fn from(n: u64) -> Self {
        Count::Number(n.into())
    }
}

/// Raw `get_orders` parameters, exactly as the transport delivers them.
///
/// Filter and sort models may be structured JSON or JSON-encoded strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetOrdersParams {
    #[serde(default)]
    pub start: Option<Count>,
    #[serde(default)]
    pub size: Option<Count>,
    #[serde(default, alias = "filterModel")]
    pub filter_model: Option<serde_json::Value>,
    #[serde(default, alias = "sortModel")]
    pub sort_model: Option<serde_json::Value>,
}

impl GetOrdersParams {
    /// Decode into a typed request, applying defaults.
    pub fn decode(&self) -> Result<OrdersRequest, Error> {
        let start = match &self.start {
            Some(start) => start.resolve("start")?,
            None => 0,
        };
        let size = match &self.size {
            Some(size) => size.resolve("size")?,
            None => DEFAULT_PAGE_SIZE,
        };
        if size == 0 {
            return Err(Error::MalformedInput("size must be greater than zero".into()));
        }

        let filter_model = match &self.filter_model {
            Some(raw) => FilterModel::decode(raw)?,
            None => FilterModel::new(),
        };
        let sort_model = match &self.sort_model {
            Some(raw) => decode_sort_model(raw)?,
            None => Vec::new(),
        };

        Ok(OrdersRequest {
            start,
            size,
            filter_model,
            sort_model,
        })
    }
}

/// A decoded `get_orders` request.
#[derive(Debug, Clone, PartialEq)]
pub struct OrdersRequest {
    /// Row offset of the page.
    pub start: u64,
    /// Maximum rows to return; always positive.
    pub size: u64,
    pub filter_model: FilterModel,
    pub sort_model: Vec<SortDescriptor>,
}

impl Default for OrdersRequest {
    fn default() -> Self {
        Self {
            start: 0,
            size: DEFAULT_PAGE_SIZE,
            filter_model: FilterModel::new(),
            sort_model: Vec::new(),
        }
    }
}

impl OrdersRequest {
    /// Create a request for the first page with the default size.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page window.
    pub fn with_page(mut self, start: u64, size: u64) -> Self {
        self.start = start;
        self.size = size;
        self
    }

    /// Set the filter model.
    pub fn with_filter(mut self, filter_model: FilterModel) -> Self {
        self.filter_model = filter_model;
        self
    }

    /// Append a sort key.
    pub fn with_sort(mut self, sort: SortDescriptor) -> Self {
        self.sort_model.push(sort);
        self
    }
}
