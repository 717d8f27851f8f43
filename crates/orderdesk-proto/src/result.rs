//! Result types for `get_orders` responses.

use serde::{Deserialize, Serialize};

/// One purchase-order line, as shown in the grid.
///
/// The enrichment fields are filled in after the page is fetched and are
/// left out of the JSON payload when no match was found.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderRow {
    pub po_name: String,
    pub li_number: Option<i64>,
    pub client_po: Option<String>,
    pub location: Option<String>,
    pub part_name: Option<String>,
    pub part_number: Option<String>,
    pub qty_ordered: Option<f64>,
    pub qty_shipped: Option<f64>,
    pub po_date: Option<String>,
    pub buy_price: Option<f64>,
    /// Sale line this order line was raised for.
    pub sales_order_item: Option<String>,
    /// Sale order this order line was raised for.
    pub sales_order: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales_price: Option<f64>,
    /// Set to the sale order id when an invoice exists for it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_invoiced: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales_invoice: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posting_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grand_total: Option<f64>,
}

impl OrderRow {
    /// Whether invoice enrichment matched this row.
    pub fn is_invoiced(&self) -> bool {
        self.is_invoiced.is_some()
    }
}

/// A page of order rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrdersPage {
    /// Rows of the requested page.
    pub result: Vec<OrderRow>,
    /// Total rows matching the pushed-down filters.
    ///
    /// Not adjusted for the `is_invoiced` post-filter, so it over-counts
    /// while that filter is active.
    pub end: Option<u64>,
}
