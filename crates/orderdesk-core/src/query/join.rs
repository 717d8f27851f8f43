//! Post-fetch enrichment of order lines.
//!
//! Sale prices and invoice headers live in other entities. Rather than one
//! lookup per row, the page is enriched with two batch lookups and two hash
//! joins:
//!
//! 1. Build phase: fetch sale allocations for every linked sale line on the
//!    page, then invoice headers for every sale order those lines belong to,
//!    and index both in hash maps.
//! 2. Probe phase: for each row, look up its sale line and sale order in O(1).
//!
//! Complexity: O(N + M) where N = page rows, M = fetched related records.

use std::collections::{BTreeSet, HashMap};

use orderdesk_proto::{OrderRow, Value};
use tracing::debug;

use crate::error::Error;
use crate::store::{Lookup, LookupField, Row, Store};

/// Sale lines, keyed by their id.
pub const SALE_ALLOCATIONS: Lookup = Lookup {
    entity: "tabSales Order Item",
    child: None,
    fields: &[
        LookupField::entity("rate"),
        LookupField::entity("name"),
        LookupField::entity("parent"),
    ],
    key: LookupField::entity("name"),
};

/// Invoice headers, reached through invoice lines referencing a sale order.
pub const INVOICE_HEADERS: Lookup = Lookup {
    entity: "tabSales Invoice",
    child: Some("tabSales Invoice Item"),
    fields: &[
        LookupField::entity("name"),
        LookupField::child("sales_order"),
        LookupField::entity("posting_date"),
        LookupField::entity("grand_total"),
    ],
    key: LookupField::child("sales_order"),
};

/// Invoice header fields copied onto invoiced rows.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceHeader {
    pub name: String,
    pub posting_date: Option<String>,
    pub grand_total: Option<f64>,
}

/// Sale line id to sale rate.
pub type AllocationMap = HashMap<String, Option<f64>>;

/// Sale order id to invoice header.
pub type InvoiceMap = HashMap<String, InvoiceHeader>;

/// Enriches fetched order lines with sale and invoice data.
pub struct Enricher<'s, S: Store + ?Sized> {
    store: &'s S,
}

impl<'s, S: Store + ?Sized> Enricher<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    /// Enrich rows in place. Rows without a match are left untouched.
    pub fn enrich(&self, rows: &mut [OrderRow]) -> Result<(), Error> {
        let sale_lines = distinct_keys(rows.iter().map(|r| r.sales_order_item.as_deref()));
        let allocation_rows = self.store.fetch_all(&SALE_ALLOCATIONS, &sale_lines)?;
        let (allocations, sale_orders) = build_allocation_map(&allocation_rows)?;

        // Invoices are bounded by the sale orders found above, not by the page.
        let sale_orders: Vec<Value> = sale_orders.into_iter().map(Value::String).collect();
        let invoice_rows = self.store.fetch_all(&INVOICE_HEADERS, &sale_orders)?;
        let invoices = build_invoice_map(&invoice_rows)?;

        debug!(
            rows = rows.len(),
            sale_lines = sale_lines.len(),
            allocations = allocations.len(),
            sale_orders = sale_orders.len(),
            invoices = invoices.len(),
            "enrichment lookups done"
        );

        apply(rows, &allocations, &invoices);
        Ok(())
    }
}

/// Non-empty keys, deduplicated, in sorted order.
fn distinct_keys<'a>(keys: impl Iterator<Item = Option<&'a str>>) -> Vec<Value> {
    keys.flatten()
        .filter(|k| !k.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(Value::from)
        .collect()
}

/// Index sale allocations by sale line, and collect their sale orders.
pub fn build_allocation_map(rows: &[Row]) -> Result<(AllocationMap, BTreeSet<String>), Error> {
    let mut allocations = AllocationMap::with_capacity(rows.len());
    let mut sale_orders = BTreeSet::new();
    for row in rows {
        let Some(name) = row.text("name")? else {
            continue;
        };
        allocations.insert(name, row.real("rate")?);
        if let Some(parent) = row.text("parent")?.filter(|p| !p.is_empty()) {
            sale_orders.insert(parent);
        }
    }
    Ok((allocations, sale_orders))
}

/// Index invoice headers by sale order.
///
/// A sale order referenced by several invoice lines keeps the header seen
/// last, in store order.
pub fn build_invoice_map(rows: &[Row]) -> Result<InvoiceMap, Error> {
    let mut invoices = InvoiceMap::with_capacity(rows.len());
    for row in rows {
        let (Some(sales_order), Some(name)) = (row.text("sales_order")?, row.text("name")?) else {
            continue;
        };
        invoices.insert(
            sales_order,
            InvoiceHeader {
                name,
                posting_date: row.text("posting_date")?,
                grand_total: row.real("grand_total")?,
            },
        );
    }
    Ok(invoices)
}

/// Probe both maps for every row.
pub fn apply(rows: &mut [OrderRow], allocations: &AllocationMap, invoices: &InvoiceMap) {
    for row in rows {
        if let Some(rate) = row
            .sales_order_item
            .as_ref()
            .and_then(|item| allocations.get(item))
        {
            row.sales_price = *rate;
        }

        if let Some(sales_order) = row.sales_order.clone() {
            if let Some(header) = invoices.get(&sales_order) {
                row.sales_invoice = Some(header.name.clone());
                row.posting_date = header.posting_date.clone();
                row.grand_total = header.grand_total;
                row.is_invoiced = Some(sales_order);
            }
        }
    }
}
