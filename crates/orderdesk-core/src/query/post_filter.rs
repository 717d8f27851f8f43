//! Filters that can only run after enrichment, and page truncation.

use orderdesk_proto::{FilterModel, OrderRow};

/// Grid column derived during enrichment.
pub const INVOICED_COLUMN: &str = "is_invoiced";

/// Post-fetch filter on the derived invoiced state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoicedFilter {
    /// Keep rows that matched an invoice (`notBlank`).
    Invoiced,
    /// Keep rows that did not (`blank`).
    NotInvoiced,
}

impl InvoicedFilter {
    /// Read the filter from the model. Other operators are not applied.
    pub fn from_model(model: &FilterModel) -> Option<Self> {
        match model.get(INVOICED_COLUMN)?.operator.as_deref()? {
            "notBlank" => Some(InvoicedFilter::Invoiced),
            "blank" => Some(InvoicedFilter::NotInvoiced),
            _ => None,
        }
    }

    pub fn matches(&self, row: &OrderRow) -> bool {
        match self {
            InvoicedFilter::Invoiced => row.is_invoiced(),
            InvoicedFilter::NotInvoiced => !row.is_invoiced(),
        }
    }
}

/// Apply the invoiced post-filter, then keep the first `size` rows.
pub fn finalize(rows: Vec<OrderRow>, model: &FilterModel, size: u64) -> Vec<OrderRow> {
    let size = usize::try_from(size).unwrap_or(usize::MAX);
    match InvoicedFilter::from_model(model) {
        Some(filter) => rows.into_iter().filter(|r| filter.matches(r)).take(size).collect(),
        None => rows.into_iter().take(size).collect(),
    }
}
