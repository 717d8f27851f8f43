//! Query pipeline for the orders grid.
//!
//! Grid models compile into a parameterized `WHERE`/`ORDER BY` pair, the
//! executor fetches a page and a count, enrichment joins in sale and invoice
//! data, and the post-filter applies what could not be pushed down.

mod columns;
mod executor;
mod filter;
mod join;
mod post_filter;
mod predicate;
mod sort;

pub use columns::{Column, ColumnRegistry};
pub use executor::{count_sql, page_sql, QueryExecutor};
pub use filter::FilterSetCompiler;
pub use join::{
    apply, build_allocation_map, build_invoice_map, AllocationMap, Enricher, InvoiceHeader,
    InvoiceMap, INVOICE_HEADERS, SALE_ALLOCATIONS,
};
pub use post_filter::{finalize, InvoicedFilter, INVOICED_COLUMN};
pub use predicate::{Fragment, PredicateCompiler};
pub use sort::{SortCompiler, DEFAULT_ORDER_BY};
