//! orderdesk core - grid model compilation, order queries and enrichment.
//!
//! [`OrderService::get_orders`] is the entry point: it compiles the grid's
//! filter and sort models into parameterized SQL, fetches a page and a count
//! through a [`Store`], enriches the page with sale and invoice data, and
//! applies the invoiced post-filter.

pub mod error;
pub mod query;
pub mod service;
pub mod store;

pub use error::Error;
pub use query::{
    ColumnRegistry, Enricher, FilterSetCompiler, Fragment, PredicateCompiler, QueryExecutor,
    SortCompiler,
};
pub use service::OrderService;
pub use store::{Dialect, Lookup, LookupField, Row, SqliteStore, Store};

/// Re-export protocol types.
pub use orderdesk_proto as proto;
