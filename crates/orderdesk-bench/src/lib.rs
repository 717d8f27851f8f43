//! orderdesk Benchmark Suite
//!
//! Criterion benchmarks for the orders grid.
//!
//! # Benchmark Categories
//!
//! - **Compile**: Filter and sort model compilation to SQL
//! - **GetOrders**: Page, count, enrichment and post-filter against SQLite

pub mod fixtures;
pub mod harness;

pub use fixtures::{generate_orders, OrderData, Scale};
pub use harness::TestContext;
