//! orderdesk protocol types.
//!
//! This crate defines what a data grid sends to `get_orders` and what it
//! gets back.
//!
//! # Modules
//!
//! - [`grid`] - Filter and sort models, and the typed filter conditions they classify into
//! - [`request`] - Raw call parameters and their decoding
//! - [`result`] - Order rows and result pages
//! - [`value`] - Scalar values bound into queries and read from rows
//! - [`error`] - Protocol error types

pub mod error;
pub mod grid;
pub mod request;
pub mod result;
pub mod value;

pub use error::Error;

pub use grid::{
    decode_sort_model, DateCondition, FilterCondition, FilterDescriptor, FilterModel,
    SortDescriptor, SortDirection, TextCondition,
};
pub use request::{Count, GetOrdersParams, OrdersRequest, DEFAULT_PAGE_SIZE};
pub use result::{OrderRow, OrdersPage};
pub use value::Value;
