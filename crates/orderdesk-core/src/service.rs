//! The `get_orders` operation.

use orderdesk_proto::{GetOrdersParams, OrdersPage, OrdersRequest};
use tracing::{debug, instrument};

use crate::error::Error;
use crate::query::{finalize, Enricher, FilterSetCompiler, QueryExecutor, SortCompiler};
use crate::store::Store;

/// Serves order pages from a store.
///
/// Holds no state between calls; each call is independent.
pub struct OrderService<'s, S: Store + ?Sized> {
    store: &'s S,
}

impl<'s, S: Store + ?Sized> OrderService<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    /// Decode raw call parameters and serve the page.
    pub fn get_orders(&self, params: &GetOrdersParams) -> Result<OrdersPage, Error> {
        let request = params.decode()?;
        self.execute(&request)
    }

    /// Serve a decoded request.
    ///
    /// `end` counts rows matching the pushed-down filters, before the
    /// invoiced post-filter and before truncation.
    #[instrument(skip_all, fields(start = request.start, size = request.size))]
    pub fn execute(&self, request: &OrdersRequest) -> Result<OrdersPage, Error> {
        let filter = FilterSetCompiler::new(self.store.dialect()).compile(&request.filter_model);
        let order_by = SortCompiler::compile(&request.sort_model);
        debug!(
            filter = filter.sql(),
            params = filter.params().len(),
            order_by = %order_by,
            "compiled grid models"
        );

        let (mut rows, end) =
            QueryExecutor::new(self.store).execute(&filter, &order_by, request.start, request.size)?;
        Enricher::new(self.store).enrich(&mut rows)?;
        let result = finalize(rows, &request.filter_model, request.size);

        Ok(OrdersPage { result, end })
    }
}
