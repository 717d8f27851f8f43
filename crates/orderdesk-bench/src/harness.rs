//! Benchmark harness helpers.

use orderdesk_core::{OrderService, SqliteStore};

use crate::fixtures::{generate_orders, OrderData, Scale};

/// Test context for benchmarks.
///
/// Holds an in-memory store populated with generated orders.
pub struct TestContext {
    pub store: SqliteStore,
}

impl TestContext {
    /// Create a context with the schema and no rows.
    pub fn new() -> Self {
        let store = SqliteStore::open_in_memory().unwrap();
        store.create_schema().unwrap();
        Self { store }
    }

    /// Create a context populated at the given scale.
    pub fn with_scale(scale: Scale) -> Self {
        let ctx = Self::new();
        populate_store(&ctx.store, &generate_orders(scale));
        ctx
    }

    /// Get an order service for this context.
    pub fn service(&self) -> OrderService<'_, SqliteStore> {
        OrderService::new(&self.store)
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Insert generated orders, their lines, sale lines and invoices.
pub fn populate_store(store: &SqliteStore, orders: &[OrderData]) {
    let tx = store.connection().unchecked_transaction().unwrap();
    {
        let mut order_stmt = tx
            .prepare(
                "INSERT INTO `tabPurchase Order` \
                 (name, transaction_date, customer, custom_customer_po_number, modified) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .unwrap();
        let mut line_stmt = tx
            .prepare(
                "INSERT INTO `tabPurchase Order Item` \
                 (name, parent, idx, item_code, item_name, qty, rate, sales_order_item, sales_order) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )
            .unwrap();
        let mut sale_stmt = tx
            .prepare("INSERT INTO `tabSales Order Item` (name, parent, rate) VALUES (?1, ?2, ?3)")
            .unwrap();
        let mut invoice_stmt = tx
            .prepare(
                "INSERT INTO `tabSales Invoice` (name, posting_date, grand_total) \
                 VALUES (?1, ?2, ?3)",
            )
            .unwrap();
        let mut invoice_item_stmt = tx
            .prepare(
                "INSERT INTO `tabSales Invoice Item` (name, parent, sales_order) \
                 VALUES (?1, ?2, ?3)",
            )
            .unwrap();

        for order in orders {
            order_stmt
                .execute((
                    &order.name,
                    &order.transaction_date,
                    &order.customer,
                    &order.client_po,
                    &order.modified,
                ))
                .unwrap();

            let mut sales_order = None;
            for line in &order.lines {
                let sale = line.sale.as_ref();
                line_stmt
                    .execute((
                        format!("{}-{}", order.name, line.idx),
                        &order.name,
                        line.idx,
                        &line.item_code,
                        &line.item_name,
                        line.qty,
                        line.rate,
                        sale.map(|s| s.sales_order_item.as_str()),
                        sale.map(|s| s.sales_order.as_str()),
                    ))
                    .unwrap();

                if let Some(sale) = sale {
                    sale_stmt
                        .execute((&sale.sales_order_item, &sale.sales_order, sale.sales_rate))
                        .unwrap();
                    sales_order = Some(sale.sales_order.as_str());
                }
            }

            if let (Some(invoice), Some(sales_order)) = (&order.invoice, sales_order) {
                invoice_stmt
                    .execute((&invoice.name, &invoice.posting_date, invoice.grand_total))
                    .unwrap();
                invoice_item_stmt
                    .execute((format!("{}-1", invoice.name), &invoice.name, sales_order))
                    .unwrap();
            }
        }
    }
    tx.commit().unwrap();
}
