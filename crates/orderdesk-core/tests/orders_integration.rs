//! Integration tests for `get_orders` against an in-memory SQLite store.

use std::cell::RefCell;

use orderdesk_core::proto::{
    FilterDescriptor, FilterModel, GetOrdersParams, OrderRow, OrdersPage, OrdersRequest,
    SortDescriptor, Value,
};
use orderdesk_core::{Dialect, Error, OrderService, Row, SqliteStore, Store};
use serde_json::json;

struct TestContext {
    store: SqliteStore,
}

impl TestContext {
    fn new() -> Self {
        let store = SqliteStore::open_in_memory().unwrap();
        store.create_schema().unwrap();
        Self { store }
    }

    /// Three order lines: one invoiced, one with only a sale allocation, one
    /// with no links at all.
    fn with_fixture() -> Self {
        let ctx = Self::new();
        ctx.order("PO-0001", "2024-01-10", "Store A", "CPO-1", "2024-01-10 10:00:00");
        ctx.order("PO-0002", "2024-01-20", "Store B", "CPO-2", "2024-01-25 09:00:00");
        ctx.order("PO-0003", "2024-02-05", "Store A", "CPO-3", "2024-02-05 08:00:00");

        ctx.line("PO-0001", 1, "WIDGET-1", "Widget", 5.0, 2.5, Some(("SOI-1", "SO-1")));
        ctx.line("PO-0002", 1, "GADGET-1", "Gadget", 3.0, 4.0, Some(("SOI-2", "SO-2")));
        ctx.line("PO-0003", 1, "BOLT-1", "Bolt", 100.0, 0.1, None);

        ctx.sale_line("SOI-1", "SO-1", 4.0);
        ctx.sale_line("SOI-2", "SO-2", 6.0);
        ctx.invoice("SINV-1", "SO-1", "2024-02-01", 20.0);
        ctx
    }

    fn order(&self, name: &str, date: &str, customer: &str, client_po: &str, modified: &str) {
        self.store
            .connection()
            .execute(
                "INSERT INTO `tabPurchase Order` \
                 (name, transaction_date, customer, custom_customer_po_number, modified) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                (name, date, customer, client_po, modified),
            )
            .unwrap();
    }

    #[allow(clippy::too_many_arguments)]
    fn line(
        &self,
        parent: &str,
        idx: i64,
        code: &str,
        item: &str,
        qty: f64,
        rate: f64,
        link: Option<(&str, &str)>,
    ) {
        self.store
            .connection()
            .execute(
                "INSERT INTO `tabPurchase Order Item` \
                 (name, parent, idx, item_code, item_name, qty, rate, sales_order_item, sales_order) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                line_params(parent, idx, code, item, qty, rate, link),
            )
            .unwrap();
    }

    fn sale_line(&self, name: &str, sales_order: &str, rate: f64) {
        self.store
            .connection()
            .execute(
                "INSERT INTO `tabSales Order Item` (name, parent, rate) VALUES (?1, ?2, ?3)",
                (name, sales_order, rate),
            )
            .unwrap();
    }

    fn invoice(&self, name: &str, sales_order: &str, posting_date: &str, total: f64) {
        let conn = self.store.connection();
        conn.execute(
            "INSERT INTO `tabSales Invoice` (name, posting_date, grand_total) VALUES (?1, ?2, ?3)",
            (name, posting_date, total),
        )
        .unwrap();
        conn.execute(
            "INSERT INTO `tabSales Invoice Item` (name, parent, sales_order) VALUES (?1, ?2, ?3)",
            (format!("{name}-1"), name, sales_order),
        )
        .unwrap();
    }

    fn service(&self) -> OrderService<'_, SqliteStore> {
        OrderService::new(&self.store)
    }

    fn run(&self, request: OrdersRequest) -> OrdersPage {
        self.service().execute(&request).unwrap()
    }

    fn filtered(&self, model: FilterModel) -> OrdersPage {
        self.run(OrdersRequest::new().with_filter(model))
    }
}

type LineParams<'a> = (
    String,
    &'a str,
    i64,
    &'a str,
    &'a str,
    f64,
    f64,
    Option<&'a str>,
    Option<&'a str>,
);

fn line_params<'a>(
    parent: &'a str,
    idx: i64,
    code: &'a str,
    item: &'a str,
    qty: f64,
    rate: f64,
    link: Option<(&'a str, &'a str)>,
) -> LineParams<'a> {
    (
        format!("{parent}-{idx}"),
        parent,
        idx,
        code,
        item,
        qty,
        rate,
        link.map(|(item, _)| item),
        link.map(|(_, order)| order),
    )
}

fn names(page: &OrdersPage) -> Vec<&str> {
    page.result.iter().map(|r| r.po_name.as_str()).collect()
}

/// Wraps a store and records every statement it runs, batch lookups included.
struct RecordingStore<'a> {
    inner: &'a SqliteStore,
    log: RefCell<Vec<String>>,
}

impl Store for RecordingStore<'_> {
    fn dialect(&self) -> Dialect {
        self.inner.dialect()
    }

    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, Error> {
        self.log.borrow_mut().push(sql.to_string());
        self.inner.query(sql, params)
    }
}

// =============================================================================
// Filters
// =============================================================================

#[test]
fn test_no_filters_default_order() {
    let ctx = TestContext::with_fixture();
    let page = ctx.run(OrdersRequest::new());

    assert_eq!(names(&page), vec!["PO-0003", "PO-0002", "PO-0001"]);
    assert_eq!(page.end, Some(3));
}

#[test]
fn test_text_equals_matches_exactly() {
    let ctx = TestContext::with_fixture();

    let page = ctx.filtered(FilterModel::new().with("location", FilterDescriptor::text("equals", "Store A")));
    assert_eq!(names(&page), vec!["PO-0003", "PO-0001"]);
    assert_eq!(page.end, Some(2));

    let page = ctx.filtered(FilterModel::new().with("location", FilterDescriptor::text("equals", "Store")));
    assert!(page.result.is_empty());
    assert_eq!(page.end, Some(0));

    let page = ctx.filtered(FilterModel::new().with("location", FilterDescriptor::text("notEqual", "Store A")));
    assert_eq!(names(&page), vec!["PO-0002"]);
}

#[test]
fn test_text_pattern_operators() {
    let ctx = TestContext::with_fixture();

    let page = ctx.filtered(FilterModel::new().with("part_name", FilterDescriptor::text("contains", "idg")));
    assert_eq!(names(&page), vec!["PO-0001"]);

    let page = ctx.filtered(FilterModel::new().with("part_name", FilterDescriptor::text("notContains", "Widget")));
    assert_eq!(names(&page), vec!["PO-0003", "PO-0002"]);

    let page = ctx.filtered(FilterModel::new().with("part_number", FilterDescriptor::text("startsWith", "GAD")));
    assert_eq!(names(&page), vec!["PO-0002"]);

    let page = ctx.filtered(FilterModel::new().with("part_number", FilterDescriptor::text("endsWith", "-1")));
    assert_eq!(page.result.len(), 3);
}

#[test]
fn test_like_wildcards_match_literally() {
    let ctx = TestContext::with_fixture();
    let page = ctx.filtered(FilterModel::new().with("po_name", FilterDescriptor::text("contains", "%")));
    assert!(page.result.is_empty());

    let page = ctx.filtered(FilterModel::new().with("po_name", FilterDescriptor::text("startsWith", "PO_000")));
    assert!(page.result.is_empty());
}

#[test]
fn test_blank_ignores_operand() {
    let ctx = TestContext::with_fixture();

    let page = ctx.filtered(
        FilterModel::new().with("sales_order_item", FilterDescriptor::text("blank", "SOI-1")),
    );
    assert_eq!(names(&page), vec!["PO-0003"]);

    let page = ctx.filtered(
        FilterModel::new().with("sales_order_item", FilterDescriptor::text("notBlank", "nothing")),
    );
    assert_eq!(names(&page), vec!["PO-0002", "PO-0001"]);
}

#[test]
fn test_date_operators() {
    let ctx = TestContext::with_fixture();

    let page = ctx.filtered(FilterModel::new().with("po_date", FilterDescriptor::date("lessThan", "2024-01-20")));
    assert_eq!(names(&page), vec!["PO-0001"]);

    let page = ctx.filtered(FilterModel::new().with("po_date", FilterDescriptor::date("greaterThan", "2024-01-20")));
    assert_eq!(names(&page), vec!["PO-0003"]);

    let page = ctx.filtered(FilterModel::new().with("po_date", FilterDescriptor::date("equals", "2024-02-05 00:00:00")));
    assert_eq!(names(&page), vec!["PO-0003"]);
}

#[test]
fn test_date_range_includes_both_bounds() {
    let ctx = TestContext::with_fixture();
    let page = ctx.filtered(
        FilterModel::new().with(
            "po_date",
            FilterDescriptor::date_range("2024-01-10 00:00:00", "2024-01-20 00:00:00"),
        ),
    );
    assert_eq!(names(&page), vec!["PO-0002", "PO-0001"]);
    assert_eq!(page.end, Some(2));
}

#[test]
fn test_unsupported_filters_are_ignored() {
    let ctx = TestContext::with_fixture();
    let model = FilterModel::new()
        .with("po_name", FilterDescriptor::text("regex", "^PO"))
        .with("po_date", FilterDescriptor::date("notBlank", "2024-01-01"));
    let page = ctx.filtered(model);
    assert_eq!(page.result.len(), 3);
    assert_eq!(page.end, Some(3));
}

#[test]
fn test_malformed_date_matches_nothing_on_sqlite() {
    // SQLite's date() yields NULL for garbage rather than rejecting it.
    let ctx = TestContext::with_fixture();
    let page = ctx.filtered(FilterModel::new().with("po_date", FilterDescriptor::date("equals", "not-a-date")));
    assert!(page.result.is_empty());
    assert_eq!(page.end, Some(0));
}

#[test]
fn test_unknown_column_surfaces_query_error() {
    let ctx = TestContext::with_fixture();
    let request = OrdersRequest::new()
        .with_filter(FilterModel::new().with("no_such_column", FilterDescriptor::text("equals", "x")));
    assert!(matches!(ctx.service().execute(&request), Err(Error::Query(_))));

    let request = OrdersRequest::new().with_sort(SortDescriptor::asc("no_such_column"));
    assert!(matches!(ctx.service().execute(&request), Err(Error::Query(_))));
}

// =============================================================================
// Injection safety
// =============================================================================

#[test]
fn test_hostile_operands_match_literally() {
    let ctx = TestContext::with_fixture();
    for hostile in ["x\" OR 1=1 --", "x' OR '1'='1", "'; DROP TABLE `tabPurchase Order`; --"] {
        for operator in ["equals", "contains", "startsWith"] {
            let page = ctx.filtered(FilterModel::new().with("po_name", FilterDescriptor::text(operator, hostile)));
            assert!(page.result.is_empty(), "{operator} {hostile:?} matched rows");
            assert_eq!(page.end, Some(0));
        }
    }

    // The table survived.
    assert_eq!(ctx.run(OrdersRequest::new()).end, Some(3));
}

#[test]
fn test_hostile_column_id_is_a_column_name() {
    let ctx = TestContext::with_fixture();
    let request = OrdersRequest::new().with_filter(
        FilterModel::new().with("po.name IS NOT NULL OR 1", FilterDescriptor::text("notBlank", "")),
    );
    assert!(matches!(ctx.service().execute(&request), Err(Error::Query(_))));
}

// =============================================================================
// Sorting and paging
// =============================================================================

#[test]
fn test_multi_key_sort() {
    let ctx = TestContext::with_fixture();
    let page = ctx.run(
        OrdersRequest::new()
            .with_sort(SortDescriptor::asc("location"))
            .with_sort(SortDescriptor::desc("po_date")),
    );
    assert_eq!(names(&page), vec!["PO-0003", "PO-0001", "PO-0002"]);

    let page = ctx.run(OrdersRequest::new().with_sort(SortDescriptor::asc("buy_price")));
    assert_eq!(names(&page), vec!["PO-0003", "PO-0001", "PO-0002"]);
}

#[test]
fn test_page_never_exceeds_size() {
    let ctx = TestContext::with_fixture();
    for i in 4..=30 {
        let name = format!("PO-{i:04}");
        ctx.order(&name, "2024-03-01", "Store C", "CPO-X", &format!("2024-03-01 00:00:{i:02}"));
        ctx.line(&name, 1, "NUT-1", "Nut", 1.0, 0.05, None);
    }

    for size in [1, 2, 5, 20] {
        let page = ctx.run(OrdersRequest::new().with_page(0, size));
        assert_eq!(page.result.len() as u64, size);
        assert_eq!(page.end, Some(30));
    }

    let page = ctx.run(OrdersRequest::new().with_page(28, 5));
    assert_eq!(page.result.len(), 2);
    assert_eq!(page.end, Some(30));

    let first = ctx.run(OrdersRequest::new().with_page(0, 3));
    let second = ctx.run(OrdersRequest::new().with_page(3, 3));
    assert_eq!(names(&first), vec!["PO-0030", "PO-0029", "PO-0028"]);
    assert_eq!(names(&second), vec!["PO-0027", "PO-0026", "PO-0025"]);
}

#[test]
fn test_lines_of_one_order_page_without_overlap() {
    let ctx = TestContext::new();
    ctx.order("PO-0100", "2024-03-01", "Store C", "CPO-9", "2024-03-01 12:00:00");
    for idx in [3, 1, 5, 2, 4] {
        ctx.line("PO-0100", idx, "NUT-1", "Nut", 1.0, 0.05, None);
    }

    for request in [
        OrdersRequest::new(),
        OrdersRequest::new().with_sort(SortDescriptor::asc("location")),
    ] {
        let mut seen = Vec::new();
        for start in [0, 2, 4] {
            let page = ctx.run(request.clone().with_page(start, 2));
            assert_eq!(page.end, Some(5));
            seen.extend(page.result.iter().map(|row| row.li_number.unwrap()));
        }
        assert_eq!(seen, vec![1, 2, 3, 4, 5]);
    }
}

#[test]
fn test_empty_store() {
    let ctx = TestContext::new();
    let page = ctx.run(OrdersRequest::new());
    assert_eq!(page, OrdersPage { result: vec![], end: Some(0) });
}

// =============================================================================
// Enrichment and post-filter
// =============================================================================

#[test]
fn test_enrichment_fields() {
    let ctx = TestContext::with_fixture();
    let page = ctx.run(OrdersRequest::new().with_sort(SortDescriptor::asc("po_name")));

    let invoiced = &page.result[0];
    assert_eq!(invoiced.sales_price, Some(4.0));
    assert_eq!(invoiced.is_invoiced.as_deref(), Some("SO-1"));
    assert_eq!(invoiced.sales_invoice.as_deref(), Some("SINV-1"));
    assert_eq!(invoiced.posting_date.as_deref(), Some("2024-02-01"));
    assert_eq!(invoiced.grand_total, Some(20.0));

    let allocated = &page.result[1];
    assert_eq!(allocated.sales_price, Some(6.0));
    assert!(!allocated.is_invoiced());
    assert_eq!(allocated.sales_invoice, None);

    let unlinked = &page.result[2];
    assert_eq!(
        unlinked,
        &OrderRow {
            po_name: "PO-0003".into(),
            li_number: Some(1),
            client_po: Some("CPO-3".into()),
            location: Some("Store A".into()),
            part_name: Some("Bolt".into()),
            part_number: Some("BOLT-1".into()),
            qty_ordered: Some(100.0),
            qty_shipped: Some(100.0),
            po_date: Some("2024-02-05".into()),
            buy_price: Some(0.1),
            ..OrderRow::default()
        }
    );
}

#[test]
fn test_invoiced_post_filter_keeps_pre_filter_count() {
    let ctx = TestContext::with_fixture();
    let params = GetOrdersParams {
        size: Some(10.into()),
        filter_model: Some(json!(r#"{"is_invoiced": {"type": "notBlank"}}"#)),
        ..GetOrdersParams::default()
    };

    let page = ctx.service().get_orders(&params).unwrap();
    assert_eq!(names(&page), vec!["PO-0001"]);
    assert_eq!(page.result[0].sales_invoice.as_deref(), Some("SINV-1"));
    // The count is taken before the post-filter.
    assert_eq!(page.end, Some(3));
}

#[test]
fn test_not_invoiced_post_filter() {
    let ctx = TestContext::with_fixture();
    let page = ctx.filtered(FilterModel::new().with("is_invoiced", FilterDescriptor::operator("blank")));
    assert_eq!(names(&page), vec!["PO-0003", "PO-0002"]);
    assert_eq!(page.end, Some(3));
}

#[test]
fn test_invoiced_text_filter_is_also_pushed_down() {
    let ctx = TestContext::with_fixture();
    let page = ctx.filtered(FilterModel::new().with("is_invoiced", FilterDescriptor::text("notBlank", "")));
    // poi.sales_order IS NOT NULL narrows the count, the post-filter the page.
    assert_eq!(names(&page), vec!["PO-0001"]);
    assert_eq!(page.end, Some(2));
}

#[test]
fn test_invoice_collision_keeps_last_seen() {
    let ctx = TestContext::with_fixture();
    ctx.invoice("SINV-2", "SO-1", "2024-02-15", 35.0);

    let page = ctx.filtered(FilterModel::new().with("po_name", FilterDescriptor::text("equals", "PO-0001")));
    assert_eq!(page.result[0].sales_invoice.as_deref(), Some("SINV-2"));
    assert_eq!(page.result[0].grand_total, Some(35.0));
}

#[test]
fn test_batch_lookups_not_per_row() {
    let ctx = TestContext::with_fixture();
    let store = RecordingStore {
        inner: &ctx.store,
        log: RefCell::new(Vec::new()),
    };

    OrderService::new(&store).execute(&OrdersRequest::new()).unwrap();

    let log = store.log.borrow();
    assert_eq!(log.len(), 4);
    assert!(log[2].contains("`tabSales Order Item`.`name` IN (?, ?)"));
    assert!(log[3].contains("`tabSales Invoice Item`.`sales_order` IN (?, ?)"));
}

#[test]
fn test_unlinked_page_skips_lookups() {
    let ctx = TestContext::with_fixture();
    let store = RecordingStore {
        inner: &ctx.store,
        log: RefCell::new(Vec::new()),
    };

    let request = OrdersRequest::new()
        .with_filter(FilterModel::new().with("po_name", FilterDescriptor::text("equals", "PO-0003")));
    let page = OrderService::new(&store).execute(&request).unwrap();

    assert_eq!(page.result.len(), 1);
    assert_eq!(store.log.borrow().len(), 2);
}

// =============================================================================
// Raw parameters
// =============================================================================

#[test]
fn test_get_orders_with_encoded_models() {
    let ctx = TestContext::with_fixture();
    let params: GetOrdersParams = serde_json::from_value(json!({
        "start": "0",
        "size": "2",
        "filterModel": r#"{"location": {"filterType": "text", "type": "equals", "filter": "Store A"}}"#,
        "sortModel": r#"[{"colId": "po_date", "sort": "asc"}]"#,
    }))
    .unwrap();

    let page = ctx.service().get_orders(&params).unwrap();
    assert_eq!(names(&page), vec!["PO-0001", "PO-0003"]);
    assert_eq!(page.end, Some(2));
}

#[test]
fn test_get_orders_malformed_payload() {
    let ctx = TestContext::with_fixture();
    let params = GetOrdersParams {
        sort_model: Some(json!("[{\"colId\": \"po_name\", \"sort\": \"sideways\"}]")),
        ..GetOrdersParams::default()
    };
    assert!(matches!(
        ctx.service().get_orders(&params),
        Err(Error::MalformedInput(_))
    ));
}
