//! Page and count queries over the order-line join.

use orderdesk_proto::{OrderRow, Value};
use tracing::debug;

use super::predicate::Fragment;
use crate::error::Error;
use crate::store::{Row, Store};

/// Columns of an [`OrderRow`], labelled with their grid ids.
const ORDER_LINE_COLUMNS: &str = "poi.idx AS li_number, \
     po.custom_customer_po_number AS client_po, \
     po.customer AS location, \
     poi.item_name AS part_name, \
     poi.item_code AS part_number, \
     poi.qty AS qty_ordered, \
     po.transaction_date AS po_date, \
     poi.sales_order_item AS sales_order_item, \
     poi.sales_order AS sales_order, \
     poi.qty AS qty_shipped, \
     poi.rate AS buy_price, \
     po.name AS po_name";

/// Order lines joined to their parent order.
const ORDER_LINE_SOURCE: &str =
    "FROM `tabPurchase Order Item` poi JOIN `tabPurchase Order` po ON poi.parent = po.name";

/// Runs the windowed page query and the total count query.
pub struct QueryExecutor<'s, S: Store + ?Sized> {
    store: &'s S,
}

impl<'s, S: Store + ?Sized> QueryExecutor<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    /// Fetch up to `limit + 1` rows from `offset`, and the number of rows
    /// matching `filter`.
    ///
    /// The extra row is a look-ahead; callers truncate to `limit`. The count
    /// is `None` only when the count query returns no row.
    pub fn execute(
        &self,
        filter: &Fragment,
        order_by: &str,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<OrderRow>, Option<u64>), Error> {
        let rows = self.fetch_page(filter, order_by, offset, limit)?;
        let count = self.count(filter)?;
        debug!(rows = rows.len(), count = ?count, offset, limit, "order page fetched");
        Ok((rows, count))
    }

    fn fetch_page(
        &self,
        filter: &Fragment,
        order_by: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<OrderRow>, Error> {
        let sql = page_sql(filter, order_by);
        let mut params = filter.params().to_vec();
        params.push(Value::from(limit.saturating_add(1)));
        params.push(Value::from(offset));

        self.store
            .query(&sql, &params)?
            .iter()
            .map(decode_order_row)
            .collect()
    }

    fn count(&self, filter: &Fragment) -> Result<Option<u64>, Error> {
        let rows = self.store.query(&count_sql(filter), filter.params())?;
        let Some(row) = rows.first() else {
            return Ok(None);
        };
        let count = row
            .integer("count")?
            .ok_or_else(|| Error::InvalidRow("count query returned NULL".into()))?;
        u64::try_from(count)
            .map(Some)
            .map_err(|_| Error::InvalidRow(format!("negative count {count}")))
    }
}

/// SQL for one page of order lines.
pub fn page_sql(filter: &Fragment, order_by: &str) -> String {
    let mut sql = format!("SELECT {ORDER_LINE_COLUMNS} {ORDER_LINE_SOURCE}");
    if !filter.is_empty() {
        sql.push(' ');
        sql.push_str(filter.sql());
    }
    sql.push(' ');
    sql.push_str(order_by);
    sql.push_str(" LIMIT ? OFFSET ?");
    sql
}

/// SQL counting the order lines matching `filter`. Sorting is omitted.
pub fn count_sql(filter: &Fragment) -> String {
    let mut sql = format!("SELECT COUNT(*) AS count {ORDER_LINE_SOURCE}");
    if !filter.is_empty() {
        sql.push(' ');
        sql.push_str(filter.sql());
    }
    sql
}

fn decode_order_row(row: &Row) -> Result<OrderRow, Error> {
    Ok(OrderRow {
        po_name: row
            .text("po_name")?
            .ok_or_else(|| Error::InvalidRow("order line without po_name".into()))?,
        li_number: row.integer("li_number")?,
        client_po: row.text("client_po")?,
        location: row.text("location")?,
        part_name: row.text("part_name")?,
        part_number: row.text("part_number")?,
        qty_ordered: row.real("qty_ordered")?,
        qty_shipped: row.real("qty_shipped")?,
        po_date: row.text("po_date")?,
        buy_price: row.real("buy_price")?,
        sales_order_item: row.text("sales_order_item")?,
        sales_order: row.text("sales_order")?,
        ..OrderRow::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_sql_without_filter() {
        let sql = page_sql(&Fragment::empty(), "ORDER BY po.modified DESC");
        assert!(sql.starts_with("SELECT poi.idx AS li_number,"));
        assert!(sql.ends_with(
            "ON poi.parent = po.name ORDER BY po.modified DESC LIMIT ? OFFSET ?"
        ));
    }

    #[test]
    fn test_count_sql_ignores_order() {
        let filter = Fragment::new("WHERE po.name = ?", vec!["PO-1".into()]);
        assert_eq!(
            count_sql(&filter),
            "SELECT COUNT(*) AS count FROM `tabPurchase Order Item` poi \
             JOIN `tabPurchase Order` po ON poi.parent = po.name WHERE po.name = ?"
        );
    }

    #[test]
    fn test_decode_order_row() {
        let row = Row::new(vec![
            ("li_number".into(), Value::Int64(2)),
            ("po_name".into(), Value::from("PO-0001")),
            ("buy_price".into(), Value::Float64(4.25)),
            ("sales_order".into(), Value::Null),
        ]);
        let order = decode_order_row(&row).unwrap();
        assert_eq!(order.po_name, "PO-0001");
        assert_eq!(order.li_number, Some(2));
        assert_eq!(order.buy_price, Some(4.25));
        assert_eq!(order.sales_order, None);
        assert_eq!(order.is_invoiced, None);

        let nameless = Row::new(vec![("li_number".into(), Value::Int64(1))]);
        assert!(matches!(decode_order_row(&nameless), Err(Error::InvalidRow(_))));
    }
}
