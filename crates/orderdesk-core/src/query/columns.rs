//! Logical grid columns and the physical columns they read.

use std::borrow::Cow;

use crate::store::quote_identifier;

/// Grid column id to qualified column of the order-line join.
///
/// `poi` is the order line, `po` its parent order.
static COLUMN_MAP: &[(&str, &str)] = &[
    ("po_name", "po.name"),
    ("client_po", "po.custom_customer_po_number"),
    ("location", "po.customer"),
    ("po_date", "po.transaction_date"),
    ("li_number", "poi.idx"),
    ("buy_price", "poi.rate"),
    ("is_invoiced", "poi.sales_order"),
    ("part_name", "poi.item_name"),
    ("part_number", "poi.item_code"),
    ("qty_ordered", "poi.qty"),
    ("qty_shipped", "poi.qty"),
];

/// A resolved column reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column<'a> {
    /// A registered column; the expression is trusted.
    Mapped(&'static str),
    /// An unregistered column id, used as the column name.
    Passthrough(&'a str),
}

impl Column<'_> {
    /// SQL text for this column. Passthrough names are quoted.
    pub fn sql(&self) -> Cow<'static, str> {
        match self {
            Column::Mapped(expr) => Cow::Borrowed(*expr),
            Column::Passthrough(name) => Cow::Owned(quote_identifier(name)),
        }
    }
}

/// Static column registry.
pub struct ColumnRegistry;

impl ColumnRegistry {
    /// Resolve a grid column id. Never fails: unknown ids pass through.
    pub fn resolve(logical: &str) -> Column<'_> {
        match Self::physical(logical) {
            Some(expr) => Column::Mapped(expr),
            None => Column::Passthrough(logical),
        }
    }

    /// The registered expression for a column id, if any.
    pub fn physical(logical: &str) -> Option<&'static str> {
        COLUMN_MAP
            .iter()
            .find(|(name, _)| *name == logical)
            .map(|(_, expr)| *expr)
    }
}
