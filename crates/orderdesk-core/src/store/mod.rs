//! Persistence seam.
//!
//! The handler only needs two capabilities from a relational store: running
//! a parameterized query that returns dict-shaped rows, and batch lookups by
//! key membership. [`Store`] requires the first and derives the second.

mod sqlite;

pub use sqlite::SqliteStore;

use orderdesk_proto::Value;

use crate::error::Error;

/// SQL flavour of a store. Only affects how date operands are cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Sqlite,
    MySql,
}

impl Dialect {
    /// Placeholder expression that casts a bound parameter to a date.
    pub fn cast_date(&self) -> &'static str {
        match self {
            Dialect::Sqlite => "date(?)",
            Dialect::MySql => "CAST(? AS DATE)",
        }
    }
}

/// A relational store reachable through parameterized SQL.
///
/// Placeholders are positional `?`.
pub trait Store {
    /// SQL flavour spoken by this store.
    fn dialect(&self) -> Dialect;

    /// Run a query and return every row.
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, Error>;

    /// Fetch every record of `lookup` whose key is in `keys`, in one query.
    ///
    /// An empty key set returns no rows without touching the store.
    fn fetch_all(&self, lookup: &Lookup, keys: &[Value]) -> Result<Vec<Row>, Error> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        self.query(&lookup.to_sql(keys.len()), keys)
    }
}

impl<S: Store + ?Sized> Store for &S {
    fn dialect(&self) -> Dialect {
        (**self).dialect()
    }

    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, Error> {
        (**self).query(sql, params)
    }

    fn fetch_all(&self, lookup: &Lookup, keys: &[Value]) -> Result<Vec<Row>, Error> {
        (**self).fetch_all(lookup, keys)
    }
}

/// A dict-shaped result row: column label to value, in select order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    pub fn new(columns: Vec<(String, Value)>) -> Self {
        Self { columns }
    }

    /// Get a column by label. Missing columns read as `None`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// A present, non-NULL column.
    fn non_null(&self, name: &str) -> Option<&Value> {
        self.get(name).filter(|value| !value.is_null())
    }

    /// Read a column as text. Numbers are rendered, NULL is `None`.
    pub fn text(&self, name: &str) -> Result<Option<String>, Error> {
        let Some(value) = self.non_null(name) else {
            return Ok(None);
        };
        if let Some(s) = value.as_str() {
            return Ok(Some(s.to_string()));
        }
        match value {
            Value::Int64(i) => Ok(Some(i.to_string())),
            Value::Float64(f) => Ok(Some(f.to_string())),
            other => Err(mismatch(name, "text", other)),
        }
    }

    /// Read a column as a float. Numeric strings are parsed.
    pub fn real(&self, name: &str) -> Result<Option<f64>, Error> {
        let Some(value) = self.non_null(name) else {
            return Ok(None);
        };
        let parsed = match value.as_str() {
            Some(s) => s.trim().parse().ok(),
            None => value.as_f64(),
        };
        parsed.map(Some).ok_or_else(|| mismatch(name, "number", value))
    }

    /// Read a column as an integer. Whole floats are accepted.
    pub fn integer(&self, name: &str) -> Result<Option<i64>, Error> {
        let Some(value) = self.non_null(name) else {
            return Ok(None);
        };
        let whole = value.as_i64().or(match value {
            Value::Float64(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        });
        whole.map(Some).ok_or_else(|| mismatch(name, "integer", value))
    }
}

fn mismatch(name: &str, expected: &str, got: &Value) -> Error {
    Error::InvalidRow(format!("column {name}: expected {expected}, got {got:?}"))
}

/// Quote an identifier, part by part: `po.name` becomes `` `po`.`name` ``.
///
/// Embedded backticks are doubled, so the result is always a single
/// identifier reference whatever the input.
pub fn quote_identifier(name: &str) -> String {
    name.split('.')
        .map(|part| format!("`{}`", part.replace('`', "``")))
        .collect::<Vec<_>>()
        .join(".")
}

/// Which table of a [`Lookup`] a field lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Entity,
    Child,
}

/// A column read or filtered by a batch lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupField {
    pub side: Side,
    pub column: &'static str,
}

impl LookupField {
    pub const fn entity(column: &'static str) -> Self {
        Self {
            side: Side::Entity,
            column,
        }
    }

    pub const fn child(column: &'static str) -> Self {
        Self {
            side: Side::Child,
            column,
        }
    }
}

/// A batch lookup against a named entity.
///
/// When `child` is set, the child table is joined on
/// `child.parent = entity.name` and fields may come from either side.
/// Each field is selected under its bare column name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lookup {
    pub entity: &'static str,
    pub child: Option<&'static str>,
    pub fields: &'static [LookupField],
    /// Field matched against the key set.
    pub key: LookupField,
}

impl Lookup {
    fn table(&self, side: Side) -> &'static str {
        match (side, self.child) {
            (Side::Child, Some(child)) => child,
            _ => self.entity,
        }
    }

    fn field_sql(&self, field: &LookupField) -> String {
        quote_identifier(&format!("{}.{}", self.table(field.side), field.column))
    }

    /// Render the lookup as `SELECT ... WHERE key IN (?, ...)`.
    pub fn to_sql(&self, key_count: usize) -> String {
        let fields = self
            .fields
            .iter()
            .map(|f| format!("{} AS {}", self.field_sql(f), quote_identifier(f.column)))
            .collect::<Vec<_>>()
            .join(", ");

        let mut sql = format!("SELECT {} FROM {}", fields, quote_identifier(self.entity));
        if let Some(child) = self.child {
            sql.push_str(&format!(
                " JOIN {} ON {} = {}",
                quote_identifier(child),
                quote_identifier(&format!("{child}.parent")),
                quote_identifier(&format!("{}.name", self.entity)),
            ));
        }

        let placeholders = vec!["?"; key_count].join(", ");
        sql.push_str(&format!(
            " WHERE {} IN ({})",
            self.field_sql(&self.key),
            placeholders
        ));
        sql
    }
}
