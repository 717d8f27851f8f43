//! SQLite store.

use std::path::Path;

use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::{params_from_iter, Connection, ToSql};
use tracing::debug;

use orderdesk_proto::Value;

use super::{Dialect, Row, Store};
use crate::error::Error;

/// Tables of the order/invoice schema, named as the upstream ERP names them.
const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS `tabPurchase Order` (
        name TEXT PRIMARY KEY,
        transaction_date TEXT,
        customer TEXT,
        custom_customer_po_number TEXT,
        modified TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS `tabPurchase Order Item` (
        name TEXT PRIMARY KEY,
        parent TEXT NOT NULL,
        idx INTEGER NOT NULL,
        item_code TEXT,
        item_name TEXT,
        qty REAL,
        rate REAL,
        sales_order_item TEXT,
        sales_order TEXT,
        FOREIGN KEY (parent) REFERENCES `tabPurchase Order`(name)
    );

    CREATE TABLE IF NOT EXISTS `tabSales Order Item` (
        name TEXT PRIMARY KEY,
        parent TEXT NOT NULL,
        rate REAL
    );

    CREATE TABLE IF NOT EXISTS `tabSales Invoice` (
        name TEXT PRIMARY KEY,
        posting_date TEXT,
        grand_total REAL
    );

    CREATE TABLE IF NOT EXISTS `tabSales Invoice Item` (
        name TEXT PRIMARY KEY,
        parent TEXT NOT NULL,
        sales_order TEXT,
        FOREIGN KEY (parent) REFERENCES `tabSales Invoice`(name)
    );

    CREATE INDEX IF NOT EXISTS idx_poi_parent ON `tabPurchase Order Item`(parent);
    CREATE INDEX IF NOT EXISTS idx_po_modified ON `tabPurchase Order`(modified);
    CREATE INDEX IF NOT EXISTS idx_sii_sales_order ON `tabSales Invoice Item`(sales_order);
"#;

/// A [`Store`] backed by a single SQLite connection.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a database file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        Ok(Self::from_connection(Connection::open(path)?))
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, Error> {
        Ok(Self::from_connection(Connection::open_in_memory()?))
    }

    /// Wrap an existing connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Underlying connection, for seeding and maintenance.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Create the order/invoice tables if they do not exist yet.
    pub fn create_schema(&self) -> Result<(), Error> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }
}

impl Store for SqliteStore {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, Error> {
        debug!(sql, params = params.len(), "sqlite query");

        let mut stmt = self.conn.prepare(sql)?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut rows = stmt.query(params_from_iter(params.iter().map(Param)))?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut columns = Vec::with_capacity(names.len());
            for (i, name) in names.iter().enumerate() {
                columns.push((name.clone(), decode_value(name, row.get_ref(i)?)?));
            }
            out.push(Row::new(columns));
        }
        Ok(out)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Query(err.to_string())
    }
}

/// Binds a [`Value`] as a statement parameter.
struct Param<'a>(&'a Value);

impl ToSql for Param<'_> {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self.0 {
            Value::Null => ToSqlOutput::Borrowed(ValueRef::Null),
            Value::Bool(b) => ToSqlOutput::Borrowed(ValueRef::Integer(i64::from(*b))),
            Value::Int64(i) => ToSqlOutput::Borrowed(ValueRef::Integer(*i)),
            Value::Float64(f) => ToSqlOutput::Borrowed(ValueRef::Real(*f)),
            Value::String(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
        })
    }
}

fn decode_value(column: &str, value: ValueRef<'_>) -> Result<Value, Error> {
    match value {
        ValueRef::Null => Ok(Value::Null),
        ValueRef::Integer(i) => Ok(Value::Int64(i)),
        ValueRef::Real(f) => Ok(Value::Float64(f)),
        ValueRef::Text(t) => Ok(Value::String(String::from_utf8_lossy(t).into_owned())),
        ValueRef::Blob(_) => Err(Error::InvalidRow(format!(
            "column {column}: blob values are not supported"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store.create_schema().unwrap();
        store
    }

    #[test]
    fn test_query_binds_and_decodes() {
        let store = store();
        let rows = store
            .query(
                "SELECT ? AS s, ? AS i, ? AS f, ? AS n",
                &[
                    Value::from("PO-1"),
                    Value::Int64(3),
                    Value::Float64(2.5),
                    Value::Null,
                ],
            )
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text("s").unwrap(), Some("PO-1".into()));
        assert_eq!(rows[0].integer("i").unwrap(), Some(3));
        assert_eq!(rows[0].real("f").unwrap(), Some(2.5));
        assert_eq!(rows[0].get("n"), Some(&Value::Null));
    }

    #[test]
    fn test_schema_is_idempotent() {
        let store = store();
        store.create_schema().unwrap();
        let rows = store
            .query("SELECT COUNT(*) AS count FROM `tabPurchase Order`", &[])
            .unwrap();
        assert_eq!(rows[0].integer("count").unwrap(), Some(0));
    }

    #[test]
    fn test_rejected_sql_is_query_error() {
        let store = store();
        let err = store.query("SELECT nope FROM `tabPurchase Order`", &[]);
        assert!(matches!(err, Err(Error::Query(_))));
    }

    #[test]
    fn test_open_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.db");
        {
            let store = SqliteStore::open(&path).unwrap();
            store.create_schema().unwrap();
            store
                .connection()
                .execute(
                    "INSERT INTO `tabSales Invoice` (name, posting_date, grand_total) VALUES (?1, ?2, ?3)",
                    ("SINV-1", "2024-02-01", 99.0),
                )
                .unwrap();
        }
        let store = SqliteStore::open(&path).unwrap();
        let rows = store
            .query("SELECT name FROM `tabSales Invoice`", &[])
            .unwrap();
        assert_eq!(rows[0].text("name").unwrap(), Some("SINV-1".into()));
    }
}
