//! Per-column predicate compilation.
//!
//! Every operand becomes a bound parameter; only column expressions and
//! fixed operator text ever reach the SQL string.

use orderdesk_proto::{DateCondition, FilterCondition, FilterDescriptor, TextCondition, Value};

use crate::store::Dialect;

/// Escape character used in LIKE patterns.
const LIKE_ESCAPE: char = '!';

/// A SQL fragment with its positional parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    sql: String,
    params: Vec<Value>,
}

impl Fragment {
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// A fragment with no SQL and no parameters.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Join fragments with `AND`, keeping parameter order.
    pub fn conjunction(fragments: Vec<Fragment>) -> Self {
        let mut sql = Vec::with_capacity(fragments.len());
        let mut params = Vec::new();
        for fragment in fragments {
            sql.push(fragment.sql);
            params.extend(fragment.params);
        }
        Self {
            sql: sql.join(" AND "),
            params,
        }
    }

    /// Prefix non-empty SQL with a keyword, e.g. `WHERE`.
    pub fn prefixed(mut self, keyword: &str) -> Self {
        if !self.sql.is_empty() {
            self.sql = format!("{keyword} {}", self.sql);
        }
        self
    }
}

/// Compiles one column's filter into a predicate fragment.
#[derive(Debug, Clone, Copy)]
pub struct PredicateCompiler {
    dialect: Dialect,
}

impl PredicateCompiler {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    /// Compile a raw descriptor against a column expression.
    ///
    /// Returns `None` when the descriptor does not classify into a supported
    /// condition; the column is then left unfiltered.
    pub fn compile_descriptor(
        &self,
        column: &str,
        descriptor: &FilterDescriptor,
    ) -> Option<Fragment> {
        descriptor
            .condition()
            .map(|condition| self.compile(column, &condition))
    }

    /// Compile a classified condition against a column expression.
    pub fn compile(&self, column: &str, condition: &FilterCondition) -> Fragment {
        match condition {
            FilterCondition::Text(text) => Self::compile_text(column, text),
            FilterCondition::Date(date) => self.compile_date(column, date),
        }
    }

    fn compile_text(column: &str, condition: &TextCondition) -> Fragment {
        match condition {
            TextCondition::Contains(v) => like(column, "LIKE", format!("%{}%", escape_like(v))),
            TextCondition::NotContains(v) => {
                like(column, "NOT LIKE", format!("%{}%", escape_like(v)))
            }
            TextCondition::StartsWith(v) => like(column, "LIKE", format!("{}%", escape_like(v))),
            TextCondition::EndsWith(v) => like(column, "LIKE", format!("%{}", escape_like(v))),
            TextCondition::Equals(v) => Fragment::new(format!("{column} = ?"), vec![v.into()]),
            TextCondition::NotEqual(v) => Fragment::new(format!("{column} <> ?"), vec![v.into()]),
            TextCondition::Blank => Fragment::new(format!("{column} IS NULL"), vec![]),
            TextCondition::NotBlank => Fragment::new(format!("{column} IS NOT NULL"), vec![]),
        }
    }

    fn compile_date(&self, column: &str, condition: &DateCondition) -> Fragment {
        let date = self.dialect.cast_date();
        match condition {
            DateCondition::LessThan(from) => {
                Fragment::new(format!("{column} < {date}"), vec![from.into()])
            }
            DateCondition::GreaterThan(from) => {
                Fragment::new(format!("{column} > {date}"), vec![from.into()])
            }
            DateCondition::InRange(from, to) => Fragment::new(
                format!("{column} BETWEEN {date} AND {date}"),
                vec![from.into(), to.into()],
            ),
            DateCondition::Equals(from) => {
                Fragment::new(format!("{column} = {date}"), vec![from.into()])
            }
        }
    }
}

fn like(column: &str, operator: &str, pattern: String) -> Fragment {
    Fragment::new(
        format!("{column} {operator} ? ESCAPE '{LIKE_ESCAPE}'"),
        vec![Value::String(pattern)],
    )
}

/// Escape LIKE wildcards so the operand matches literally.
fn escape_like(operand: &str) -> String {
    let mut escaped = String::with_capacity(operand.len());
    for c in operand.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}
