//! Data-grid filter and sort models.
//!
//! The grid sends one [`FilterDescriptor`] per filtered column and an ordered
//! list of [`SortDescriptor`]s. Descriptors are kept in their raw, permissive
//! shape on the wire and classified into typed [`FilterCondition`]s when the
//! filter set is compiled. A descriptor that does not classify is ignored
//! rather than rejected.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Filter descriptors keyed by logical column.
///
/// Backed by a `BTreeMap` so compiled clauses are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterModel(BTreeMap<String, FilterDescriptor>);

impl FilterModel {
    /// Create an empty filter model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a descriptor for a column, replacing any previous one.
    pub fn with(mut self, column: impl Into<String>, descriptor: FilterDescriptor) -> Self {
        self.0.insert(column.into(), descriptor);
        self
    }

    /// Get the descriptor for a column.
    pub fn get(&self, column: &str) -> Option<&FilterDescriptor> {
        self.0.get(column)
    }

    /// Iterate descriptors in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterDescriptor)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decode a filter model that may arrive structured or JSON-encoded.
    ///
    /// `null`, an empty string and `{}` all decode to an empty model.
    pub fn decode(raw: &serde_json::Value) -> Result<Self, Error> {
        match raw {
            serde_json::Value::Null => Ok(Self::new()),
            serde_json::Value::String(s) if s.trim().is_empty() => Ok(Self::new()),
            serde_json::Value::String(s) => Ok(serde_json::from_str(s)?),
            other => Ok(Self::deserialize(other)?),
        }
    }
}

/// Raw filter state for a single column, as sent by the grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterDescriptor {
    /// Filter kind (`text`, `date`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_type: Option<String>,
    /// Operator name (`contains`, `inRange`, ...).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    /// Text operand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<serde_json::Value>,
    /// Date operand (lower bound for `inRange`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    /// Upper bound for `inRange`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
}

impl FilterDescriptor {
    /// A text filter descriptor.
    pub fn text(operator: &str, filter: impl Into<String>) -> Self {
        Self {
            filter_type: Some("text".into()),
            operator: Some(operator.into()),
            filter: Some(serde_json::Value::String(filter.into())),
            ..Self::default()
        }
    }

    /// A date filter descriptor with a single bound.
    pub fn date(operator: &str, date_from: impl Into<String>) -> Self {
        Self {
            filter_type: Some("date".into()),
            operator: Some(operator.into()),
            date_from: Some(date_from.into()),
            ..Self::default()
        }
    }

    /// An inclusive date range descriptor.
    pub fn date_range(date_from: impl Into<String>, date_to: impl Into<String>) -> Self {
        Self {
            date_to: Some(date_to.into()),
            ..Self::date("inRange", date_from)
        }
    }

    /// A descriptor carrying only an operator, e.g. `{"type": "notBlank"}`.
    pub fn operator(operator: &str) -> Self {
        Self {
            operator: Some(operator.into()),
            ..Self::default()
        }
    }

    /// Classify this descriptor into a typed condition.
    ///
    /// Returns `None` for unsupported kind/operator combinations and for
    /// operators whose operand is missing.
    pub fn condition(&self) -> Option<FilterCondition> {
        let operator = self.operator.as_deref()?;
        match self.filter_type.as_deref()? {
            "text" => TextCondition::parse(operator, self.text_operand())
                .map(FilterCondition::Text),
            "date" => DateCondition::parse(
                operator,
                self.date_from.as_deref(),
                self.date_to.as_deref(),
            )
            .map(FilterCondition::Date),
            _ => None,
        }
    }

    fn text_operand(&self) -> Option<String> {
        match self.filter.as_ref()? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            serde_json::Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

/// A validated per-column filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterCondition {
    Text(TextCondition),
    Date(DateCondition),
}

/// Text predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextCondition {
    Contains(String),
    NotContains(String),
    Equals(String),
    NotEqual(String),
    StartsWith(String),
    EndsWith(String),
    Blank,
    NotBlank,
}

impl TextCondition {
    fn parse(operator: &str, operand: Option<String>) -> Option<Self> {
        // blank/notBlank never look at the operand
        match operator {
            "blank" => return Some(TextCondition::Blank),
            "notBlank" => return Some(TextCondition::NotBlank),
            _ => {}
        }
        let operand = operand?;
        Some(match operator {
            "contains" => TextCondition::Contains(operand),
            "notContains" => TextCondition::NotContains(operand),
            "equals" => TextCondition::Equals(operand),
            "notEqual" => TextCondition::NotEqual(operand),
            "startsWith" => TextCondition::StartsWith(operand),
            "endsWith" => TextCondition::EndsWith(operand),
            _ => return None,
        })
    }
}

/// Date predicates. Bounds are passed to the store as-is and cast there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateCondition {
    LessThan(String),
    GreaterThan(String),
    /// Inclusive on both ends.
    InRange(String, String),
    Equals(String),
}

impl DateCondition {
    fn parse(operator: &str, from: Option<&str>, to: Option<&str>) -> Option<Self> {
        let from = from?.to_string();
        Some(match operator {
            "lessThan" => DateCondition::LessThan(from),
            "greaterThan" => DateCondition::GreaterThan(from),
            "inRange" => DateCondition::InRange(from, to?.to_string()),
            "equals" => DateCondition::Equals(from),
            _ => return None,
        })
    }
}

/// Sort direction. Anything other than `asc`/`desc` fails to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// SQL keyword for this direction.
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// One sort key. Position in the sort model gives its precedence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortDescriptor {
    /// Logical column id.
    pub col_id: String,
    /// Sort direction.
    pub sort: SortDirection,
}

impl SortDescriptor {
    pub fn asc(col_id: impl Into<String>) -> Self {
        Self {
            col_id: col_id.into(),
            sort: SortDirection::Asc,
        }
    }

    pub fn desc(col_id: impl Into<String>) -> Self {
        Self {
            col_id: col_id.into(),
            sort: SortDirection::Desc,
        }
    }
}

/// Decode a sort model that may arrive structured or JSON-encoded.
///
/// `null`, an empty string and an empty object decode to no sort keys.
pub fn decode_sort_model(raw: &serde_json::Value) -> Result<Vec<SortDescriptor>, Error> {
    match raw {
        serde_json::Value::Null => Ok(Vec::new()),
        serde_json::Value::String(s) if s.trim().is_empty() => Ok(Vec::new()),
        serde_json::Value::String(s) => {
            let parsed: serde_json::Value = serde_json::from_str(s)?;
            decode_sort_model(&parsed)
        }
        serde_json::Value::Object(map) if map.is_empty() => Ok(Vec::new()),
        other => Ok(Vec::<SortDescriptor>::deserialize(other)?),
    }
}
