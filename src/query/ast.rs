//! Query Building Blocks
//!
//! Defines the clause types a [`Query`](super::Query) accumulates before it is
//! rendered into InfluxQL text.
//!
//! # Clause Shapes
//!
//! ```text
//! SELECT <expr>[, <expr>...]
//! FROM "<db>"."<rp>"."<measurement>" | FROM (<subquery>)
//! WHERE <cond>[ AND <cond>...]
//! GROUP BY <expr>[, <expr>...]
//! ORDER BY <field> ASC|DESC[, ...]
//! FILL(<kind>[, <number>])
//! LIMIT <n>
//! SLIMIT <n>
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::builder::Query;

/// A selected column or function expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Column name or function expression, classified at render time
    pub column: String,
    /// Optional alias, rendered verbatim inside double quotes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl Field {
    /// Create a field without an alias
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            alias: None,
        }
    }

    /// Add an alias. An empty alias means "no alias".
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        self.alias = if alias.is_empty() { None } else { Some(alias) };
        self
    }
}

/// Target of the FROM clause
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FromClause {
    /// `"<db>"."<rp>"."<measurement>"`, empty parts are skipped
    Measurement {
        #[serde(default)]
        database: String,
        #[serde(default)]
        retention_policy: String,
        #[serde(default)]
        measurement: String,
    },
    /// `(<subquery>)`
    SubQuery(Box<Query>),
}

impl FromClause {
    /// Create a measurement target
    pub fn measurement(
        database: impl Into<String>,
        retention_policy: impl Into<String>,
        measurement: impl Into<String>,
    ) -> Self {
        Self::Measurement {
            database: database.into(),
            retention_policy: retention_policy.into(),
            measurement: measurement.into(),
        }
    }

    /// Create a nested sub-query target
    pub fn sub_query(query: Query) -> Self {
        Self::SubQuery(Box::new(query))
    }

    /// Whether this target renders to nothing
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Measurement {
                database,
                retention_policy,
                measurement,
            } => database.is_empty() && retention_policy.is_empty() && measurement.is_empty(),
            Self::SubQuery(query) => query.is_empty(),
        }
    }
}

/// A condition in the WHERE clause
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// `<field> <symbol> <value>` with the field and value classified
    Comparison {
        field: String,
        symbol: String,
        value: Value,
    },
    /// Text passed through exactly as given
    Raw(String),
}

impl Condition {
    /// Create a structured comparison
    pub fn comparison(
        field: impl Into<String>,
        symbol: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Self::Comparison {
            field: field.into(),
            symbol: symbol.into(),
            value: value.into(),
        }
    }

    /// Create a raw condition
    pub fn raw(text: impl Into<String>) -> Self {
        Self::Raw(text.into())
    }
}

/// Right-hand side of a comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    /// Integer value
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// Boolean value
    Boolean(bool),
    /// Timestamp, rendered as RFC 3339
    Time(DateTime<Utc>),
    /// String value or raw expression such as `now() - 7d`
    String(String),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Integer(v.into())
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Integer(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Time(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

/// A term in the ORDER BY clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Field name or function expression
    pub field: String,
    /// `ASC` when true, `DESC` otherwise
    pub ascending: bool,
}

impl Order {
    /// Create a new order term
    pub fn new(field: impl Into<String>, ascending: bool) -> Self {
        Self {
            field: field.into(),
            ascending,
        }
    }
}

/// Policy for filling empty time buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fill {
    /// `FILL(null)`
    Null,
    /// `FILL(previous)`
    Previous,
    /// `FILL(number, <n>)`
    Number(i64),
    /// `FILL(none)`
    None,
    /// `FILL(linear)`
    Linear,
}

impl Fill {
    /// Keyword inside the parentheses
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Previous => "previous",
            Self::Number(_) => "number",
            Self::None => "none",
            Self::Linear => "linear",
        }
    }
}

impl std::str::FromStr for Fill {
    type Err = super::error::QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_lowercase().as_str() {
            "null" => Ok(Self::Null),
            "previous" => Ok(Self::Previous),
            "none" => Ok(Self::None),
            "linear" => Ok(Self::Linear),
            other => other
                .strip_prefix("number")
                .map(|rest| rest.trim_start_matches([',', ':', ' ']))
                .unwrap_or(other)
                .parse::<i64>()
                .map(Self::Number)
                .map_err(|_| super::error::QueryError::InvalidFill(s.to_string())),
        }
    }
}
