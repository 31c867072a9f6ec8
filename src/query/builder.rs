//! Query Builder
//!
//! [`Query`] accumulates clause fragments in the order they are added and
//! renders them on demand. Every mutating method returns `&mut Self` so calls
//! can be chained:
//!
//! ```rust
//! use influxql_builder::Query;
//!
//! let mut query = Query::new();
//! query
//!     .add_select("mean(usage_idle)", "idle")
//!     .set_from("telegraf", "autogen", "cpu")
//!     .add_where("time", ">", "now() - 1h")
//!     .add_group_by_time("5m")
//!     .set_fill_none();
//!
//! assert_eq!(
//!     query.render(),
//!     r#"SELECT mean("usage_idle") as "idle" FROM "telegraf"."autogen"."cpu" WHERE time > now() - 1h GROUP BY time(5m) FILL(none)"#
//! );
//! ```

use serde::{Deserialize, Serialize};

use super::ast::{Condition, Field, Fill, FromClause, Order, Value};
use super::classify::quote_identifier;
use super::error::QueryResult;

/// An InfluxQL query under construction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Query {
    pub(crate) fields: Vec<Field>,
    pub(crate) from: Option<FromClause>,
    pub(crate) conditions: Vec<Condition>,
    pub(crate) group_bys: Vec<String>,
    pub(crate) order_bys: Vec<Order>,
    pub(crate) fill: Option<Fill>,
    pub(crate) limit: Option<i64>,
    pub(crate) series_limit: Option<i64>,
}

impl Query {
    /// Create an empty query
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the query renders to an empty string
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
            && self.from.as_ref().map_or(true, FromClause::is_empty)
            && self.conditions.is_empty()
            && self.group_bys.is_empty()
            && self.order_bys.is_empty()
            && self.fill.is_none()
            && self.limit.is_none()
            && self.series_limit.is_none()
    }

    /// Read a query from its JSON form
    pub fn from_json(json: &str) -> QueryResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the query to pretty-printed JSON
    pub fn to_json(&self) -> QueryResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    // ---- SELECT ----

    /// Append a selected column or function expression. An empty alias means
    /// no alias.
    pub fn add_select(&mut self, column: impl Into<String>, alias: impl Into<String>) -> &mut Self {
        self.fields.push(Field::new(column).with_alias(alias));
        self
    }

    /// Append a prepared field
    pub fn add_field(&mut self, field: Field) -> &mut Self {
        self.fields.push(field);
        self
    }

    // ---- FROM ----

    /// Select from `"<database>"."<retention_policy>"."<measurement>"`,
    /// replacing any previous target. Empty parts are skipped.
    pub fn set_from(
        &mut self,
        database: impl Into<String>,
        retention_policy: impl Into<String>,
        measurement: impl Into<String>,
    ) -> &mut Self {
        self.from = Some(FromClause::measurement(
            database,
            retention_policy,
            measurement,
        ));
        self
    }

    /// Select from a nested query, replacing any previous target
    pub fn set_from_sub_query(&mut self, query: Query) -> &mut Self {
        self.from = Some(FromClause::sub_query(query));
        self
    }

    // ---- WHERE ----

    /// Append `<field> <symbol> <value>`, ANDed with earlier conditions
    pub fn add_where(
        &mut self,
        field: impl Into<String>,
        symbol: impl Into<String>,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.conditions
            .push(Condition::comparison(field, symbol, value));
        self
    }

    /// Append a condition rendered exactly as given
    pub fn add_where_raw(&mut self, text: impl Into<String>) -> &mut Self {
        self.conditions.push(Condition::raw(text));
        self
    }

    // ---- GROUP BY ----

    /// Append a group-by term
    pub fn add_group_by(&mut self, expr: impl Into<String>) -> &mut Self {
        self.group_bys.push(quote_identifier(&expr.into()));
        self
    }

    /// Append a `time(<duration>)` bucket
    pub fn add_group_by_time(&mut self, duration: impl Into<String>) -> &mut Self {
        self.add_group_by(format!("time({})", duration.into()))
    }

    // ---- ORDER BY ----

    /// Append an ordering term
    pub fn add_order_by(&mut self, field: impl Into<String>, ascending: bool) -> &mut Self {
        self.order_bys.push(Order::new(field, ascending));
        self
    }

    // ---- FILL ----

    /// Set the fill policy; last write wins
    pub fn set_fill(&mut self, fill: Fill) -> &mut Self {
        self.fill = Some(fill);
        self
    }

    pub fn set_fill_null(&mut self) -> &mut Self {
        self.set_fill(Fill::Null)
    }

    pub fn set_fill_previous(&mut self) -> &mut Self {
        self.set_fill(Fill::Previous)
    }

    pub fn set_fill_number(&mut self, number: i64) -> &mut Self {
        self.set_fill(Fill::Number(number))
    }

    pub fn set_fill_none(&mut self) -> &mut Self {
        self.set_fill(Fill::None)
    }

    pub fn set_fill_linear(&mut self) -> &mut Self {
        self.set_fill(Fill::Linear)
    }

    // ---- LIMIT / SLIMIT ----

    /// Limit the number of points returned per series
    pub fn set_limit(&mut self, limit: i64) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    /// Limit the number of series returned
    pub fn set_series_limit(&mut self, limit: i64) -> &mut Self {
        self.series_limit = Some(limit);
        self
    }
}
