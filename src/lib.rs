//! # influxql-builder
//!
//! A fluent builder for InfluxQL-style time-series query strings. Instead of
//! concatenating strings by hand, compose queries from structured calls and
//! get consistent identifier quoting and value escaping.
//!
//! ## Features
//!
//! - **Fixed clause order**: SELECT, FROM, WHERE, GROUP BY, ORDER BY, FILL,
//!   LIMIT, SLIMIT, whatever order the builder calls came in
//! - **Quoting rules**: bare identifiers are double-quoted, `func(col)` only
//!   has its argument quoted, time expressions and raw expressions pass through
//! - **Sub-queries**: any query can be used as the FROM target of another
//! - **Serializable**: queries round-trip through JSON
//!
//! ## Modules
//!
//! - [`query`]: Builder, classifier and renderer
//! - [`config`]: Configuration for the `influxql` command
//!
//! ## Quick Start
//!
//! ```rust
//! use influxql_builder::Query;
//!
//! let mut query = Query::new();
//! query
//!     .add_select("func1(col1)", "")
//!     .add_select("col2", "")
//!     .add_select("col3", "col3alias")
//!     .set_from("x", "y", "z")
//!     .add_group_by("col1")
//!     .add_group_by_time("10m")
//!     .set_limit(2)
//!     .set_series_limit(2);
//!
//! assert_eq!(
//!     query.render(),
//!     r#"SELECT func1("col1"), "col2", "col3" as "col3alias" FROM "x"."y"."z" GROUP BY "col1", time(10m) LIMIT 2 SLIMIT 2"#
//! );
//! ```

pub mod config;
pub mod query;

// Re-export top-level types for convenience
pub use query::{
    Condition, Field, Fill, FromClause, Order, Query, QueryError, QueryResult, Value,
};

pub use config::{Config, ConfigError, DefaultsConfig, LoggingConfig, OutputConfig};
