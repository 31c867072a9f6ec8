//! InfluxQL Query Builder
//!
//! Composes InfluxQL query strings from structured calls:
//!
//! - **AST**: Clause types (fields, FROM target, conditions, ordering, fill)
//! - **Builder**: [`Query`] and its chainable clause accumulators
//! - **Classify**: Identifier and value quoting rules
//! - **Render**: Fixed-order rendering into a single string
//! - **Parser**: Textual clause arguments, as given on the command line
//!
//! # Output Shape
//!
//! ```text
//! SELECT <expr>[, ...] FROM <target> WHERE <cond>[ AND ...]
//! GROUP BY <expr>[, ...] ORDER BY <field> ASC|DESC[, ...]
//! FILL(<kind>[, <n>]) LIMIT <n> SLIMIT <n>
//! ```
//!
//! Clauses always appear in this order, no matter the order of the builder
//! calls, and clauses with nothing in them are left out.
//!
//! # Examples
//!
//! ```rust
//! use influxql_builder::query::Query;
//!
//! let mut query = Query::new();
//! query
//!     .add_where("col1", "=", 1)
//!     .add_where("f(col2)", "=", 2)
//!     .add_where_raw("col3 = '3'")
//!     .add_where("time", ">", "NOW()-7d");
//!
//! assert_eq!(
//!     query.render(),
//!     r#"WHERE "col1" = '1' AND f("col2") = '2' AND col3 = '3' AND time > NOW()-7d"#
//! );
//! ```

mod ast;
mod builder;
pub mod classify;
mod error;
pub mod parser;
mod render;

pub use ast::{Condition, Field, Fill, FromClause, Order, Value};
pub use builder::Query;
pub use error::{QueryError, QueryResult};
pub use parser::{parse_condition, parse_order, parse_select};
