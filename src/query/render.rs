//! Query Rendering
//!
//! Turns an accumulated [`Query`] into a single InfluxQL string. Clauses are
//! always emitted in the order SELECT, FROM, WHERE, GROUP BY, ORDER BY, FILL,
//! LIMIT, SLIMIT, separated by single spaces. Empty clauses are skipped.

use std::fmt;

use chrono::SecondsFormat;

use super::ast::{Condition, Field, Fill, FromClause, Order, Value};
use super::builder::Query;
use super::classify::{quote_identifier, quote_name, quote_value};

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote_identifier(&self.column))?;
        if let Some(alias) = &self.alias {
            write!(f, " as \"{}\"", alias)?;
        }
        Ok(())
    }
}

impl fmt::Display for FromClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Measurement {
                database,
                retention_policy,
                measurement,
            } => {
                let parts: Vec<String> = [database, retention_policy, measurement]
                    .into_iter()
                    .filter(|part| !part.is_empty())
                    .map(|part| quote_name(part))
                    .collect();
                write!(f, "{}", parts.join("."))
            }
            Self::SubQuery(query) => write!(f, "({})", query),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Boolean(v) => write!(f, "{}", v),
            Self::Time(v) => write!(f, "{}", v.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Self::String(v) => write!(f, "{}", v),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comparison {
                field,
                symbol,
                value,
            } => write!(
                f,
                "{} {} {}",
                quote_identifier(field),
                symbol,
                quote_value(&value.to_string())
            ),
            Self::Raw(text) => write!(f, "{}", text),
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = if self.ascending { "ASC" } else { "DESC" };
        write!(f, "{} {}", quote_identifier(&self.field), direction)
    }
}

impl fmt::Display for Fill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "FILL({}, {})", self.kind(), n),
            _ => write!(f, "FILL({})", self.kind()),
        }
    }
}

fn join<T: fmt::Display>(items: &[T], separator: &str) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}

impl Query {
    /// Rendered clauses in output order, empty clauses omitted
    fn clauses(&self) -> Vec<String> {
        let mut clauses = Vec::new();

        if !self.fields.is_empty() {
            clauses.push(format!("SELECT {}", join(&self.fields, ", ")));
        }

        if let Some(from) = self.from.as_ref().filter(|from| !from.is_empty()) {
            clauses.push(format!("FROM {}", from));
        }

        if !self.conditions.is_empty() {
            clauses.push(format!("WHERE {}", join(&self.conditions, " AND ")));
        }

        if !self.group_bys.is_empty() {
            clauses.push(format!("GROUP BY {}", self.group_bys.join(", ")));
        }

        if !self.order_bys.is_empty() {
            clauses.push(format!("ORDER BY {}", join(&self.order_bys, ", ")));
        }

        if let Some(fill) = &self.fill {
            clauses.push(fill.to_string());
        }

        if let Some(limit) = self.limit {
            clauses.push(format!("LIMIT {}", limit));
        }

        if let Some(limit) = self.series_limit {
            clauses.push(format!("SLIMIT {}", limit));
        }

        clauses
    }

    /// Render the query. Rendering does not modify the query.
    pub fn render(&self) -> String {
        let clauses = self.clauses();
        let rendered = clauses.join(" ");
        tracing::trace!(
            clauses = clauses.len(),
            length = rendered.len(),
            "Rendered query"
        );
        rendered
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.clauses().join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_empty_query_renders_empty_string() {
        assert_eq!(Query::new().render(), "");
    }

    #[test]
    fn test_select() {
        let mut query = Query::new();

        query.add_select("func1(col1)", "");
        assert_eq!(query.render(), r#"SELECT func1("col1")"#);

        query.add_select("col2", "");
        assert_eq!(query.render(), r#"SELECT func1("col1"), "col2""#);

        query.add_select("col3", "col3alias");
        assert_eq!(
            query.render(),
            r#"SELECT func1("col1"), "col2", "col3" as "col3alias""#
        );

        query.add_select("func1(col1)", "func1_col");
        assert_eq!(
            query.render(),
            r#"SELECT func1("col1"), "col2", "col3" as "col3alias", func1("col1") as "func1_col""#
        );
    }

    #[test]
    fn test_alias_is_not_classified() {
        let mut query = Query::new();
        query.add_select("col1", "max(x)");
        assert_eq!(query.render(), r#"SELECT "col1" as "max(x)""#);
    }

    #[test]
    fn test_from() {
        let mut query = Query::new();
        query.set_from("x", "y", "z");
        assert_eq!(query.render(), r#"FROM "x"."y"."z""#);

        let mut outer = Query::new();
        outer.set_from_sub_query(query);
        assert_eq!(outer.render(), r#"FROM (FROM "x"."y"."z")"#);
    }

    #[test]
    fn test_from_skips_empty_parts() {
        let mut query = Query::new();

        query.set_from("", "", "cpu");
        assert_eq!(query.render(), r#"FROM "cpu""#);

        query.set_from("telegraf", "", "cpu");
        assert_eq!(query.render(), r#"FROM "telegraf"."cpu""#);

        query.set_from("", "", "");
        assert_eq!(query.render(), "");
    }

    #[test]
    fn test_from_does_not_double_quotes() {
        let mut query = Query::new();

        query.set_from(r#""telegraf""#, r#""autogen""#, r#""cpu""#);
        assert_eq!(query.render(), r#"FROM "telegraf"."autogen"."cpu""#);

        query.set_from("", "", r#""cpu""#);
        assert_eq!(query.render(), r#"FROM "cpu""#);
    }

    #[test]
    fn test_empty_sub_query_is_omitted() {
        let mut query = Query::new();
        query.add_select("value", "").set_from_sub_query(Query::new());
        assert_eq!(query.render(), r#"SELECT "value""#);
    }

    #[test]
    fn test_nested_sub_query() {
        let mut inner = Query::new();
        inner
            .add_select("mean(usage_user)", "m")
            .set_from("", "", "cpu")
            .add_group_by_time("1m");

        let mut outer = Query::new();
        outer.add_select("max(m)", "").set_from_sub_query(inner);

        assert_eq!(
            outer.render(),
            r#"SELECT max("m") FROM (SELECT mean("usage_user") as "m" FROM "cpu" GROUP BY time(1m))"#
        );
    }

    #[test]
    fn test_where() {
        let mut query = Query::new();

        query.add_where("col1", "=", 1);
        assert_eq!(query.render(), r#"WHERE "col1" = '1'"#);

        query.add_where("f(col2)", "=", 2);
        assert_eq!(query.render(), r#"WHERE "col1" = '1' AND f("col2") = '2'"#);

        query.add_where_raw("col3 = '3'");
        assert_eq!(
            query.render(),
            r#"WHERE "col1" = '1' AND f("col2") = '2' AND col3 = '3'"#
        );

        query.add_where("time", ">", "NOW()-7d");
        assert_eq!(
            query.render(),
            r#"WHERE "col1" = '1' AND f("col2") = '2' AND col3 = '3' AND time > NOW()-7d"#
        );
    }

    #[test]
    fn test_where_value_types() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 14, 0, 0).unwrap();

        let mut query = Query::new();
        query
            .add_where("ratio", ">=", 0.5)
            .add_where("active", "=", true)
            .add_where("time", ">=", ts);

        assert_eq!(
            query.render(),
            r#"WHERE "ratio" >= '0.5' AND "active" = 'true' AND time >= '2024-01-15T14:00:00Z'"#
        );
    }

    #[test]
    fn test_whole_float_renders_shortest() {
        let mut query = Query::new();
        query.add_where("x", "=", 2.0);
        assert_eq!(query.render(), r#"WHERE "x" = '2'"#);
    }

    #[test]
    fn test_group_by() {
        let mut query = Query::new();

        query.add_group_by("col1");
        assert_eq!(query.render(), r#"GROUP BY "col1""#);

        query.add_group_by_time("10m");
        assert_eq!(query.render(), r#"GROUP BY "col1", time(10m)"#);
    }

    #[test]
    fn test_order_by() {
        let mut query = Query::new();

        query.add_order_by("col1", true);
        assert_eq!(query.render(), r#"ORDER BY "col1" ASC"#);

        query.add_order_by("col1", false);
        assert_eq!(query.render(), r#"ORDER BY "col1" ASC, "col1" DESC"#);

        query.add_order_by("func1(col1)", true);
        assert_eq!(
            query.render(),
            r#"ORDER BY "col1" ASC, "col1" DESC, func1("col1") ASC"#
        );
    }

    #[test]
    fn test_fill() {
        let mut query = Query::new();

        query.set_fill_none();
        assert_eq!(query.render(), "FILL(none)");

        query.set_fill_number(2);
        assert_eq!(query.render(), "FILL(number, 2)");

        query.set_fill_number(0);
        assert_eq!(query.render(), "FILL(number, 0)");

        query.set_fill_null();
        assert_eq!(query.render(), "FILL(null)");

        query.set_fill_previous();
        assert_eq!(query.render(), "FILL(previous)");

        query.set_fill_linear();
        assert_eq!(query.render(), "FILL(linear)");
    }

    #[test]
    fn test_limits() {
        let mut query = Query::new();

        query.set_limit(2);
        assert_eq!(query.render(), "LIMIT 2");

        query.set_series_limit(2);
        assert_eq!(query.render(), "LIMIT 2 SLIMIT 2");
    }

    #[test]
    fn test_series_limit_alone() {
        let mut query = Query::new();
        query.set_series_limit(3);
        assert_eq!(query.render(), "SLIMIT 3");
    }

    #[test]
    fn test_clause_order_is_fixed() {
        let mut query = Query::new();
        query
            .set_series_limit(1)
            .set_limit(100)
            .set_fill_previous()
            .add_order_by("time", false)
            .add_group_by("host")
            .add_where("region", "=", "us-west")
            .set_from("telegraf", "autogen", "cpu")
            .add_select("last(usage_idle)", "");

        assert_eq!(
            query.render(),
            concat!(
                r#"SELECT last("usage_idle") FROM "telegraf"."autogen"."cpu" "#,
                r#"WHERE "region" = 'us-west' GROUP BY "host" ORDER BY time DESC "#,
                "FILL(previous) LIMIT 100 SLIMIT 1"
            )
        );
    }

    #[test]
    fn test_render_is_repeatable() {
        let mut query = Query::new();
        query.add_select("col1", "").set_limit(5);

        let first = query.render();
        assert_eq!(query.render(), first);
        assert_eq!(query.to_string(), first);
    }
}
