//! Clause Parsers
//!
//! Reads single clause arguments written as text, as accepted on the command
//! line, and turns them into builder inputs.
//!
//! # Supported Forms
//!
//! ```text
//! select:    <expr> [AS <alias>]
//! condition: <field> <op> <value>     op: =~ !~ >= <= != <> = > <
//! order:     <field> [ASC|DESC]
//! ```
//!
//! Condition values may be a quoted string (`'web01'`), an integer, a float,
//! `true`/`false`, or any other text, which is kept as an expression such as
//! `now() - 7d`.

use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while, take_while1},
    character::complete::{anychar, char, digit1, multispace0, multispace1},
    combinator::{all_consuming, eof, map, map_res, opt, recognize, rest, value},
    multi::many_till,
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};

use crate::query::ast::Value;
use crate::query::error::{QueryError, QueryResult};

/// Parse `<expr> [AS <alias>]`
pub fn parse_select(input: &str) -> QueryResult<(String, Option<String>)> {
    let input = input.trim();

    let (expr, alias) = match select_item(input) {
        Ok((_, item)) => item,
        Err(e) => {
            return Err(QueryError::Parse(format!(
                "Invalid select '{}': {:?}",
                input, e
            )))
        }
    };

    let expr = expr.trim().to_string();
    if expr.is_empty() {
        return Err(QueryError::Parse(format!("Empty select expression in '{}'", input)));
    }

    Ok((expr, alias))
}

/// Parse `<field> <op> <value>`
pub fn parse_condition(input: &str) -> QueryResult<(String, String, Value)> {
    let input = input.trim();

    match condition(input) {
        Ok((_, (field, op, raw))) => {
            let raw = raw.trim();
            if raw.is_empty() {
                return Err(QueryError::Parse(format!(
                    "Missing value in condition '{}'",
                    input
                )));
            }
            Ok((field, op.to_string(), parse_value(raw)))
        }
        Err(e) => Err(QueryError::Parse(format!(
            "Invalid condition '{}': {:?}",
            input, e
        ))),
    }
}

/// Parse `<field> [ASC|DESC]`; direction defaults to ascending
pub fn parse_order(input: &str) -> QueryResult<(String, bool)> {
    let input = input.trim();

    let (field, ascending) = match order_item(input) {
        Ok((_, item)) => item,
        Err(e) => {
            return Err(QueryError::Parse(format!(
                "Invalid order '{}': {:?}",
                input, e
            )))
        }
    };

    let field = field.trim().to_string();
    if field.is_empty() {
        return Err(QueryError::Parse(format!("Empty order field in '{}'", input)));
    }

    Ok((field, ascending.unwrap_or(true)))
}

/// Classify a condition value written as text
pub fn parse_value(raw: &str) -> Value {
    if let Ok((_, s)) = all_consuming(quoted_string)(raw) {
        return Value::String(s.to_string());
    }

    if let Ok((_, n)) = all_consuming(parse_integer)(raw) {
        return Value::Integer(n);
    }

    if let Ok((_, n)) = all_consuming(parse_float)(raw) {
        return Value::Float(n);
    }

    match raw {
        "true" => Value::Boolean(true),
        "false" => Value::Boolean(false),
        _ => Value::String(raw.to_string()),
    }
}

fn select_item(input: &str) -> IResult<&str, (String, Option<String>)> {
    alt((
        map(many_till(anychar, alias_suffix), |(chars, alias)| {
            (chars.into_iter().collect::<String>(), Some(alias.to_string()))
        }),
        map(rest, |expr: &str| (expr.to_string(), None)),
    ))(input)
}

/// ` AS <alias>` at the end of the input
fn alias_suffix(input: &str) -> IResult<&str, &str> {
    terminated(
        preceded(
            tuple((multispace1, tag_no_case("AS"), multispace1)),
            alt((
                delimited(char('"'), take_while1(|c: char| c != '"'), char('"')),
                take_while1(|c: char| !c.is_whitespace()),
            )),
        ),
        pair(multispace0, eof),
    )(input)
}

fn order_item(input: &str) -> IResult<&str, (String, Option<bool>)> {
    alt((
        map(many_till(anychar, direction_suffix), |(chars, ascending)| {
            (chars.into_iter().collect::<String>(), Some(ascending))
        }),
        map(rest, |field: &str| (field.to_string(), None)),
    ))(input)
}

/// ` ASC` or ` DESC` at the end of the input
fn direction_suffix(input: &str) -> IResult<&str, bool> {
    terminated(
        preceded(
            multispace1,
            alt((
                value(true, tag_no_case("ASC")),
                value(false, tag_no_case("DESC")),
            )),
        ),
        pair(multispace0, eof),
    )(input)
}

fn condition(input: &str) -> IResult<&str, (String, &str, &str)> {
    let (input, field) = alt((
        map(
            recognize(delimited(char('"'), take_while1(|c: char| c != '"'), char('"'))),
            str::to_string,
        ),
        map(
            take_while1(|c: char| !c.is_whitespace() && !"=!<>".contains(c)),
            str::to_string,
        ),
    ))(input)?;
    let (input, _) = multispace0(input)?;
    let (input, op) = parse_operator(input)?;
    let (input, _) = multispace0(input)?;
    let (input, raw) = rest(input)?;

    Ok((input, (field, op, raw)))
}

/// Comparison operator, longest first
fn parse_operator(input: &str) -> IResult<&str, &str> {
    alt((
        tag("=~"),
        tag("!~"),
        tag(">="),
        tag("<="),
        tag("!="),
        tag("<>"),
        tag("="),
        tag(">"),
        tag("<"),
    ))(input)
}

fn quoted_string(input: &str) -> IResult<&str, &str> {
    delimited(char('\''), take_while(|c: char| c != '\''), char('\''))(input)
}

fn parse_integer(input: &str) -> IResult<&str, i64> {
    map_res(recognize(pair(opt(char('-')), digit1)), |s: &str| {
        s.parse::<i64>()
    })(input)
}

fn parse_float(input: &str) -> IResult<&str, f64> {
    map_res(
        recognize(tuple((opt(char('-')), digit1, char('.'), digit1))),
        |s: &str| s.parse::<f64>(),
    )(input)
}
