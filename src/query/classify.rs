//! Token Classification
//!
//! Decides how a token is quoted when it lands in a query:
//!
//! 1. Tokens starting with `time` are time expressions (`time(10m)`) and pass
//!    through with any double quotes removed.
//! 2. `func(col)` calls get their inner identifier double-quoted:
//!    `func("col")`. The function name is never quoted.
//! 3. Any other call-like expression (`percentile(col, 95)`) is left alone.
//! 4. Everything else is a bare identifier and is wrapped in double quotes,
//!    without doubling quotes that are already there.
//!
//! Values follow a simpler rule: they are single-quoted unless they contain a
//! call-like expression, so `now() - 7d` stays a raw expression.

use regex::Regex;
use std::sync::LazyLock;

/// `<ident>(<ident>)`
static SIMPLE_CALL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Za-z0-9_]+)\(([A-Za-z0-9_]+)\)").expect("invalid simple call regex")
});

/// `<ident>(...)`
static CALL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9_]+\(.*?\)").expect("invalid call regex")
});

const TIME_PREFIX: &str = "time";

/// Quote a column, group-by term or condition field.
pub fn quote_identifier(token: &str) -> String {
    if token.starts_with(TIME_PREFIX) {
        return token.replace('"', "");
    }

    if SIMPLE_CALL_RE.is_match(token) {
        return SIMPLE_CALL_RE
            .replace_all(token, r#"${1}("${2}")"#)
            .into_owned();
    }

    if CALL_RE.is_match(token) {
        return token.to_string();
    }

    quote_name(token)
}

/// Wrap a name in double quotes, stripping one existing pair first.
pub fn quote_name(name: &str) -> String {
    let bare = name.strip_prefix('"').unwrap_or(name);
    let bare = bare.strip_suffix('"').unwrap_or(bare);
    format!("\"{}\"", bare)
}

/// Quote the textual form of a condition value.
pub fn quote_value(text: &str) -> String {
    if is_function_call(text) {
        text.to_string()
    } else {
        format!("'{}'", text)
    }
}

/// Whether the text contains a call-like expression such as `now()`.
pub fn is_function_call(text: &str) -> bool {
    CALL_RE.is_match(text)
}
