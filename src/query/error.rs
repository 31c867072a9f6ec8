//! Query error types
//!
//! The builder and renderer never fail. These errors only come from reading
//! clauses or whole queries from text.

use thiserror::Error;

/// Errors that can occur while reading a query from text
#[derive(Error, Debug)]
pub enum QueryError {
    /// A textual clause could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Unknown fill policy
    #[error("Invalid fill policy: {0}")]
    InvalidFill(String),

    /// JSON query document could not be read
    #[error("Invalid query document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;
