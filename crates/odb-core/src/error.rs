//! Error types for ODB.
//!
//! Only driver-level problems are surfaced as errors. Builder misuse is reported
//! through warnings and malformed filter clauses are dropped by the encoder, so
//! neither ever reaches this module.

use std::fmt;

/// The primary error type for all ODB operations.
#[derive(Debug)]
pub enum Error {
    /// No usable driver handle (connection never established or lost).
    Connection(ConnectionError),
    /// The driver rejected or failed a statement.
    Query(QueryError),
    /// A stored value could not be converted into a field's type.
    Type(TypeError),
    /// A structured payload could not be encoded or decoded.
    Codec(String),
    /// Custom error with message.
    Custom(String),
}

/// Connection-level failure.
#[derive(Debug)]
pub struct ConnectionError {
    pub kind: ConnectionErrorKind,
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionErrorKind {
    /// No handle has been established yet.
    Unavailable,
    /// The handle existed but was dropped by the server or the driver.
    Lost,
}

/// Statement-level failure reported by the driver.
#[derive(Debug)]
pub struct QueryError {
    pub kind: QueryErrorKind,
    pub message: String,
    /// The statement text, when known.
    pub sql: Option<String>,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryErrorKind {
    /// Statement could not be prepared (syntax, unknown table or column).
    Prepare,
    /// Statement was prepared but failed during execution (constraint, lock).
    Execute,
    /// The driver returned a result shape the engine did not ask for.
    UnexpectedResult,
}

/// Conversion failure between a stored value and a Rust field.
#[derive(Debug)]
pub struct TypeError {
    pub expected: &'static str,
    pub actual: String,
    pub column: Option<String>,
}

impl Error {
    /// Shorthand for the "no driver handle" error.
    pub fn connection_unavailable() -> Self {
        Error::Connection(ConnectionError {
            kind: ConnectionErrorKind::Unavailable,
            message: "No connection available".to_string(),
            source: None,
        })
    }

    /// Shorthand for a statement failure carrying its SQL text.
    pub fn statement(kind: QueryErrorKind, message: impl Into<String>, sql: &str) -> Self {
        Error::Query(QueryError {
            kind,
            message: message.into(),
            sql: Some(sql.to_string()),
            source: None,
        })
    }

    /// True if this is a connection-level error.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Error::Connection(_))
    }

    /// True if this is a statement failure reported by the driver.
    pub fn is_statement_failure(&self) -> bool {
        matches!(self, Error::Query(_))
    }

    /// Attach the column a conversion error refers to.
    #[must_use]
    pub fn with_column(self, column: &str) -> Self {
        match self {
            Error::Type(mut err) => {
                err.column = Some(column.to_string());
                Error::Type(err)
            }
            other => other,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Connection(e) => write!(f, "Connection error: {}", e.message),
            Error::Query(e) => match &e.sql {
                Some(sql) => write!(f, "Query failed: {} (sql: {})", e.message, sql),
                None => write!(f, "Query failed: {}", e.message),
            },
            Error::Type(e) => match &e.column {
                Some(col) => write!(
                    f,
                    "Type error in column '{}': expected {}, found {}",
                    col, e.expected, e.actual
                ),
                None => write!(f, "Type error: expected {}, found {}", e.expected, e.actual),
            },
            Error::Codec(msg) => write!(f, "Codec error: {}", msg),
            Error::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Connection(e) => e
                .source
                .as_ref()
                .map(|s| s.as_ref() as &(dyn std::error::Error + 'static)),
            Error::Query(e) => e
                .source
                .as_ref()
                .map(|s| s.as_ref() as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Codec(err.to_string())
    }
}

/// Result type alias for ODB operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_unavailable_message() {
        let err = Error::connection_unavailable();
        assert!(err.is_connection_error());
        assert_eq!(err.to_string(), "Connection error: No connection available");
    }

    #[test]
    fn statement_error_includes_sql() {
        let err = Error::statement(QueryErrorKind::Execute, "duplicate key", "INSERT INTO `t`");
        assert!(err.is_statement_failure());
        assert_eq!(
            err.to_string(),
            "Query failed: duplicate key (sql: INSERT INTO `t`)"
        );
    }

    #[test]
    fn with_column_only_touches_type_errors() {
        let err = Error::Type(TypeError {
            expected: "i64",
            actual: "Text".to_string(),
            column: None,
        })
        .with_column("age");
        assert_eq!(
            err.to_string(),
            "Type error in column 'age': expected i64, found Text"
        );

        let other = Error::Custom("boom".to_string()).with_column("age");
        assert_eq!(other.to_string(), "boom");
    }
}
