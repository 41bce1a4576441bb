//! Non-fatal builder warnings.
//!
//! Conflicting builder calls (overwriting the table, starting a second filter,
//! a negative limit) never fail. They are reported to a [`WarningSink`] and the
//! builder carries on with the last valid value.

use std::fmt;
use std::sync::{Arc, Mutex};

/// A recoverable misuse of [`QueryBuilder`](crate::QueryBuilder).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryWarning {
    ColumnsOverwritten,
    TableOverwritten,
    LimitOverwritten,
    OffsetOverwritten,
    NegativeLimit,
    NegativeOffset,
    /// `where_` called after the filter was already started.
    WhereAlreadyInitiated,
    /// `and_where` / `or_where` called before `where_`.
    WhereNotInitiated,
}

impl QueryWarning {
    pub const fn message(self) -> &'static str {
        match self {
            QueryWarning::ColumnsOverwritten => "Columns are overwritten.",
            QueryWarning::TableOverwritten => "Table is overwritten.",
            QueryWarning::LimitOverwritten => "Limit is overwritten.",
            QueryWarning::OffsetOverwritten => "Offset is overwritten.",
            QueryWarning::NegativeLimit => "Negative limit ignored.",
            QueryWarning::NegativeOffset => "Negative offset ignored.",
            QueryWarning::WhereAlreadyInitiated => "Where is already initiated.",
            QueryWarning::WhereNotInitiated => "Where has not been initiated yet.",
        }
    }
}

impl fmt::Display for QueryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Receives builder warnings.
pub trait WarningSink: Send + Sync {
    fn warn(&self, warning: QueryWarning);
}

/// Default sink: forwards warnings to `tracing` at WARN level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingWarnings;

impl WarningSink for TracingWarnings {
    fn warn(&self, warning: QueryWarning) {
        tracing::warn!(warning = ?warning, "{}", warning.message());
    }
}

/// Sink that records every warning; handy for tests and request-scoped
/// diagnostics.
#[derive(Debug, Clone, Default)]
pub struct CollectWarnings {
    seen: Arc<Mutex<Vec<QueryWarning>>>,
}

impl CollectWarnings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the warnings recorded so far.
    pub fn warnings(&self) -> Vec<QueryWarning> {
        self.seen.lock().map(|seen| seen.clone()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings().is_empty()
    }
}

impl WarningSink for CollectWarnings {
    fn warn(&self, warning: QueryWarning) {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(warning);
        }
    }
}

impl<F> WarningSink for F
where
    F: Fn(QueryWarning) + Send + Sync,
{
    fn warn(&self, warning: QueryWarning) {
        self(warning);
    }
}
