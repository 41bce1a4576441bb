//! The database driver contract.
//!
//! ODB never talks to a database itself. A [`Driver`] prepares and runs a
//! statement with named parameters and hands back the result in the shape the
//! caller asked for. Connection setup, pooling, timeouts and retries all live
//! behind this trait.

use std::rc::Rc;
use std::sync::Arc;

use crate::error::Result;
use crate::params::Params;
use crate::row::Row;

/// What the caller wants back from a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReturnMode {
    /// Materialize every row.
    #[default]
    Rows,
    /// Number of rows the statement produced or touched.
    Count,
    /// Success flag; statement failures become `false` instead of errors.
    Bool,
    /// Run for side effects only.
    None,
}

impl ReturnMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            ReturnMode::Rows => "rows",
            ReturnMode::Count => "count",
            ReturnMode::Bool => "bool",
            ReturnMode::None => "none",
        }
    }
}

/// Result of a successfully executed statement.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutput {
    Rows(Vec<Row>),
    Count(u64),
    /// The statement ran; used for `Bool` and `None` modes.
    Done,
}

/// A blocking database driver.
///
/// Implementations must report a failed statement as `Err`, never as an empty
/// row set, so callers can tell "no match" apart from "query error". A driver
/// without a live handle returns [`crate::Error::connection_unavailable`].
pub trait Driver {
    /// Execute `sql` with `params` bound by name (`:name` in the SQL text).
    fn execute(&self, sql: &str, params: &Params, mode: ReturnMode) -> Result<QueryOutput>;

    /// Identifier generated by the most recent successful INSERT.
    fn last_insert_id(&self) -> Result<Option<i64>>;
}

impl<D: Driver + ?Sized> Driver for &D {
    fn execute(&self, sql: &str, params: &Params, mode: ReturnMode) -> Result<QueryOutput> {
        (**self).execute(sql, params, mode)
    }

    fn last_insert_id(&self) -> Result<Option<i64>> {
        (**self).last_insert_id()
    }
}

impl<D: Driver + ?Sized> Driver for Box<D> {
    fn execute(&self, sql: &str, params: &Params, mode: ReturnMode) -> Result<QueryOutput> {
        (**self).execute(sql, params, mode)
    }

    fn last_insert_id(&self) -> Result<Option<i64>> {
        (**self).last_insert_id()
    }
}

impl<D: Driver + ?Sized> Driver for Rc<D> {
    fn execute(&self, sql: &str, params: &Params, mode: ReturnMode) -> Result<QueryOutput> {
        (**self).execute(sql, params, mode)
    }

    fn last_insert_id(&self) -> Result<Option<i64>> {
        (**self).last_insert_id()
    }
}

impl<D: Driver + ?Sized> Driver for Arc<D> {
    fn execute(&self, sql: &str, params: &Params, mode: ReturnMode) -> Result<QueryOutput> {
        (**self).execute(sql, params, mode)
    }

    fn last_insert_id(&self) -> Result<Option<i64>> {
        (**self).last_insert_id()
    }
}
