//! SQL encoders.
//!
//! An encoder is a pure compiler from a [`QuerySpec`] (plus, for writes, a
//! column-value map) to SQL text and bound [`Params`]. Values never appear in
//! the SQL text; identifiers are escaped and interpolated. Malformed intent
//! (unknown operator, empty key) is dropped silently, never reported.

mod mysql;

pub use mysql::MySqlEncoder;

use odb_core::{Params, Value};

use crate::spec::QuerySpec;

/// SQL text plus the parameters it references.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Params,
}

impl Statement {
    pub fn new(sql: impl Into<String>, params: Params) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

/// Compiles query intent for one SQL dialect.
pub trait QueryEncoder {
    /// `SELECT` for the query's table, filter, ordering and paging.
    fn select(&self, spec: &QuerySpec) -> Statement;

    /// Statement whose affected-row count answers "how many rows match".
    fn count(&self, spec: &QuerySpec) -> Statement {
        self.select(spec)
    }

    /// `INSERT` of one row.
    fn insert(&self, table: &str, data: &[(&str, Value)]) -> Statement;

    /// `UPDATE` of the rows selected by the query's filter.
    ///
    /// Returns `None` when `data` is empty: there is nothing to do.
    fn update(&self, spec: &QuerySpec, data: &[(&str, Value)]) -> Option<Statement>;

    /// `DELETE` of the row with the given primary key.
    fn delete_by_id(&self, table: &str, id: i64) -> Statement;
}

impl<E: QueryEncoder + ?Sized> QueryEncoder for &E {
    fn select(&self, spec: &QuerySpec) -> Statement {
        (**self).select(spec)
    }

    fn count(&self, spec: &QuerySpec) -> Statement {
        (**self).count(spec)
    }

    fn insert(&self, table: &str, data: &[(&str, Value)]) -> Statement {
        (**self).insert(table, data)
    }

    fn update(&self, spec: &QuerySpec, data: &[(&str, Value)]) -> Option<Statement> {
        (**self).update(spec, data)
    }

    fn delete_by_id(&self, table: &str, id: i64) -> Statement {
        (**self).delete_by_id(table, id)
    }
}
