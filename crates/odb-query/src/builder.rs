//! Fluent builder over [`QuerySpec`].
//!
//! The builder validates and records intent. It never fails: conflicting calls
//! are reported through the injected [`WarningSink`] (tracing by default) and
//! the last valid value wins.
//!
//! # Example
//!
//! ```
//! use odb_query::{Direction, Operator, QueryBuilder};
//!
//! let query = QueryBuilder::new()
//!     .where_("firstname", "Oliver")
//!     .and_where("lastname", "Brown")
//!     .or_where_op("age", 65_i64, Operator::Ge)
//!     .order_by("lastname", Direction::Asc)
//!     .paginate(20, 3);
//!
//! let spec = query.to_spec();
//! assert_eq!(spec.where_groups.as_ref().map(Vec::len), Some(2));
//! assert_eq!((spec.limit, spec.offset), (Some(20), Some(40)));
//! ```

use std::fmt;
use std::sync::Arc;

use odb_core::Value;

use crate::spec::{Direction, Operator, OrderClause, QuerySpec, WhereClause};
use crate::warning::{QueryWarning, TracingWarnings, WarningSink};

/// Mutating façade over a [`QuerySpec`].
#[derive(Clone, Default)]
pub struct QueryBuilder {
    spec: QuerySpec,
    sink: Option<Arc<dyn WarningSink>>,
}

impl fmt::Debug for QueryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("spec", &self.spec)
            .field("custom_sink", &self.sink.is_some())
            .finish()
    }
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report warnings to `sink` instead of `tracing`.
    pub fn with_warnings(mut self, sink: Arc<dyn WarningSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Rebuild a builder from an exported specification.
    pub fn from_spec(spec: QuerySpec) -> Self {
        Self { spec, sink: None }
    }

    /// Structural export of the recorded intent.
    pub fn to_spec(&self) -> QuerySpec {
        self.spec.clone()
    }

    pub fn into_spec(self) -> QuerySpec {
        self.spec
    }

    pub fn spec(&self) -> &QuerySpec {
        &self.spec
    }

    fn warn(&self, warning: QueryWarning) {
        match &self.sink {
            Some(sink) => sink.warn(warning),
            None => TracingWarnings.warn(warning),
        }
    }

    // ------------------------------------------------------------------
    // Columns and table
    // ------------------------------------------------------------------

    /// Select only these columns.
    pub fn select_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.spec.columns.is_some() {
            self.warn(QueryWarning::ColumnsOverwritten);
        }
        self.spec.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Append a single column; may be called repeatedly.
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.spec
            .columns
            .get_or_insert_with(Vec::new)
            .push(column.into());
        self
    }

    pub fn from(mut self, table: impl Into<String>) -> Self {
        if self.spec.table.is_some() {
            self.warn(QueryWarning::TableOverwritten);
        }
        self.spec.table = Some(table.into());
        self
    }

    // ------------------------------------------------------------------
    // Paging
    // ------------------------------------------------------------------

    /// `limit(count)` is `limit_offset(count, 0)`.
    pub fn limit(self, count: i64) -> Self {
        self.limit_offset(count, 0)
    }

    /// Limit the number of rows and skip `offset` rows.
    ///
    /// Each argument is checked on its own: a negative value is ignored with
    /// a warning and the previous value is kept.
    pub fn limit_offset(mut self, count: i64, offset: i64) -> Self {
        match u64::try_from(count) {
            Ok(count) => {
                if self.spec.limit.is_some() {
                    self.warn(QueryWarning::LimitOverwritten);
                }
                self.spec.limit = Some(count);
            }
            Err(_) => self.warn(QueryWarning::NegativeLimit),
        }
        match u64::try_from(offset) {
            Ok(offset) => {
                if self.spec.offset.is_some() {
                    self.warn(QueryWarning::OffsetOverwritten);
                }
                self.spec.offset = Some(offset);
            }
            Err(_) => self.warn(QueryWarning::NegativeOffset),
        }
        self
    }

    /// Page `page` (1-based) of `per_page` rows.
    pub fn paginate(self, per_page: i64, page: i64) -> Self {
        let offset = per_page.saturating_mul(page.saturating_sub(1));
        self.limit_offset(per_page, offset)
    }

    // ------------------------------------------------------------------
    // Filters
    // ------------------------------------------------------------------

    /// Start the filter with `key = value`.
    pub fn where_(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.where_op(key, value, Operator::Eq)
    }

    /// Start the filter with one clause.
    ///
    /// Calling this when a filter already exists only warns; the existing
    /// filter is left unchanged.
    pub fn where_op(
        mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
        operator: impl Into<String>,
    ) -> Self {
        if self.spec.where_groups.is_some() {
            self.warn(QueryWarning::WhereAlreadyInitiated);
        } else {
            self.spec.where_groups = Some(vec![vec![WhereClause::new(key, value, operator)]]);
        }
        self
    }

    pub fn and_where(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.and_where_op(key, value, Operator::Eq)
    }

    /// AND a clause onto the last OR-group.
    pub fn and_where_op(
        mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
        operator: impl Into<String>,
    ) -> Self {
        let clause = WhereClause::new(key, value, operator);
        match self.spec.where_groups.as_mut().and_then(|g| g.last_mut()) {
            Some(group) => group.push(clause),
            None => {
                self.warn(QueryWarning::WhereNotInitiated);
                self.spec.where_groups = Some(vec![vec![clause]]);
            }
        }
        self
    }

    pub fn or_where(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.or_where_op(key, value, Operator::Eq)
    }

    /// Start a new OR-group with one clause.
    pub fn or_where_op(
        mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
        operator: impl Into<String>,
    ) -> Self {
        let clause = WhereClause::new(key, value, operator);
        match self.spec.where_groups.as_mut() {
            Some(groups) => groups.push(vec![clause]),
            None => {
                self.warn(QueryWarning::WhereNotInitiated);
                self.spec.where_groups = Some(vec![vec![clause]]);
            }
        }
        self
    }

    // ------------------------------------------------------------------
    // Ordering
    // ------------------------------------------------------------------

    /// Append an ORDER BY key; repeatable.
    pub fn order_by(mut self, key: impl Into<String>, direction: Direction) -> Self {
        self.spec.order.push(OrderClause {
            key: key.into(),
            direction,
        });
        self
    }
}

impl From<QuerySpec> for QueryBuilder {
    fn from(spec: QuerySpec) -> Self {
        Self::from_spec(spec)
    }
}
