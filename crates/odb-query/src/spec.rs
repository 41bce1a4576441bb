//! Dialect-neutral query specification.
//!
//! A [`QuerySpec`] records *intent*: which columns, which table, which filters,
//! ordering and paging. It carries no SQL; encoders compile it.
//!
//! Filters are a two-level structure: a list of OR-groups, each an ordered list
//! of AND-clauses, i.e. `(c1 AND c2) OR (c3)`.

use std::fmt;

use odb_core::Value;
use serde::{Deserialize, Serialize};

/// Comparison operators an encoder will compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Eq,
    Gt,
    Lt,
    Ge,
    Le,
    /// `!=`
    Ne,
    /// `<>`
    NotEq,
    Between,
    Like,
    In,
}

impl Operator {
    pub const ALL: [Operator; 10] = [
        Operator::Eq,
        Operator::Gt,
        Operator::Lt,
        Operator::Ge,
        Operator::Le,
        Operator::Ne,
        Operator::NotEq,
        Operator::Between,
        Operator::Like,
        Operator::In,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Ge => ">=",
            Operator::Le => "<=",
            Operator::Ne => "!=",
            Operator::NotEq => "<>",
            Operator::Between => "BETWEEN",
            Operator::Like => "LIKE",
            Operator::In => "IN",
        }
    }

    /// Exact, case-sensitive match against the whitelist.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == s)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.as_str().to_string()
    }
}

/// A single `key <operator> value` filter.
///
/// The operator is kept as text: builders accept anything, encoders drop
/// clauses whose operator is not an [`Operator`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhereClause {
    pub key: String,
    pub value: Value,
    pub operator: String,
}

impl WhereClause {
    pub fn new(key: impl Into<String>, value: impl Into<Value>, operator: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            operator: operator.into(),
        }
    }

    /// The whitelisted operator, if the clause has one.
    pub fn operator(&self) -> Option<Operator> {
        Operator::parse(&self.operator)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderClause {
    pub key: String,
    pub direction: Direction,
}

/// Everything a query intends to do, independent of SQL dialect.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuerySpec {
    /// Columns to select; `None` means all columns.
    pub columns: Option<Vec<String>>,
    /// Target table; bound by the engine.
    pub table: Option<String>,
    /// OR-groups of AND-clauses; `None` means no filter was started.
    pub where_groups: Option<Vec<Vec<WhereClause>>>,
    pub order: Vec<OrderClause>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl QuerySpec {
    /// True when no filter clause has been recorded.
    pub fn has_filter(&self) -> bool {
        self.where_groups
            .as_ref()
            .is_some_and(|groups| groups.iter().any(|g| !g.is_empty()))
    }

    /// Iterate clauses in group-then-clause order.
    pub fn clauses(&self) -> impl Iterator<Item = &WhereClause> {
        self.where_groups.iter().flatten().flatten()
    }
}
