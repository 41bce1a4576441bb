//! Query specifications and SQL encoders for ODB.
//!
//! - [`QueryBuilder`] records filter, ordering and paging intent into a
//!   [`QuerySpec`], reporting misuse as [`QueryWarning`]s.
//! - [`QueryEncoder`] implementations compile a spec into a [`Statement`]:
//!   SQL text plus named parameters.

pub mod builder;
pub mod encoder;
pub mod spec;
pub mod warning;

pub use builder::QueryBuilder;
pub use encoder::{MySqlEncoder, QueryEncoder, Statement};
pub use spec::{Direction, Operator, OrderClause, QuerySpec, WhereClause};
pub use warning::{CollectWarnings, QueryWarning, TracingWarnings, WarningSink};
