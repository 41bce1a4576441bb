//! ODB: active-record persistence for Rust.
//!
//! This facade re-exports the workspace crates so applications depend on one
//! crate:
//!
//! - [`odb_core`]: `Record`, `Value`, `Row`, `Params`, the `Driver` contract,
//!   errors and the composite-value codec.
//! - [`odb_query`]: `QueryBuilder`, `QuerySpec` and the SQL encoders.
//! - [`odb_engine`]: the `Engine` that runs record operations and resolves
//!   relations.
//! - [`odb_macros`]: `#[derive(Record)]`.
//!
//! # Example
//!
//! ```ignore
//! use odb::prelude::*;
//!
//! #[derive(Debug, Default, Record)]
//! #[record(table = "users")]
//! #[record(relation(name = "friends", kind = "to_many", target = User))]
//! struct User {
//!     id: Option<i64>,
//!     firstname: Option<String>,
//!     lastname: Option<String>,
//! }
//!
//! let engine = Engine::new(my_driver);
//! let browns: Vec<User> = engine.get(
//!     QueryBuilder::new()
//!         .where_("firstname", "Oliver")
//!         .and_where("lastname", "Brown")
//!         .limit(5),
//! )?;
//! let friends = browns[0].friends(&engine)?;
//! ```

extern crate self as odb;

pub use odb_core::{
    self, Driver, Error, FromValue, Params, QueryOutput, Record, RelationDef, RelationKind, Result,
    ReturnMode, Row, Value, codec,
};
pub use odb_engine::{self, ActiveRecord, Engine, EngineConfig, Related};
pub use odb_macros::Record;
pub use odb_query::{
    self, Direction, MySqlEncoder, Operator, QueryBuilder, QueryEncoder, QuerySpec, QueryWarning,
    Statement,
};

#[doc(hidden)]
pub mod __private {
    pub use odb_core;
    pub use odb_engine;
    pub use odb_query;
}

/// Everything needed to declare records and run queries.
pub mod prelude {
    pub use odb_core::{
        Driver, Error, FromValue, Params, QueryOutput, Record, RelationDef, RelationKind, Result,
        ReturnMode, Row, Value,
    };
    pub use odb_engine::{ActiveRecord, Engine, EngineConfig, Related};
    pub use odb_macros::Record;
    pub use odb_query::{Direction, MySqlEncoder, Operator, QueryBuilder, QueryEncoder, QuerySpec};
}
