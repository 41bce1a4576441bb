//! Core types and traits for ODB.
//!
//! `odb-core` is the **foundation layer** of the workspace. It defines the
//! contracts and data types every other crate builds on.
//!
//! # Role In The Architecture
//!
//! - **Contract layer**: `Record` is implemented by user types (usually via
//!   `#[derive(Record)]`), `Driver` by database adapters.
//! - **Data model**: `Value`, `Row` and `Params` carry statement inputs and
//!   outputs between the query encoder, the engine and drivers.
//! - **Codec**: reversible storage form for composite (list/map) values.
//!
//! # Who Uses This Crate
//!
//! - `odb-query` binds `Value`s into `Params` while encoding SQL.
//! - `odb-engine` drives a `Driver` and maps `Row`s into `Record`s.
//! - `odb-macros` generates `Record` implementations defined here.

pub mod codec;
pub mod driver;
pub mod error;
pub mod identifiers;
pub mod params;
pub mod record;
pub mod relationship;
pub mod row;
pub mod value;

pub use driver::{Driver, QueryOutput, ReturnMode};
pub use error::{
    ConnectionError, ConnectionErrorKind, Error, QueryError, QueryErrorKind, Result, TypeError,
};
pub use identifiers::{escape_identifier, table_name_from};
pub use params::Params;
pub use record::{PRIMARY_KEY, Record};
pub use relationship::{RelationDef, RelationKind, find_relation};
pub use row::Row;
pub use value::{FromValue, Value};
