//! Active-record engine for ODB.
//!
//! [`Engine`] runs the full pipeline for a [`Record`](odb_core::Record) type:
//! the caller's [`QueryBuilder`](odb_query::QueryBuilder) gets the record's
//! table bound in, an encoder compiles it, a [`Driver`](odb_core::Driver)
//! executes it and rows come back as typed records. Declared relations are
//! resolved lazily through the same engine.

pub mod active;
pub mod config;
pub mod engine;
pub mod lazy_loads;
pub mod relation;

#[cfg(test)]
mod testing;

pub use active::ActiveRecord;
pub use config::EngineConfig;
pub use engine::Engine;
pub use lazy_loads::{LazyLoadStats, LazyLoadTracker};
pub use relation::Related;
