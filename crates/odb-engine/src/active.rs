//! Active-record style methods on every [`Record`].
//!
//! ```ignore
//! use odb_engine::ActiveRecord;
//!
//! let mut user = User::default();
//! user.username = Some("john_smith".into());
//! user.save(&engine)?;
//!
//! let oliver = User::get_one(&engine, QueryBuilder::new().where_("firstname", "Oliver"))?;
//! ```

use odb_core::{Driver, Record};
use odb_query::{QueryBuilder, QueryEncoder};

use crate::engine::Engine;
use crate::relation::Related;

/// Record operations with the record as receiver.
///
/// Implemented for every [`Record`]; each method forwards to [`Engine`].
pub trait ActiveRecord: Record {
    fn get<D: Driver, E: QueryEncoder>(engine: &Engine<D, E>, query: QueryBuilder) -> odb_core::Result<Vec<Self>> {
        engine.get(query)
    }

    fn get_one<D: Driver, E: QueryEncoder>(
        engine: &Engine<D, E>,
        query: QueryBuilder,
    ) -> odb_core::Result<Option<Self>> {
        engine.get_one(query)
    }

    fn count<D: Driver, E: QueryEncoder>(engine: &Engine<D, E>, query: QueryBuilder) -> odb_core::Result<u64> {
        engine.count::<Self>(query)
    }

    fn find<D: Driver, E: QueryEncoder>(engine: &Engine<D, E>, id: i64) -> odb_core::Result<Option<Self>> {
        engine.find(id)
    }

    /// Insert or update; `true` when a row was written.
    fn save<D: Driver, E: QueryEncoder>(&mut self, engine: &Engine<D, E>) -> odb_core::Result<bool> {
        Ok(engine.save(self)?.is_some())
    }

    fn insert<D: Driver, E: QueryEncoder>(&mut self, engine: &Engine<D, E>) -> odb_core::Result<bool> {
        Ok(engine.insert(self)?.is_some())
    }

    fn update<D: Driver, E: QueryEncoder>(&mut self, engine: &Engine<D, E>) -> odb_core::Result<bool> {
        Ok(engine.update(self)?.is_some())
    }

    fn delete<D: Driver, E: QueryEncoder>(&self, engine: &Engine<D, E>) -> odb_core::Result<bool> {
        engine.delete(self)
    }

    fn resolve<R: Record, D: Driver, E: QueryEncoder>(
        &self,
        engine: &Engine<D, E>,
        name: &str,
    ) -> odb_core::Result<Related<R>> {
        engine.resolve(self, name)
    }
}

impl<T: Record> ActiveRecord for T {}
