//! The active-record engine.
//!
//! [`Engine`] owns a driver handle and an encoder and performs every record
//! operation: it binds the record type's table into the caller's query,
//! compiles it, executes it through the driver and maps raw rows back into
//! typed records.
//!
//! # Example
//!
//! ```ignore
//! let engine = Engine::new(driver);
//!
//! let users: Vec<User> = engine.get(
//!     QueryBuilder::new()
//!         .where_("firstname", "Oliver")
//!         .and_where("lastname", "Brown")
//!         .limit(5),
//! )?;
//!
//! let mut user = User::default();
//! user.username = Some("john_smith".into());
//! engine.save(&mut user)?;
//! assert!(user.id.is_some());
//! ```

use odb_core::{Driver, Error, Params, QueryErrorKind, QueryOutput, Record, ReturnMode, Row, PRIMARY_KEY};
use odb_query::{MySqlEncoder, QueryBuilder, QueryEncoder, Statement};

use crate::config::EngineConfig;
use crate::lazy_loads::LazyLoadTracker;

/// Generic CRUD engine over [`Record`] types.
///
/// The driver handle is optional so an engine can exist before a connection
/// does; every operation on a handle-less engine fails with a connection
/// error.
#[derive(Debug)]
pub struct Engine<D, E = MySqlEncoder> {
    driver: Option<D>,
    encoder: E,
    config: EngineConfig,
    pub(crate) lazy_loads: LazyLoadTracker,
}

impl<D: Driver> Engine<D, MySqlEncoder> {
    /// Create an engine using the MySQL encoder.
    pub fn new(driver: D) -> Self {
        Self::with_encoder(driver, MySqlEncoder)
    }

    /// Create an engine with no driver handle yet.
    pub fn disconnected() -> Self {
        let config = EngineConfig::default();
        Self {
            driver: None,
            encoder: MySqlEncoder,
            lazy_loads: LazyLoadTracker::new(config.lazy_load_warn_threshold),
            config,
        }
    }
}

impl<D: Driver, E: QueryEncoder> Engine<D, E> {
    pub fn with_encoder(driver: D, encoder: E) -> Self {
        let config = EngineConfig::default();
        Self {
            driver: Some(driver),
            encoder,
            lazy_loads: LazyLoadTracker::new(config.lazy_load_warn_threshold),
            config,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.lazy_loads = LazyLoadTracker::new(config.lazy_load_warn_threshold);
        self.config = config;
        self
    }

    /// Install (or replace) the driver handle.
    pub fn connect(&mut self, driver: D) {
        tracing::info!("Driver handle established");
        self.driver = Some(driver);
    }

    /// Drop the driver handle, returning it.
    pub fn disconnect(&mut self) -> Option<D> {
        self.driver.take()
    }

    pub fn is_connected(&self) -> bool {
        self.driver.is_some()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    pub fn lazy_loads(&self) -> &LazyLoadTracker {
        &self.lazy_loads
    }

    /// The driver handle, or a connection error if none is established.
    pub fn driver(&self) -> odb_core::Result<&D> {
        self.driver.as_ref().ok_or_else(Error::connection_unavailable)
    }

    // ========================================================================
    // Execution
    // ========================================================================

    fn execute(&self, statement: &Statement, mode: ReturnMode) -> odb_core::Result<QueryOutput> {
        let driver = self.driver()?;
        if self.config.log_statements {
            tracing::debug!(
                sql = %statement.sql,
                params = statement.params.len(),
                mode = mode.as_str(),
                "Executing statement"
            );
        }
        driver.execute(&statement.sql, &statement.params, mode)
    }

    /// Boolean-mode execution: statement failures become `false`, connection
    /// failures still propagate.
    fn execute_bool(&self, statement: &Statement) -> odb_core::Result<bool> {
        match self.execute(statement, ReturnMode::Bool) {
            Ok(_) => Ok(true),
            Err(err) if err.is_statement_failure() => {
                tracing::warn!(error = %err, "Statement failed");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    fn fetch_rows(&self, statement: &Statement) -> odb_core::Result<Vec<Row>> {
        match self.execute(statement, ReturnMode::Rows)? {
            QueryOutput::Rows(rows) => Ok(rows),
            QueryOutput::Done => Ok(Vec::new()),
            QueryOutput::Count(_) => Err(Error::statement(
                QueryErrorKind::UnexpectedResult,
                "driver returned a row count where rows were requested",
                &statement.sql,
            )),
        }
    }

    fn rows_to_records<T: Record>(rows: &[Row]) -> odb_core::Result<Vec<T>> {
        rows.iter()
            .filter(|row| !row.is_empty())
            .map(T::from_row)
            .collect()
    }

    /// Bind `T`'s table into the query and return the compiled spec.
    fn bind_table<T: Record>(query: QueryBuilder) -> QueryBuilder {
        query.from(T::table_name())
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// All records matching `query`; an empty list when nothing matches.
    #[tracing::instrument(level = "debug", skip(self, query), fields(record = T::TYPE_NAME))]
    pub fn get<T: Record>(&self, query: QueryBuilder) -> odb_core::Result<Vec<T>> {
        let query = Self::bind_table::<T>(query);
        let statement = self.encoder.select(query.spec());
        let rows = self.fetch_rows(&statement)?;
        Self::rows_to_records(&rows)
    }

    /// The first record matching `query`, with the limit forced to one row.
    #[tracing::instrument(level = "debug", skip(self, query), fields(record = T::TYPE_NAME))]
    pub fn get_one<T: Record>(&self, query: QueryBuilder) -> odb_core::Result<Option<T>> {
        Ok(self.get(query.limit(1))?.into_iter().next())
    }

    /// Number of rows matching `query`; zero when the driver reports none.
    #[tracing::instrument(level = "debug", skip(self, query), fields(record = T::TYPE_NAME))]
    pub fn count<T: Record>(&self, query: QueryBuilder) -> odb_core::Result<u64> {
        let query = Self::bind_table::<T>(query);
        let statement = self.encoder.count(query.spec());
        Ok(match self.execute(&statement, ReturnMode::Count)? {
            QueryOutput::Count(n) => n,
            QueryOutput::Rows(rows) => rows.len() as u64,
            QueryOutput::Done => 0,
        })
    }

    /// Fetch one record by primary key.
    pub fn find<T: Record>(&self, id: i64) -> odb_core::Result<Option<T>> {
        self.get_one(QueryBuilder::new().where_(PRIMARY_KEY, id))
    }

    /// Run raw SQL and map the returned rows to `T`.
    ///
    /// Nothing in `sql` is escaped: never build it from user input, and make
    /// sure the selected columns belong to `T`'s table.
    pub fn get_sql<T: Record>(&self, sql: &str, params: Params) -> odb_core::Result<Vec<T>> {
        let statement = Statement::new(sql, params);
        let rows = self.fetch_rows(&statement)?;
        Self::rows_to_records(&rows)
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Insert `record` and attach the driver-assigned id.
    ///
    /// Returns `None` when the statement fails or the driver reports no id.
    #[tracing::instrument(level = "debug", skip(self, record), fields(record = T::TYPE_NAME))]
    pub fn insert<'r, T: Record>(&self, record: &'r mut T) -> odb_core::Result<Option<&'r mut T>> {
        let table = T::table_name();
        let data = record.data()?;
        let statement = self.encoder.insert(&table, &data);

        if !self.execute_bool(&statement)? {
            return Ok(None);
        }
        match self.driver()?.last_insert_id()? {
            Some(id) if id != 0 => {
                tracing::info!(table = %table, id, "Inserted record");
                record.set_id(Some(id));
                Ok(Some(record))
            }
            _ => {
                tracing::warn!(table = %table, "Insert succeeded but no id was returned");
                Ok(None)
            }
        }
    }

    /// Write `record`'s fields to the row with its id.
    ///
    /// Returns `None` without touching the database when the record has no id
    /// or nothing to write, and `None` when the statement fails.
    #[tracing::instrument(level = "debug", skip(self, record), fields(record = T::TYPE_NAME))]
    pub fn update<'r, T: Record>(&self, record: &'r mut T) -> odb_core::Result<Option<&'r mut T>> {
        let Some(id) = record.id() else {
            tracing::debug!("Update skipped: record has no id");
            return Ok(None);
        };
        let table = T::table_name();
        let query = QueryBuilder::new()
            .where_(PRIMARY_KEY, id)
            .limit(1)
            .from(table.clone());
        let data = record.data()?;
        let Some(statement) = self.encoder.update(query.spec(), &data) else {
            tracing::debug!("Update skipped: nothing to write");
            return Ok(None);
        };

        if self.execute_bool(&statement)? {
            tracing::info!(table = %table, id, "Updated record");
            Ok(Some(record))
        } else {
            Ok(None)
        }
    }

    /// `insert` when the record has no id yet, otherwise `update`.
    pub fn save<'r, T: Record>(&self, record: &'r mut T) -> odb_core::Result<Option<&'r mut T>> {
        if record.id().is_none() {
            self.insert(record)
        } else {
            self.update(record)
        }
    }

    /// Delete the row with `record`'s id.
    ///
    /// The in-memory id is left untouched. A record without an id deletes
    /// nothing and returns `false`.
    #[tracing::instrument(level = "debug", skip(self, record), fields(record = T::TYPE_NAME))]
    pub fn delete<T: Record>(&self, record: &T) -> odb_core::Result<bool> {
        let Some(id) = record.id() else {
            return Ok(false);
        };
        let table = T::table_name();
        let statement = self.encoder.delete_by_id(&table, id);
        let deleted = self.execute_bool(&statement)?;
        if deleted {
            tracing::info!(table = %table, id, "Deleted record");
        }
        Ok(deleted)
    }
}
