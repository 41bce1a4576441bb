//! The `Record` trait: typed entities bound to table rows.
//!
//! A record type declares its fields, an optional table override and its
//! relations as associated constants. Everything the engine needs (column
//! discovery, the persisted data map, row mapping) is derived from those
//! declarations per type, never per instance.
//!
//! Records are usually declared with `#[derive(Record)]` from `odb-macros`.

use crate::codec;
use crate::error::Result;
use crate::identifiers::table_name_from;
use crate::relationship::{RelationDef, find_relation};
use crate::row::Row;
use crate::value::Value;

/// Name of the reserved integer primary key.
pub const PRIMARY_KEY: &str = "id";

/// A typed entity that maps to one table row.
pub trait Record: Default + Sized {
    /// Name of the type, used for the default table name and relation targets.
    const TYPE_NAME: &'static str;

    /// Explicit table name; defaults to [`Record::TYPE_NAME`].
    const TABLE: Option<&'static str> = None;

    /// Declared field names, in declaration order.
    const FIELDS: &'static [&'static str];

    /// Declared relations, keyed by name.
    const RELATIONS: &'static [RelationDef] = &[];

    /// Primary key; `None` until the record has been inserted.
    fn id(&self) -> Option<i64>;

    fn set_id(&mut self, id: Option<i64>);

    /// Current value of a field, or `None` when no such field exists.
    fn field_value(&self, name: &str) -> Option<Value>;

    /// Assign a stored value to a field, converting it to the field's type.
    ///
    /// Returns `Ok(false)` when the record has no field of that name.
    fn set_field_value(&mut self, name: &str, value: Value) -> Result<bool>;

    /// Table this type is stored in.
    fn table_name() -> String {
        table_name_from(Self::TABLE.unwrap_or(Self::TYPE_NAME))
    }

    /// Persisted columns: `id` first, then every declared field that is not
    /// a relation name.
    fn columns() -> Vec<&'static str> {
        let mut columns = Vec::with_capacity(Self::FIELDS.len() + 1);
        columns.push(PRIMARY_KEY);
        columns.extend(Self::FIELDS.iter().copied().filter(|field| {
            *field != PRIMARY_KEY && find_relation(Self::RELATIONS, field).is_none()
        }));
        columns
    }

    /// Column-value pairs to persist.
    ///
    /// Null fields are omitted and every other value passes through
    /// [`codec::serialize`].
    fn data(&self) -> Result<Vec<(&'static str, Value)>> {
        let mut data = Vec::new();
        for column in Self::columns() {
            match self.field_value(column) {
                Some(Value::Null) | None => {}
                Some(value) => data.push((column, codec::serialize(value)?)),
            }
        }
        Ok(data)
    }

    /// Build a record from a raw row.
    ///
    /// Only discovered columns are read; columns missing from the row, or
    /// NULL in it, keep the field's default.
    fn from_row(row: &Row) -> Result<Self> {
        let mut record = Self::default();
        for column in Self::columns() {
            match row.get(column) {
                Some(Value::Null) | None => {}
                Some(value) => {
                    record
                        .set_field_value(column, value.clone())
                        .map_err(|e| e.with_column(column))?;
                }
            }
        }
        Ok(record)
    }

    /// Look up a declared relation by name.
    fn relation(name: &str) -> Option<&'static RelationDef> {
        find_relation(Self::RELATIONS, name)
    }
}
