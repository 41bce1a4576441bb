//! Lazy relation resolution.
//!
//! Relations are never loaded with their owning record. Each access looks up
//! the [`RelationDef`] by name and issues one secondary query against the
//! target type's table through the same engine.

use odb_core::{Driver, Record, RelationDef, RelationKind, Value};
use odb_query::{QueryBuilder, QueryEncoder};

use crate::engine::Engine;

/// Outcome of resolving a relation by name.
#[derive(Debug, Clone, PartialEq)]
pub enum Related<R> {
    /// A to-one relation: the first match, if any.
    One(Option<R>),
    /// A to-many relation: every match (capped when unfiltered).
    Many(Vec<R>),
    /// No relation of that name targets `R`.
    Unresolved,
}

impl<R> Related<R> {
    pub fn is_unresolved(&self) -> bool {
        matches!(self, Related::Unresolved)
    }

    /// Collapse to a single record; a to-many result yields its first element.
    pub fn into_one(self) -> Option<R> {
        match self {
            Related::One(record) => record,
            Related::Many(records) => records.into_iter().next(),
            Related::Unresolved => None,
        }
    }

    /// Collapse to a list; a to-one result yields zero or one element.
    pub fn into_many(self) -> Vec<R> {
        match self {
            Related::One(record) => record.into_iter().collect(),
            Related::Many(records) => records,
            Related::Unresolved => Vec::new(),
        }
    }
}

/// Value of `record` to match the target's column against.
///
/// A declared field wins even when it is null; a property that names no
/// field is used as a literal.
fn local_value<T: Record>(record: &T, def: &RelationDef) -> Value {
    match def.local_property {
        Some(property) => record
            .field_value(property)
            .unwrap_or_else(|| Value::Text(property.to_string())),
        None => Value::Null,
    }
}

impl<D: Driver, E: QueryEncoder> Engine<D, E> {
    /// Resolve the relation `name` declared on `T`, loading `R` records.
    ///
    /// An undeclared relation, or one whose target is not `R`, resolves to
    /// [`Related::Unresolved`] without touching the database.
    #[tracing::instrument(level = "debug", skip(self, record), fields(record = T::TYPE_NAME))]
    pub fn resolve<T: Record, R: Record>(&self, record: &T, name: &str) -> odb_core::Result<Related<R>> {
        let Some(def) = T::relation(name) else {
            tracing::debug!(relation = name, "No such relation");
            return Ok(Related::Unresolved);
        };
        if def.target != R::TYPE_NAME {
            tracing::warn!(
                relation = name,
                declared = def.target,
                requested = R::TYPE_NAME,
                "Relation target does not match the requested type"
            );
            return Ok(Related::Unresolved);
        }

        self.lazy_loads.record_load(T::TYPE_NAME, def.name);

        let query = match def.match_column.filter(|c| !c.is_empty()) {
            Some(column) => QueryBuilder::new().where_(column, local_value(record, def)),
            None if def.kind == RelationKind::ToMany => {
                QueryBuilder::new().limit(self.config().to_many_default_limit)
            }
            None => QueryBuilder::new(),
        };

        match def.kind {
            RelationKind::ToOne => Ok(Related::One(self.get_one(query)?)),
            RelationKind::ToMany => Ok(Related::Many(self.get(query)?)),
        }
    }

    /// Resolve a relation as a single record.
    pub fn related_one<T: Record, R: Record>(&self, record: &T, name: &str) -> odb_core::Result<Option<R>> {
        Ok(self.resolve(record, name)?.into_one())
    }

    /// Resolve a relation as a list of records.
    pub fn related_many<T: Record, R: Record>(&self, record: &T, name: &str) -> odb_core::Result<Vec<R>> {
        Ok(self.resolve(record, name)?.into_many())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::testing::{Profile, ScriptedDriver, User, user_row};

    fn oliver() -> User {
        User {
            id: Some(1),
            username: Some("oliver".into()),
            firstname: Some("Oliver".into()),
            ..User::default()
        }
    }

    #[test]
    fn to_one_filters_by_local_field() {
        let profile_row = odb_core::Row::new()
            .with("id", 5)
            .with("username", "oliver")
            .with("bio", "hello");
        let driver = ScriptedDriver::new().rows(vec![profile_row]);
        let engine = Engine::new(&driver);

        let profile: Option<Profile> = engine.related_one(&oliver(), "profile").unwrap();
        assert_eq!(profile.and_then(|p| p.bio).as_deref(), Some("hello"));

        let executed = driver.executed();
        assert_eq!(
            executed[0].sql,
            "SELECT * FROM `Profile` WHERE (`username` = :vw1) LIMIT 0, 1"
        );
        assert_eq!(executed[0].params.get("vw1"), Some(&Value::from("oliver")));
    }

    #[test]
    fn unfiltered_to_many_uses_default_cap() {
        let driver = ScriptedDriver::new().rows(vec![user_row(2, "a", "A"), user_row(3, "b", "B")]);
        let engine = Engine::new(&driver);

        let friends: Vec<User> = engine.related_many(&oliver(), "friends").unwrap();
        assert_eq!(friends.len(), 2);
        assert_eq!(driver.executed()[0].sql, "SELECT * FROM `users` LIMIT 0, 10");
    }

    #[test]
    fn default_cap_is_configurable() {
        let driver = ScriptedDriver::new().rows(Vec::new());
        let engine = Engine::new(&driver).with_config(EngineConfig::new().to_many_default_limit(3));
        let _: Vec<User> = engine.related_many(&oliver(), "friends").unwrap();
        assert_eq!(driver.executed()[0].sql, "SELECT * FROM `users` LIMIT 0, 3");
    }

    #[test]
    fn filtered_to_many_has_no_cap() {
        let driver = ScriptedDriver::new().rows(Vec::new());
        let engine = Engine::new(&driver);
        let _: Vec<User> = engine.related_many(&oliver(), "namesakes").unwrap();
        assert_eq!(
            driver.executed()[0].sql,
            "SELECT * FROM `users` WHERE (`firstname` = :vw1)"
        );
    }

    #[test]
    fn unknown_property_is_used_literally() {
        let driver = ScriptedDriver::new().rows(Vec::new());
        let engine = Engine::new(&driver);
        let _: Vec<User> = engine.related_many(&oliver(), "admins").unwrap();
        let executed = driver.executed();
        assert_eq!(executed[0].sql, "SELECT * FROM `users` WHERE (`role` = :vw1)");
        assert_eq!(executed[0].params.get("vw1"), Some(&Value::from("admin")));
    }

    #[test]
    fn missing_relation_is_unresolved() {
        let driver = ScriptedDriver::new();
        let engine = Engine::new(&driver);
        let related: Related<User> = engine.resolve(&oliver(), "enemies").unwrap();
        assert!(related.is_unresolved());
        assert!(driver.executed().is_empty());
    }

    #[test]
    fn wrong_target_type_is_unresolved() {
        let driver = ScriptedDriver::new();
        let engine = Engine::new(&driver);
        let related: Related<User> = engine.resolve(&oliver(), "profile").unwrap();
        assert!(related.is_unresolved());
        assert!(driver.executed().is_empty());
    }

    #[test]
    fn resolutions_are_tracked() {
        let driver = ScriptedDriver::new();
        let engine = Engine::new(&driver).with_config(EngineConfig::new().lazy_load_warn_threshold(Some(2)));
        for _ in 0..3 {
            let _: Option<Profile> = engine.related_one(&oliver(), "profile").unwrap();
        }
        assert_eq!(engine.lazy_loads().count_for("User", "profile"), 3);
        assert_eq!(engine.lazy_loads().stats().over_threshold, 1);
    }

    #[test]
    fn related_collapses() {
        assert_eq!(Related::One(Some(1)).into_many(), vec![1]);
        assert_eq!(Related::Many(vec![1, 2]).into_one(), Some(1));
        assert_eq!(Related::<i32>::Unresolved.into_many(), Vec::<i32>::new());
    }
}
