//! Relation metadata for ODB records.
//!
//! Relations are declared statically on each [`Record`](crate::Record) type and
//! are never stored inline. They are resolved on demand by issuing a secondary
//! query against the target type's table.

/// The cardinality of a relation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RelationKind {
    /// Resolves to at most one target record.
    #[default]
    ToOne,
    /// Resolves to a list of target records.
    ToMany,
}

/// Metadata about a relation between records.
///
/// With a `match_column`, the target table is filtered by
/// `match_column = <local value>` where the local value is the record's
/// `local_property` field, or the literal `local_property` text when the record
/// has no field of that name. Without a `match_column`, a to-many relation is
/// an unfiltered fetch capped by the engine's default limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationDef {
    /// Name the relation is accessed by.
    pub name: &'static str,

    pub kind: RelationKind,

    /// [`Record::TYPE_NAME`](crate::Record::TYPE_NAME) of the target type.
    pub target: &'static str,

    /// Column on the target table to filter by.
    pub match_column: Option<&'static str>,

    /// Field on this record (or literal value) to match against.
    pub local_property: Option<&'static str>,
}

impl RelationDef {
    /// Create a new relation with required fields.
    #[must_use]
    pub const fn new(name: &'static str, kind: RelationKind, target: &'static str) -> Self {
        Self {
            name,
            kind,
            target,
            match_column: None,
            local_property: None,
        }
    }

    /// Shorthand for a to-one relation.
    #[must_use]
    pub const fn to_one(name: &'static str, target: &'static str) -> Self {
        Self::new(name, RelationKind::ToOne, target)
    }

    /// Shorthand for a to-many relation.
    #[must_use]
    pub const fn to_many(name: &'static str, target: &'static str) -> Self {
        Self::new(name, RelationKind::ToMany, target)
    }

    /// Filter the target by `column = <local property>`.
    #[must_use]
    pub const fn matching(mut self, column: &'static str, property: &'static str) -> Self {
        self.match_column = Some(column);
        self.local_property = Some(property);
        self
    }

    /// True when resolution issues a filtered query.
    pub fn is_filtered(&self) -> bool {
        self.match_column.is_some_and(|c| !c.is_empty())
    }
}

/// Find a relation by name.
pub fn find_relation(relations: &'static [RelationDef], name: &str) -> Option<&'static RelationDef> {
    relations.iter().find(|r| r.name == name)
}
