//! MySQL encoder.
//!
//! Identifiers are backtick-quoted after escaping, parameters are named
//! (`:vw1`, `:upv1`, `:val1`, `:id`) and paging uses `LIMIT <offset>, <count>`.
//! Column, placeholder, assignment and ORDER BY lists are joined with a bare `,`.

use odb_core::{Params, Value, escape_identifier};

use super::{QueryEncoder, Statement};
use crate::spec::QuerySpec;

const WHERE_PREFIX: &str = "vw";
const UPDATE_PREFIX: &str = "upv";
const INSERT_PREFIX: &str = "val";

/// Encoder for MySQL and MariaDB.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlEncoder;

impl MySqlEncoder {
    pub fn new() -> Self {
        Self
    }

    fn quote(ident: &str) -> String {
        format!("`{}`", escape_identifier(ident))
    }

    /// Every requested column is rendered, even one that escapes to nothing;
    /// `*` only stands in for an unset or empty projection.
    fn columns_sql(spec: &QuerySpec) -> String {
        match spec.columns.as_deref() {
            None | Some([]) => "*".to_string(),
            Some(columns) => columns
                .iter()
                .map(|c| Self::quote(c))
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// Compile the filter into `WHERE (...)` and bind its values.
    ///
    /// Clauses are numbered in group-then-clause order, and the parameters are
    /// bound in that same order. Returns `None` when no clause survives.
    pub fn where_sql(spec: &QuerySpec, params: &mut Params) -> Option<String> {
        let mut counter = 0usize;
        let mut or_parts = Vec::new();

        for group in spec.where_groups.iter().flatten() {
            let mut and_parts = Vec::new();
            for clause in group {
                if clause.key.is_empty() {
                    continue;
                }
                let Some(operator) = clause.operator() else {
                    continue;
                };
                counter += 1;
                let name = format!("{WHERE_PREFIX}{counter}");
                and_parts.push(format!("{} {} :{}", Self::quote(&clause.key), operator, name));
                params.bind(name, clause.value.clone());
            }
            if !and_parts.is_empty() {
                or_parts.push(and_parts.join(" AND "));
            }
        }

        if or_parts.is_empty() {
            None
        } else {
            Some(format!("WHERE ({})", or_parts.join(" OR ")))
        }
    }

    fn order_sql(spec: &QuerySpec) -> Option<String> {
        let parts: Vec<String> = spec
            .order
            .iter()
            .filter_map(|clause| {
                let key = escape_identifier(&clause.key);
                (!key.is_empty()).then(|| format!("{} {}", key, clause.direction.as_str()))
            })
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(format!("ORDER BY {}", parts.join(",")))
        }
    }

    fn limit_sql(spec: &QuerySpec) -> Option<String> {
        spec.limit
            .map(|limit| format!("LIMIT {}, {}", spec.offset.unwrap_or(0), limit))
    }
}

impl QueryEncoder for MySqlEncoder {
    fn select(&self, spec: &QuerySpec) -> Statement {
        let mut params = Params::new();
        let mut parts = vec![format!(
            "SELECT {} FROM {}",
            Self::columns_sql(spec),
            Self::quote(spec.table.as_deref().unwrap_or_default())
        )];
        parts.extend(Self::where_sql(spec, &mut params));
        parts.extend(Self::order_sql(spec));
        parts.extend(Self::limit_sql(spec));
        Statement::new(parts.join(" "), params)
    }

    fn insert(&self, table: &str, data: &[(&str, Value)]) -> Statement {
        let mut params = Params::new();
        let mut columns = Vec::with_capacity(data.len());
        let mut placeholders = Vec::with_capacity(data.len());
        for (i, (column, value)) in data.iter().enumerate() {
            let name = format!("{INSERT_PREFIX}{}", i + 1);
            columns.push(Self::quote(column));
            placeholders.push(format!(":{name}"));
            params.bind(name, value.clone());
        }
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            Self::quote(table),
            columns.join(","),
            placeholders.join(",")
        );
        Statement::new(sql, params)
    }

    fn update(&self, spec: &QuerySpec, data: &[(&str, Value)]) -> Option<Statement> {
        if data.is_empty() {
            return None;
        }
        let mut params = Params::new();
        let assignments: Vec<String> = data
            .iter()
            .enumerate()
            .map(|(i, (column, value))| {
                let name = format!("{UPDATE_PREFIX}{}", i + 1);
                let sql = format!("{} = :{}", Self::quote(column), name);
                params.bind(name, value.clone());
                sql
            })
            .collect();

        let mut sql = format!(
            "UPDATE {} SET {}",
            Self::quote(spec.table.as_deref().unwrap_or_default()),
            assignments.join(",")
        );
        if let Some(where_sql) = Self::where_sql(spec, &mut params) {
            sql.push(' ');
            sql.push_str(&where_sql);
        }
        Some(Statement::new(sql, params))
    }

    fn delete_by_id(&self, table: &str, id: i64) -> Statement {
        let mut params = Params::new();
        params.bind("id", id);
        Statement::new(
            format!("DELETE FROM {} WHERE `id` = :id", Self::quote(table)),
            params,
        )
    }
}
