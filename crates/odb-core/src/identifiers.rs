//! Identifier sanitisation.
//!
//! Table and column names cannot be bound as statement parameters, so they
//! are interpolated into SQL text. They are defended by stripping characters
//! that could terminate a quoted identifier or start a comment; they are not
//! quoted here; encoders add their own quoting.

use std::sync::LazyLock;

use regex::Regex;

/// Sequences removed from identifiers before interpolation.
const STRIPPED: [&str; 8] = ["`", "'", "\\", "/", "--", "#", "!", "\""];

static TABLE_DISALLOWED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^A-Za-z0-9_-]").unwrap_or_else(|_| unreachable!("static pattern is valid"))
});

/// Strip quote, comment and escape characters from an identifier.
///
/// ```
/// use odb_core::escape_identifier;
///
/// assert_eq!(escape_identifier("users`; DROP TABLE x; --"), "users; DROP TABLE x; ");
/// ```
pub fn escape_identifier(ident: &str) -> String {
    let mut out = ident.to_string();
    for seq in STRIPPED {
        if out.contains(seq) {
            out = out.replace(seq, "");
        }
    }
    out
}

/// Derive a table name from a type name or explicit override.
///
/// Path separators (`::`, `\`, `/`) become underscores and every character
/// outside `[A-Za-z0-9_-]` is dropped.
pub fn table_name_from(name: &str) -> String {
    let normalized = name.replace("::", "_").replace(['\\', '/'], "_");
    TABLE_DISALLOWED.replace_all(&normalized, "").into_owned()
}
