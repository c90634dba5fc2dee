//! Case-insensitive substring predicate over an entity's searchable column.

use crate::config::QueryConfig;
use crate::query::predicate::{Column, Predicate};

/// `None` when `raw` is absent, blank, or shorter than
/// `config.min_search_length` characters. Otherwise a `Like` on `column`
/// with the lower-cased input wrapped in `%` and its own wildcards escaped.
pub fn text_contains(raw: Option<&str>, column: Column, config: &QueryConfig) -> Option<Predicate> {
    let raw = raw?;
    if raw.trim().is_empty() || raw.chars().count() < config.min_search_length {
        return None;
    }
    let pattern = format!("%{}%", escape_like(&raw.to_lowercase()));
    Some(Predicate::Like(column, pattern))
}

/// Escape LIKE metacharacters so the input matches literally (escape char `\`).
pub fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
