//! Builds parameterized SELECT, COUNT, INSERT, UPDATE, DELETE and link-table
//! statements. Identifiers come from entity definitions only; values are
//! always parameters.

use crate::query::{Association, ListQuery, Ordering, Predicate, Referent};
use crate::sql::PgBindValue;

/// Quote identifier for PostgreSQL (safe: only from entity definitions).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn column_list(columns: &[&str]) -> String {
    columns.iter().map(|c| quoted(c)).collect::<Vec<_>>().join(", ")
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<PgBindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: PgBindValue) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

/// Render `predicate` as a boolean SQL expression, pushing its values onto
/// `q`. `None` for `NoOp` (no WHERE clause needed).
fn render_predicate(predicate: &Predicate, q: &mut QueryBuf) -> Option<String> {
    match predicate {
        Predicate::NoOp => None,
        Predicate::Equals(col, value) => {
            let n = q.push_param(value.into());
            Some(format!("{} = ${}", quoted(col.name()), n))
        }
        Predicate::Like(col, pattern) => {
            let n = q.push_param(PgBindValue::String(pattern.clone()));
            Some(format!("LOWER({}) LIKE ${} ESCAPE '\\'", quoted(col.name()), n))
        }
        Predicate::IsNull(col) => Some(format!("{} IS NULL", quoted(col.name()))),
        Predicate::IsNotNull(col) => Some(format!("{} IS NOT NULL", quoted(col.name()))),
        Predicate::And(terms) => {
            let parts: Vec<String> = terms.iter().filter_map(|t| render_predicate(t, q)).collect();
            match parts.len() {
                0 => None,
                1 => parts.into_iter().next(),
                _ => Some(format!("({})", parts.join(" AND "))),
            }
        }
    }
}

fn where_clause(predicate: &Predicate, q: &mut QueryBuf) -> String {
    render_predicate(predicate, q)
        .map(|w| format!(" WHERE {}", w))
        .unwrap_or_default()
}

fn order_clause(ordering: &Ordering) -> String {
    format!(" ORDER BY {} {}", quoted(ordering.column.name()), ordering.direction.as_sql())
}

/// One page of rows matching the query's predicate, in its single ordering key.
pub fn select_page(table: &str, columns: &[&str], query: &ListQuery) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_clause = where_clause(&query.predicate, &mut q);
    let limit = q.push_param(PgBindValue::I64(query.page.limit()));
    let offset = q.push_param(PgBindValue::I64(query.page.offset()));
    q.sql = format!(
        "SELECT {} FROM {}{}{} LIMIT ${} OFFSET ${}",
        column_list(columns),
        quoted(table),
        where_clause,
        order_clause(&query.ordering),
        limit,
        offset
    );
    q
}

/// Total rows matching `predicate`, ignoring pagination.
pub fn count(table: &str, predicate: &Predicate) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_clause = where_clause(predicate, &mut q);
    q.sql = format!("SELECT COUNT(*) FROM {}{}", quoted(table), where_clause);
    q
}

/// SELECT by primary key. Caller binds id as `$1`.
pub fn select_by_id(table: &str, columns: &[&str]) -> String {
    format!("SELECT {} FROM {} WHERE \"id\" = $1", column_list(columns), quoted(table))
}

/// Row lock for the read-modify-write save path. Caller binds id as `$1`.
pub fn lock_by_id(table: &str) -> String {
    format!("SELECT \"id\" FROM {} WHERE \"id\" = $1 FOR UPDATE", quoted(table))
}

/// INSERT of `values` (column, value) pairs returning the new id.
pub fn insert(table: &str, values: Vec<(&'static str, PgBindValue)>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::with_capacity(values.len());
    let mut placeholders = Vec::with_capacity(values.len());
    for (col, v) in values {
        let n = q.push_param(v);
        cols.push(quoted(col));
        placeholders.push(format!("${}", n));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING \"id\"",
        quoted(table),
        cols.join(", "),
        placeholders.join(", ")
    );
    q
}

/// UPDATE by id: SET every given column and refresh `updated_at`.
pub fn update_by_id(table: &str, id: i64, values: Vec<(&'static str, PgBindValue)>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets = Vec::with_capacity(values.len() + 1);
    for (col, v) in values {
        let n = q.push_param(v);
        sets.push(format!("{} = ${}", quoted(col), n));
    }
    sets.push(format!("{} = NOW()", quoted("updated_at")));
    let id_param = q.push_param(PgBindValue::I64(id));
    q.sql = format!("UPDATE {} SET {} WHERE \"id\" = ${}", quoted(table), sets.join(", "), id_param);
    q
}

/// DELETE by id. Caller binds id as `$1`.
pub fn delete_by_id(table: &str) -> String {
    format!("DELETE FROM {} WHERE \"id\" = $1", quoted(table))
}

/// Remove every link of one owner. Caller binds owner id as `$1`.
pub fn clear_links<O: Referent, T: Referent>(assoc: &Association<O, T>) -> String {
    format!("DELETE FROM {} WHERE {} = $1", quoted(assoc.table), quoted(assoc.owner_column))
}

/// Link one owner (`$1`) to every target id in the `$2` array.
pub fn insert_links<O: Referent, T: Referent>(assoc: &Association<O, T>) -> String {
    format!(
        "INSERT INTO {} ({}, {}) SELECT $1, UNNEST($2::BIGINT[])",
        quoted(assoc.table),
        quoted(assoc.owner_column),
        quoted(assoc.target_column)
    )
}

/// `(id, label_column)` of every target linked to owner `$1`, ascending by id.
pub fn linked_summaries<O: Referent, T: Referent>(assoc: &Association<O, T>, label_column: &str) -> String {
    format!(
        "SELECT t.\"id\", t.{} FROM {} t JOIN {} l ON l.{} = t.\"id\" WHERE l.{} = $1 ORDER BY t.\"id\"",
        quoted(label_column),
        quoted(T::TABLE),
        quoted(assoc.table),
        quoted(assoc.target_column),
        quoted(assoc.owner_column)
    )
}

/// `(id, label_column)` of one row. Caller binds id as `$1`.
pub fn summary_by_id(table: &str, label_column: &str) -> String {
    format!("SELECT \"id\", {} FROM {} WHERE \"id\" = $1", quoted(label_column), quoted(table))
}
