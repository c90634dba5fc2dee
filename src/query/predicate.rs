//! Neutral predicate values and the AND combinator.
//!
//! Factories build these eagerly; only the `sql` module knows how to turn them
//! into PostgreSQL.

use std::fmt;

/// A column of one entity's own table. Identifiers come from entity
/// definitions only, never from request input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Column(&'static str);

impl Column {
    pub const fn new(name: &'static str) -> Self {
        Column(name)
    }

    pub const fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

pub const ID: Column = Column::new("id");
pub const NAME: Column = Column::new("name");
pub const IS_ARCHIVED: Column = Column::new("is_archived");
pub const CREATED_AT: Column = Column::new("created_at");
pub const UPDATED_AT: Column = Column::new("updated_at");
pub const PARENT_ID: Column = Column::new("parent_id");

/// Scalar compared against a column.
#[derive(Clone, Debug, PartialEq)]
pub enum SqlValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

/// Boolean condition over one entity's columns.
#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    /// No restriction.
    NoOp,
    Equals(Column, SqlValue),
    /// Case-insensitive match of the lower-cased column against a lower-cased
    /// pattern that already carries its `%` wildcards.
    Like(Column, String),
    IsNull(Column),
    IsNotNull(Column),
    /// Conjunction; never empty and never nested with `NoOp` members when
    /// built through [`all_of`].
    And(Vec<Predicate>),
}

impl Predicate {
    pub fn is_noop(&self) -> bool {
        matches!(self, Predicate::NoOp)
    }

    /// `self AND other`. Composing with `NoOp` returns the other side unchanged.
    pub fn and(self, other: Predicate) -> Predicate {
        all_of([Some(self), Some(other)])
    }
}

/// Conjunction of every present predicate, in input order.
///
/// Absent entries and `NoOp` entries are elided, nested conjunctions are
/// flattened, a single survivor is returned as-is and no survivors yields
/// `NoOp`.
pub fn all_of<I>(parts: I) -> Predicate
where
    I: IntoIterator<Item = Option<Predicate>>,
{
    let mut terms = Vec::new();
    for p in parts.into_iter().flatten() {
        match p {
            Predicate::NoOp => {}
            Predicate::And(inner) => terms.extend(inner),
            other => terms.push(other),
        }
    }
    match terms.len() {
        0 => Predicate::NoOp,
        1 => terms.pop().unwrap_or(Predicate::NoOp),
        _ => Predicate::And(terms),
    }
}
