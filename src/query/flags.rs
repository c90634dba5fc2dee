//! Equality predicates over the archival flag and the category parent link.

use crate::query::predicate::{Column, Predicate, SqlValue, IS_ARCHIVED};

/// Rows whose archival flag equals `archived`. There is no "either" mode;
/// callers wanting both states leave this predicate out.
pub fn archived(archived: bool) -> Predicate {
    Predicate::Equals(IS_ARCHIVED, SqlValue::Bool(archived))
}

/// `is_parent == true` matches roots (no parent), `false` matches children.
pub fn hierarchy(parent_column: Column, is_parent: bool) -> Predicate {
    if is_parent {
        Predicate::IsNull(parent_column)
    } else {
        Predicate::IsNotNull(parent_column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::predicate::PARENT_ID;

    #[test]
    fn archived_is_plain_equality() {
        assert_eq!(archived(false), Predicate::Equals(IS_ARCHIVED, SqlValue::Bool(false)));
        assert_eq!(archived(true), Predicate::Equals(IS_ARCHIVED, SqlValue::Bool(true)));
    }

    #[test]
    fn roots_have_no_parent_children_do() {
        assert_eq!(hierarchy(PARENT_ID, true), Predicate::IsNull(PARENT_ID));
        assert_eq!(hierarchy(PARENT_ID, false), Predicate::IsNotNull(PARENT_ID));
    }
}
