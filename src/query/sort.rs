//! Resolve a `field[,direction]` sort directive into a single ordering key.
//!
//! Unknown or blank fields fall back to `created_at DESC` without an error.

use crate::config::QueryConfig;
use crate::query::predicate::{Column, CREATED_AT, UPDATED_AT};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ordering {
    pub column: Column,
    pub direction: SortDirection,
}

/// `created_at DESC`, used for absent and unrecognized directives.
pub const DEFAULT_ORDERING: Ordering = Ordering {
    column: CREATED_AT,
    direction: SortDirection::Desc,
};

impl Default for Ordering {
    fn default() -> Self {
        DEFAULT_ORDERING
    }
}

impl fmt::Display for Ordering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.column, self.direction.as_sql())
    }
}

/// Fields an entity accepts in its sort directive. Timestamps are always
/// sortable; the searchable column only when `text` is set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortWhitelist {
    /// Column ordered by the `name` token.
    pub text: Option<Column>,
}

impl SortWhitelist {
    pub const fn with_name(column: Column) -> Self {
        SortWhitelist { text: Some(column) }
    }

    pub const fn timestamps_only() -> Self {
        SortWhitelist { text: None }
    }
}

pub fn resolve(raw: Option<&str>, whitelist: &SortWhitelist, config: &QueryConfig) -> Ordering {
    let Some(raw) = raw else {
        return DEFAULT_ORDERING;
    };
    let mut tokens = raw.split(config.sort_separator);
    let field = tokens.next().unwrap_or("").trim();
    let direction = match tokens.next() {
        Some(d) if d.trim().eq_ignore_ascii_case("desc") => SortDirection::Desc,
        _ => SortDirection::Asc,
    };

    let column = match field.to_ascii_lowercase().as_str() {
        "name" => whitelist.text,
        "createdat" => {
            if direction == SortDirection::Desc {
                return DEFAULT_ORDERING;
            }
            Some(CREATED_AT)
        }
        "updatedat" => Some(UPDATED_AT),
        _ => None,
    };
    match column {
        Some(column) => Ordering { column, direction },
        None => DEFAULT_ORDERING,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::predicate::NAME;

    const NAMED: SortWhitelist = SortWhitelist::with_name(NAME);
    const TIMESTAMPS: SortWhitelist = SortWhitelist::timestamps_only();

    fn r(raw: Option<&str>, wl: &SortWhitelist) -> Ordering {
        resolve(raw, wl, &QueryConfig::default())
    }

    fn ord(column: Column, direction: SortDirection) -> Ordering {
        Ordering { column, direction }
    }

    #[test]
    fn absent_directive_uses_default() {
        assert_eq!(r(None, &NAMED), DEFAULT_ORDERING);
    }

    #[test]
    fn name_directions() {
        assert_eq!(r(Some("name,asc"), &NAMED), ord(NAME, SortDirection::Asc));
        assert_eq!(r(Some("name,desc"), &NAMED), ord(NAME, SortDirection::Desc));
        assert_eq!(r(Some("name"), &NAMED), ord(NAME, SortDirection::Asc));
        assert_eq!(r(Some("NAME,DESC"), &NAMED), ord(NAME, SortDirection::Desc));
    }

    #[test]
    fn anything_but_desc_is_ascending() {
        assert_eq!(r(Some("updatedAt,down"), &NAMED), ord(UPDATED_AT, SortDirection::Asc));
        assert_eq!(r(Some("updatedAt,"), &NAMED), ord(UPDATED_AT, SortDirection::Asc));
        assert_eq!(r(Some("updatedAt,Desc"), &NAMED), ord(UPDATED_AT, SortDirection::Desc));
    }

    #[test]
    fn timestamp_fields_match_case_insensitively() {
        assert_eq!(r(Some("createdAt,asc"), &NAMED), ord(CREATED_AT, SortDirection::Asc));
        assert_eq!(r(Some("CREATEDAT,desc"), &TIMESTAMPS), DEFAULT_ORDERING);
        assert_eq!(r(Some("updatedat,desc"), &TIMESTAMPS), ord(UPDATED_AT, SortDirection::Desc));
    }

    #[test]
    fn unsupported_or_blank_fields_fall_back() {
        for raw in ["", "   ", "price,asc", "created_at,asc", ",desc", "id"] {
            assert_eq!(r(Some(raw), &NAMED), DEFAULT_ORDERING, "directive {:?}", raw);
        }
    }

    #[test]
    fn name_is_rejected_when_not_whitelisted() {
        assert_eq!(r(Some("name,asc"), &TIMESTAMPS), DEFAULT_ORDERING);
    }

    #[test]
    fn separator_follows_config() {
        let cfg = QueryConfig { sort_separator: ':', ..QueryConfig::default() };
        assert_eq!(resolve(Some("name:desc"), &NAMED, &cfg), ord(NAME, SortDirection::Desc));
        // with ':' as separator, "name,desc" is a single unknown field
        assert_eq!(resolve(Some("name,desc"), &NAMED, &cfg), DEFAULT_ORDERING);
    }

    #[test]
    fn display_renders_sql_fragment() {
        assert_eq!(DEFAULT_ORDERING.to_string(), "created_at DESC");
    }
}
