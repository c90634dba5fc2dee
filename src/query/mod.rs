//! Filter/sort/paginate query composition shared by every entity family.

pub mod flags;
pub mod page;
pub mod predicate;
pub mod reference;
pub mod search;
pub mod sort;

pub use page::PageRequest;
pub use predicate::{all_of, Column, Predicate, SqlValue};
pub use reference::{resolve, resolve_opt, resolve_set, Association, Ref, Referent};
pub use sort::{Ordering, SortDirection, SortWhitelist, DEFAULT_ORDERING};

/// A fully composed list request: one predicate, one ordering key, one window.
#[derive(Clone, Debug, PartialEq)]
pub struct ListQuery {
    pub predicate: Predicate,
    pub ordering: Ordering,
    pub page: PageRequest,
}

impl ListQuery {
    pub fn new<I>(filters: I, ordering: Ordering, page: PageRequest) -> Self
    where
        I: IntoIterator<Item = Option<Predicate>>,
    {
        ListQuery {
            predicate: all_of(filters),
            ordering,
            page,
        }
    }
}
