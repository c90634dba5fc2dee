//! Identifier-only association handles.
//!
//! A [`Ref<E>`] stands in for a row of `E` when only the foreign-key link is
//! needed. Resolving one never touches the store; a dangling id surfaces as a
//! foreign-key violation when the enclosing write runs.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// An entity that other rows can point at.
pub trait Referent: Send + Sync + 'static {
    /// Singular name used in messages ("brand", "label").
    const KIND: &'static str;
    /// Table holding the referenced rows.
    const TABLE: &'static str;
}

/// Handle to a row of `E` carrying nothing but its id. Equality, ordering and
/// hashing are by id only.
pub struct Ref<E: Referent> {
    id: i64,
    _marker: PhantomData<fn() -> E>,
}

impl<E: Referent> Ref<E> {
    pub fn id(&self) -> i64 {
        self.id
    }
}

impl<E: Referent> Clone for Ref<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: Referent> Copy for Ref<E> {}

impl<E: Referent> PartialEq for Ref<E> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<E: Referent> Eq for Ref<E> {}

impl<E: Referent> PartialOrd for Ref<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E: Referent> Ord for Ref<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl<E: Referent> Hash for Ref<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<E: Referent> fmt::Debug for Ref<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ref<{}>({})", E::KIND, self.id)
    }
}

/// Attachable handle for `id`. Does not check that the row exists.
pub fn resolve<E: Referent>(id: i64) -> Ref<E> {
    Ref {
        id,
        _marker: PhantomData,
    }
}

pub fn resolve_opt<E: Referent>(id: Option<i64>) -> Option<Ref<E>> {
    id.map(resolve)
}

/// Distinct handles for `ids`, ascending by id.
pub fn resolve_set<E, I>(ids: I) -> Vec<Ref<E>>
where
    E: Referent,
    I: IntoIterator<Item = i64>,
{
    ids.into_iter().map(resolve).collect::<BTreeSet<_>>().into_iter().collect()
}

/// Many-to-many link table between `O` (owner) and `T` (target).
pub struct Association<O: Referent, T: Referent> {
    pub table: &'static str,
    pub owner_column: &'static str,
    pub target_column: &'static str,
    _marker: PhantomData<fn() -> (O, T)>,
}

impl<O: Referent, T: Referent> Association<O, T> {
    pub const fn new(table: &'static str, owner_column: &'static str, target_column: &'static str) -> Self {
        Association {
            table,
            owner_column,
            target_column,
            _marker: PhantomData,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct Widget;

    impl Referent for Widget {
        const KIND: &'static str = "widget";
        const TABLE: &'static str = "widgets";
    }

    #[test]
    fn handles_compare_by_id() {
        let a: Ref<Widget> = resolve(7);
        let b: Ref<Widget> = resolve(7);
        assert_eq!(a, b);
        assert_ne!(a, resolve::<Widget>(8));
        let set: HashSet<_> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn resolve_set_dedups_and_orders() {
        let refs = resolve_set::<Widget, _>([5, 2, 5, 9, 2]);
        let ids: Vec<i64> = refs.iter().map(Ref::id).collect();
        assert_eq!(ids, vec![2, 5, 9]);
    }

    #[test]
    fn resolving_unknown_ids_never_fails() {
        assert_eq!(resolve::<Widget>(i64::MAX).id(), i64::MAX);
        assert_eq!(resolve_opt::<Widget>(None), None);
        assert_eq!(resolve_opt::<Widget>(Some(3)).map(|r| r.id()), Some(3));
    }

    #[test]
    fn debug_names_the_kind() {
        assert_eq!(format!("{:?}", resolve::<Widget>(4)), "Ref<widget>(4)");
    }
}
