//! Entity families: brands, categories, labels, roles, persons, tools, stocks
//! and comments. Each one plugs its table, searchable column, sort whitelist
//! and save logic into the shared list/get/save machinery.

pub mod brand;
pub mod category;
pub mod comment;
pub mod label;
pub mod person;
pub mod role;
pub mod stock;
pub mod tool;

pub use brand::Brand;
pub use category::Category;
pub use comment::Comment;
pub use label::Label;
pub use person::Person;
pub use role::Role;
pub use stock::Stock;
pub use tool::Tool;

use crate::config::QueryConfig;
use crate::error::AppError;
use crate::extractors::ListParams;
use crate::query::{flags, search, sort, Column, ListQuery, PageRequest, Predicate, Referent, SortWhitelist};
use crate::service::SaveRequest;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::PgConnection;

/// `{ id, name }` of an associated row, used in detail views.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct RefSummary {
    pub id: i64,
    pub name: String,
}

#[async_trait]
pub trait Entity: Referent {
    /// Route segment under the API prefix ("tools").
    const PATH: &'static str;
    /// Column targeted by the `name` search parameter.
    const SEARCH_COLUMN: Column;
    const SORTABLE: SortWhitelist;
    /// Columns selected for list rows, in `Summary` field order.
    const COLUMNS: &'static [&'static str];

    type Summary: for<'r> sqlx::FromRow<'r, PgRow> + Serialize + Send + Unpin;
    type Detail: Serialize + Send;
    type Save: SaveRequest + DeserializeOwned + Send + Sync;

    /// Predicates beyond text search and the archival flag.
    fn extra_filters(_params: &ListParams) -> Vec<Option<Predicate>> {
        Vec::new()
    }

    /// Compose text search, archival flag, entity extras, sort and page.
    fn list_query(params: &ListParams, config: &QueryConfig) -> Result<ListQuery, AppError> {
        let page = PageRequest::from_ui(params.page, params.size, config)?;
        let mut filters = vec![
            search::text_contains(params.name.as_deref(), Self::SEARCH_COLUMN, config),
            Some(flags::archived(params.is_archived)),
        ];
        filters.extend(Self::extra_filters(params));
        let ordering = sort::resolve(params.sort.as_deref(), &Self::SORTABLE, config);
        Ok(ListQuery::new(filters, ordering, page))
    }

    async fn load_detail(conn: &mut PgConnection, id: i64) -> Result<Option<Self::Detail>, AppError>;

    /// Insert a new row (business key generated here) and attach its
    /// associations. Returns the new id.
    async fn insert(conn: &mut PgConnection, req: &Self::Save) -> Result<i64, AppError>;

    /// Replace collection associations, then apply scalar fields. The row
    /// is already locked.
    async fn update(conn: &mut PgConnection, id: i64, req: &Self::Save) -> Result<(), AppError>;
}

/// Entities that support physical deletion.
pub trait HardDelete: Entity {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::predicate::{SqlValue, IS_ARCHIVED, NAME, PARENT_ID};
    use crate::query::{SortDirection, DEFAULT_ORDERING};

    fn params(pairs: &[(&str, &str)]) -> ListParams {
        let raw = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        ListParams::from_query(&raw).unwrap()
    }

    #[test]
    fn default_listing_restricts_to_unarchived() {
        let q = Brand::list_query(&params(&[("page", "1"), ("size", "50")]), &QueryConfig::default()).unwrap();
        assert_eq!(q.predicate, Predicate::Equals(IS_ARCHIVED, SqlValue::Bool(false)));
        assert_eq!(q.ordering, DEFAULT_ORDERING);
        assert_eq!(q.page.offset(), 0);
    }

    #[test]
    fn short_search_is_dropped_long_search_is_kept() {
        let cfg = QueryConfig::default();
        let q = Tool::list_query(&params(&[("page", "1"), ("size", "5"), ("name", "ab")]), &cfg).unwrap();
        assert_eq!(q.predicate, Predicate::Equals(IS_ARCHIVED, SqlValue::Bool(false)));
        let q = Tool::list_query(&params(&[("page", "1"), ("size", "5"), ("name", "abc")]), &cfg).unwrap();
        assert_eq!(
            q.predicate,
            Predicate::And(vec![
                Predicate::Like(NAME, "%abc%".into()),
                Predicate::Equals(IS_ARCHIVED, SqlValue::Bool(false)),
            ])
        );
    }

    #[test]
    fn category_adds_hierarchy_and_ignores_name_sort() {
        let cfg = QueryConfig::default();
        let q = Category::list_query(
            &params(&[("page", "1"), ("size", "5"), ("isParent", "true"), ("sort", "name,asc")]),
            &cfg,
        )
        .unwrap();
        assert_eq!(
            q.predicate,
            Predicate::And(vec![
                Predicate::Equals(IS_ARCHIVED, SqlValue::Bool(false)),
                Predicate::IsNull(PARENT_ID),
            ])
        );
        assert_eq!(q.ordering, DEFAULT_ORDERING);
    }

    #[test]
    fn comment_filters_by_tool_and_searches_content() {
        let cfg = QueryConfig::default();
        let q = Comment::list_query(
            &params(&[("page", "1"), ("size", "5"), ("toolId", "4"), ("name", "rust"), ("sort", "updatedAt,desc")]),
            &cfg,
        )
        .unwrap();
        assert_eq!(
            q.predicate,
            Predicate::And(vec![
                Predicate::Like(comment::CONTENT, "%rust%".into()),
                Predicate::Equals(IS_ARCHIVED, SqlValue::Bool(false)),
                Predicate::Equals(comment::TOOL_ID, SqlValue::Int(4)),
            ])
        );
        assert_eq!(q.ordering.direction, SortDirection::Desc);
    }

    #[test]
    fn invalid_page_fails_before_any_query() {
        let err = Person::list_query(&params(&[("page", "0"), ("size", "5")]), &QueryConfig::default());
        assert!(matches!(err, Err(AppError::Validation(_))));
        let err = Person::list_query(&params(&[("page", "1"), ("size", "51")]), &QueryConfig::default());
        assert!(matches!(err, Err(AppError::Validation(_))));
    }
}
